use crate::{
    error::RiskMathResult,
    math::auction::is_auction_complete,
    state::{Order, PerpFulfillmentMethod, SpotFulfillmentMethod},
};

/// Venues a perp taker order may fill against, in priority order.
///
/// Makers always go first; the AMM only once the auction has finished.
pub fn determine_perp_fulfillment_methods(
    taker_order: &Order,
    maker_available: bool,
    amm_available: bool,
    slot: u64,
) -> RiskMathResult<Vec<PerpFulfillmentMethod>> {
    let mut fulfillment_methods = vec![];

    if maker_available {
        fulfillment_methods.push(PerpFulfillmentMethod::Match);
    }

    if amm_available && is_auction_complete(taker_order.slot, taker_order.auction_duration, slot)? {
        fulfillment_methods.push(PerpFulfillmentMethod::Amm);
    }

    Ok(fulfillment_methods)
}

/// Venues a spot taker order may fill against, in priority order
pub fn determine_spot_fulfillment_methods(
    taker_order: &Order,
    maker_available: bool,
    external_market_available: bool,
    slot: u64,
) -> RiskMathResult<Vec<SpotFulfillmentMethod>> {
    let mut fulfillment_methods = vec![];

    if maker_available {
        fulfillment_methods.push(SpotFulfillmentMethod::Match);
    }

    if !taker_order.post_only
        && external_market_available
        && is_auction_complete(taker_order.slot, taker_order.auction_duration, slot)?
    {
        fulfillment_methods.push(SpotFulfillmentMethod::ExternalMarket);
    }

    Ok(fulfillment_methods)
}
