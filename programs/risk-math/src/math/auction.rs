//! Dutch auction pricing for taker orders
//!
//! A taker order starts at a price favorable to makers and walks linearly toward its end
//! price over `auction_duration` slots.

use solana_program::msg;

use crate::{
    constants::BID_ASK_SPREAD_PRECISION,
    error::{RiskMathError, RiskMathResult},
    math::safe_math::{Cast, SafeMath},
    state::{OraclePriceData, Order, PositionDirection},
};

/// (start price, end price) for a new auction.
///
/// Limit orders start 1% inside their limit. Market orders start at the oracle and end
/// 1% through it.
pub fn calculate_auction_prices(
    oracle_price_data: &OraclePriceData,
    direction: PositionDirection,
    limit_price: u64,
) -> RiskMathResult<(u64, u64)> {
    if limit_price > 0 {
        let improvement = limit_price.safe_div(100)?;
        let auction_start_price = match direction {
            PositionDirection::Long => limit_price.safe_sub(improvement)?,
            PositionDirection::Short => limit_price.safe_add(improvement)?,
        };

        return Ok((auction_start_price, limit_price));
    }

    let one_percent = BID_ASK_SPREAD_PRECISION / 100;
    let numerator = match direction {
        PositionDirection::Long => BID_ASK_SPREAD_PRECISION.safe_add(one_percent)?,
        PositionDirection::Short => BID_ASK_SPREAD_PRECISION.safe_sub(one_percent)?,
    };

    let auction_end_price = oracle_price_data
        .price
        .unsigned_abs()
        .safe_mul(numerator)?
        .safe_div(BID_ASK_SPREAD_PRECISION)?
        .cast::<u64>()?;

    Ok((oracle_price_data.price.cast::<u64>()?, auction_end_price))
}

/// Auction price at `slot`, snapped to `tick_size`
pub fn calculate_auction_price(order: &Order, slot: u64, tick_size: u64) -> RiskMathResult<u64> {
    let slots_elapsed = slot.safe_sub(order.slot)?;

    let delta_denominator = order.auction_duration as u64;
    if delta_denominator == 0 {
        return Ok(order.auction_end_price);
    }

    let delta_numerator = slots_elapsed.min(delta_denominator);

    let price = match order.direction {
        PositionDirection::Long => {
            let price_delta = order
                .auction_end_price
                .safe_sub(order.auction_start_price)?
                .safe_mul(delta_numerator)?
                .safe_div(delta_denominator)?;
            order.auction_start_price.safe_add(price_delta)?
        }
        PositionDirection::Short => {
            let price_delta = order
                .auction_start_price
                .safe_sub(order.auction_end_price)?
                .safe_mul(delta_numerator)?
                .safe_div(delta_denominator)?;
            order.auction_start_price.safe_sub(price_delta)?
        }
    };

    standardize_price(price, tick_size, order.direction)
}

/// Snap `price` onto the tick grid. Bids round down, asks round up.
pub fn standardize_price(
    price: u64,
    tick_size: u64,
    direction: PositionDirection,
) -> RiskMathResult<u64> {
    if price == 0 {
        return Ok(0);
    }

    if tick_size == 0 {
        msg!("Tick size must be positive");
        return Err(RiskMathError::DivisionByZero);
    }

    let remainder = price % tick_size;
    if remainder == 0 {
        return Ok(price);
    }

    match direction {
        PositionDirection::Long => price.safe_sub(remainder),
        PositionDirection::Short => price.safe_add(tick_size)?.safe_sub(remainder),
    }
}

pub fn does_auction_satisfy_maker_order(
    maker_order: &Order,
    taker_order: &Order,
    auction_price: u64,
) -> bool {
    if maker_order.direction == taker_order.direction
        || maker_order.market_index != taker_order.market_index
    {
        return false;
    }

    match maker_order.direction {
        PositionDirection::Long => auction_price <= maker_order.price,
        PositionDirection::Short => auction_price >= maker_order.price,
    }
}

pub fn is_auction_complete(
    order_slot: u64,
    auction_duration: u8,
    slot: u64,
) -> RiskMathResult<bool> {
    if auction_duration == 0 {
        return Ok(true);
    }

    let slots_elapsed = slot.safe_sub(order_slot)?;

    Ok(slots_elapsed > auction_duration as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MARK_PRICE_PRECISION;

    const PRICE: u64 = MARK_PRICE_PRECISION as u64;

    fn long_order() -> Order {
        Order {
            slot: 100,
            market_index: 0,
            direction: PositionDirection::Long,
            auction_duration: 10,
            auction_start_price: 100 * PRICE,
            auction_end_price: 110 * PRICE,
            ..Order::default()
        }
    }

    #[test]
    fn test_auction_prices_for_limit_order() {
        let oracle = OraclePriceData::default();
        assert_eq!(
            calculate_auction_prices(&oracle, PositionDirection::Long, 100 * PRICE).unwrap(),
            (99 * PRICE, 100 * PRICE)
        );
        assert_eq!(
            calculate_auction_prices(&oracle, PositionDirection::Short, 100 * PRICE).unwrap(),
            (101 * PRICE, 100 * PRICE)
        );
    }

    #[test]
    fn test_auction_prices_for_market_order() {
        let oracle = OraclePriceData {
            price: 100 * MARK_PRICE_PRECISION as i128,
            ..OraclePriceData::default()
        };
        assert_eq!(
            calculate_auction_prices(&oracle, PositionDirection::Long, 0).unwrap(),
            (100 * PRICE, 101 * PRICE)
        );
        assert_eq!(
            calculate_auction_prices(&oracle, PositionDirection::Short, 0).unwrap(),
            (100 * PRICE, 99 * PRICE)
        );
    }

    #[test]
    fn test_auction_price_walks_linearly() {
        let order = long_order();
        assert_eq!(calculate_auction_price(&order, 100, 1).unwrap(), 100 * PRICE);
        assert_eq!(calculate_auction_price(&order, 105, 1).unwrap(), 105 * PRICE);
        assert_eq!(calculate_auction_price(&order, 110, 1).unwrap(), 110 * PRICE);
        assert_eq!(calculate_auction_price(&order, 500, 1).unwrap(), 110 * PRICE);

        let short = Order {
            direction: PositionDirection::Short,
            auction_start_price: 110 * PRICE,
            auction_end_price: 100 * PRICE,
            ..long_order()
        };
        assert_eq!(calculate_auction_price(&short, 105, 1).unwrap(), 105 * PRICE);

        // slot before the order was placed
        assert!(calculate_auction_price(&order, 99, 1).is_err());
    }

    #[test]
    fn test_standardize_price() {
        assert_eq!(standardize_price(1_234, 100, PositionDirection::Long).unwrap(), 1_200);
        assert_eq!(standardize_price(1_234, 100, PositionDirection::Short).unwrap(), 1_300);
        assert_eq!(standardize_price(1_200, 100, PositionDirection::Short).unwrap(), 1_200);
        assert_eq!(standardize_price(0, 0, PositionDirection::Long).unwrap(), 0);
        assert_eq!(
            standardize_price(1, 0, PositionDirection::Long),
            Err(RiskMathError::DivisionByZero)
        );
    }

    #[test]
    fn test_does_auction_satisfy_maker_order() {
        let taker = long_order();
        let maker = Order {
            direction: PositionDirection::Short,
            price: 104 * PRICE,
            ..Order::default()
        };

        assert!(does_auction_satisfy_maker_order(&maker, &taker, 105 * PRICE));
        assert!(!does_auction_satisfy_maker_order(&maker, &taker, 103 * PRICE));
        assert!(!does_auction_satisfy_maker_order(&taker, &taker, 105 * PRICE));

        let other_market = Order {
            market_index: 1,
            ..maker
        };
        assert!(!does_auction_satisfy_maker_order(&other_market, &taker, 105 * PRICE));
    }

    #[test]
    fn test_is_auction_complete() {
        assert!(is_auction_complete(100, 0, 100).unwrap());
        assert!(!is_auction_complete(100, 10, 110).unwrap());
        assert!(is_auction_complete(100, 10, 111).unwrap());
    }
}
