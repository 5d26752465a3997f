/// Ways a perp taker order can be filled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerpFulfillmentMethod {
    /// Against a resting maker order
    Match,
    /// Against the virtual AMM
    Amm,
}

/// Ways a spot taker order can be filled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpotFulfillmentMethod {
    /// Against a resting maker order
    Match,
    /// Routed to an external order book
    ExternalMarket,
}
