use borsh::{BorshDeserialize, BorshSerialize};

use super::types::PositionDirection;

/// The parts of an order the auction and fulfillment math read
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Order {
    /// Slot the order was placed in
    pub slot: u64,

    /// Limit price, 0 for market orders
    /// Precision: MARK_PRICE_PRECISION
    pub price: u64,

    pub market_index: u16,

    pub direction: PositionDirection,

    pub post_only: bool,

    /// Auction length in slots
    pub auction_duration: u8,

    pub auction_start_price: u64,

    pub auction_end_price: u64,
}
