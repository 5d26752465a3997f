use borsh::{BorshDeserialize, BorshSerialize};

/// A single oracle observation. Read-only input.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OraclePriceData {
    /// Precision: MARK_PRICE_PRECISION
    pub price: i128,

    /// Precision: MARK_PRICE_PRECISION
    pub confidence: u128,

    pub slot: u64,
}
