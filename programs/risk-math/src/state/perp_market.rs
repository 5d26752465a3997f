use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use super::spot_market::{PoolBalance, SpotMarket};
use super::types::MarketType;

/// Virtual AMM backing a perp market
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Amm {
    pub oracle: Pubkey,

    /// Precision: AMM_RESERVE_PRECISION
    pub base_asset_reserve: u128,

    /// Precision: AMM_RESERVE_PRECISION
    pub quote_asset_reserve: u128,

    /// sqrt of the constant product invariant
    /// Precision: AMM_RESERVE_PRECISION
    pub sqrt_k: u128,

    /// Precision: PEG_PRECISION
    pub peg_multiplier: u128,

    /// Net base position of all users against the AMM (positive = users net long)
    /// Precision: BASE_PRECISION
    pub base_asset_amount_with_amm: i128,

    /// Net quote cost basis of all users against the AMM
    /// Precision: QUOTE_PRECISION
    pub quote_asset_amount: i128,

    /// Precision: BID_ASK_SPREAD_PRECISION
    pub base_spread: u32,

    /// Precision: BID_ASK_SPREAD_PRECISION
    pub max_spread: u32,

    /// 0 disables formulaic repeg toward the oracle
    pub curve_update_intensity: u8,

    /// Precision: QUOTE_PRECISION
    pub total_exchange_fee: u128,

    /// Precision: QUOTE_PRECISION
    pub total_fee_minus_distributions: i128,
}

/// Snapshot of a perpetual market
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerpMarket {
    pub market_index: u16,

    pub amm: Amm,

    /// Settlement reserve paying out users' realized gains, held in the quote spot market
    pub pnl_pool: PoolBalance,

    /// Precision: MARGIN_PRECISION
    pub margin_ratio_initial: u32,

    /// Precision: MARGIN_PRECISION
    pub margin_ratio_maintenance: u32,

    /// Precision: SPOT_WEIGHT_PRECISION
    pub unrealized_pnl_initial_asset_weight: u32,

    /// Precision: SPOT_WEIGHT_PRECISION
    pub unrealized_pnl_maintenance_asset_weight: u32,

    /// Precision: SPOT_IMF_PRECISION
    pub unrealized_pnl_imf_factor: u32,

    /// 0 disables the imbalance haircut
    /// Precision: QUOTE_PRECISION
    pub unrealized_pnl_max_imbalance: u128,

    /// Precision: SPOT_IMF_PRECISION
    pub imf_factor: u32,
}

/// A perp or spot market, borrowed from the caller
#[derive(Clone, Copy, Debug)]
pub enum MarketAccount<'a> {
    Perp(&'a PerpMarket),
    Spot(&'a SpotMarket),
}

impl<'a> MarketAccount<'a> {
    pub fn market_type(&self) -> MarketType {
        match self {
            MarketAccount::Perp(_) => MarketType::Perp,
            MarketAccount::Spot(_) => MarketType::Spot,
        }
    }

    pub fn imf_factor(&self) -> u32 {
        match self {
            MarketAccount::Perp(market) => market.imf_factor,
            MarketAccount::Spot(market) => market.imf_factor,
        }
    }
}

impl<'a> From<&'a PerpMarket> for MarketAccount<'a> {
    fn from(market: &'a PerpMarket) -> Self {
        MarketAccount::Perp(market)
    }
}

impl<'a> From<&'a SpotMarket> for MarketAccount<'a> {
    fn from(market: &'a SpotMarket) -> Self {
        MarketAccount::Spot(market)
    }
}
