use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

use crate::{
    constants::SPOT_CUMULATIVE_INTEREST_PRECISION,
    error::{RiskMathError, RiskMathResult},
    math::rounding::RoundDirection,
    math::spot_balance::get_token_amount,
};

/// Snapshot of a lending pool (bank) for one token
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct SpotMarket {
    pub market_index: u16,

    pub mint: Pubkey,

    pub oracle: Pubkey,

    /// Token decimals (0-18). Balance conversions require `decimals <= 16`.
    pub decimals: u8,

    /// Deposit exchange rate between scaled balance and token amount
    /// Precision: SPOT_CUMULATIVE_INTEREST_PRECISION
    pub cumulative_deposit_interest: u128,

    /// Borrow exchange rate between scaled balance and token amount
    /// Precision: SPOT_CUMULATIVE_INTEREST_PRECISION
    pub cumulative_borrow_interest: u128,

    /// Total deposits in scaled balance units
    pub deposit_balance: u128,

    /// Total borrows in scaled balance units
    pub borrow_balance: u128,

    /// Kink of the interest rate curve
    /// Precision: SPOT_UTILIZATION_PRECISION
    pub optimal_utilization: u32,

    /// Borrow rate at the kink
    /// Precision: SPOT_RATE_PRECISION
    pub optimal_borrow_rate: u32,

    /// Borrow rate at 100% utilization
    /// Precision: SPOT_RATE_PRECISION
    pub max_borrow_rate: u32,

    pub last_interest_ts: UnixTimestamp,

    pub last_twap_ts: UnixTimestamp,

    /// 24h twap of total deposits in token amount
    pub deposit_token_twap: u128,

    /// 24h twap of total borrows in token amount
    pub borrow_token_twap: u128,

    /// Deposits below this token amount can always be withdrawn
    pub withdraw_guard_threshold: u128,

    /// Precision: SPOT_IMF_PRECISION
    pub imf_factor: u32,

    /// Precision: SPOT_WEIGHT_PRECISION
    pub initial_asset_weight: u32,
    pub maintenance_asset_weight: u32,
    pub initial_liability_weight: u32,
    pub maintenance_liability_weight: u32,
}

impl Default for SpotMarket {
    fn default() -> Self {
        Self {
            market_index: 0,
            mint: Pubkey::default(),
            oracle: Pubkey::default(),
            decimals: 6,
            cumulative_deposit_interest: SPOT_CUMULATIVE_INTEREST_PRECISION,
            cumulative_borrow_interest: SPOT_CUMULATIVE_INTEREST_PRECISION,
            deposit_balance: 0,
            borrow_balance: 0,
            optimal_utilization: 0,
            optimal_borrow_rate: 0,
            max_borrow_rate: 0,
            last_interest_ts: 0,
            last_twap_ts: 0,
            deposit_token_twap: 0,
            borrow_token_twap: 0,
            withdraw_guard_threshold: 0,
            imf_factor: 0,
            initial_asset_weight: 0,
            maintenance_asset_weight: 0,
            initial_liability_weight: 0,
            maintenance_liability_weight: 0,
        }
    }
}

impl SpotMarket {
    pub fn get_cumulative_interest(&self, balance_type: &SpotBalanceType) -> u128 {
        match balance_type {
            SpotBalanceType::Deposit => self.cumulative_deposit_interest,
            SpotBalanceType::Borrow => self.cumulative_borrow_interest,
        }
    }

    pub fn get_deposit_token_amount(&self) -> RiskMathResult<u128> {
        get_token_amount(self.deposit_balance, self, &SpotBalanceType::Deposit)
    }

    pub fn get_borrow_token_amount(&self) -> RiskMathResult<u128> {
        get_token_amount(self.borrow_balance, self, &SpotBalanceType::Borrow)
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpotBalanceType {
    #[default]
    Deposit,
    Borrow,
}

impl SpotBalanceType {
    /// Rounding applied when converting a token amount into a scaled balance
    pub fn balance_rounding(&self) -> RoundDirection {
        match self {
            SpotBalanceType::Deposit => RoundDirection::Down,
            SpotBalanceType::Borrow => RoundDirection::Up,
        }
    }
}

impl TryFrom<u8> for SpotBalanceType {
    type Error = RiskMathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SpotBalanceType::Deposit),
            1 => Ok(SpotBalanceType::Borrow),
            _ => Err(RiskMathError::InvalidBalanceType),
        }
    }
}

/// Scaled balance held against a spot market, e.g. a perp market's pnl pool
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolBalance {
    pub scaled_balance: u128,
    pub market_index: u16,
}

/// A user's position in one spot market
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpotPosition {
    pub market_index: u16,
    pub balance_type: SpotBalanceType,
    pub scaled_balance: u128,
}

impl SpotPosition {
    pub fn get_token_amount(&self, spot_market: &SpotMarket) -> RiskMathResult<u128> {
        get_token_amount(self.scaled_balance, spot_market, &self.balance_type)
    }
}
