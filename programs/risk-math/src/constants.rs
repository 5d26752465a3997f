//! Fixed-point precisions
//!
//! Every scaling step in the crate refers to one of these. The comment next to each
//! constant is its decimal exponent.

// SPOT BALANCES
/// Canonical decimal space that token amounts are lifted into before dividing by a
/// cumulative interest index.
pub const SPOT_BALANCE_PRECISION_DECIMALS: u32 = 16; // expo = -16
pub const SPOT_CUMULATIVE_INTEREST_PRECISION: u128 = 10_000_000_000; // expo = -10
pub const SPOT_UTILIZATION_PRECISION: u128 = 1_000_000; // expo = -6
pub const SPOT_RATE_PRECISION: u128 = 1_000_000; // expo = -6
pub const SPOT_WEIGHT_PRECISION: u128 = 10_000; // expo = -4
pub const SPOT_IMF_PRECISION: u128 = 1_000_000; // expo = -6

// PERP / AMM
pub const AMM_RESERVE_PRECISION: u128 = 10_000_000_000_000; // expo = -13
pub const AMM_RESERVE_PRECISION_I128: i128 = AMM_RESERVE_PRECISION as i128;
pub const BASE_PRECISION: u128 = AMM_RESERVE_PRECISION; // expo = -13
pub const BASE_PRECISION_I128: i128 = AMM_RESERVE_PRECISION_I128;
pub const MARK_PRICE_PRECISION: u128 = 10_000_000_000; // expo = -10
pub const MARK_PRICE_PRECISION_I128: i128 = MARK_PRICE_PRECISION as i128;
pub const PEG_PRECISION: u128 = 1_000; // expo = -3
pub const QUOTE_PRECISION: u128 = 1_000_000; // expo = -6
pub const QUOTE_PRECISION_I128: i128 = QUOTE_PRECISION as i128;
pub const MARGIN_PRECISION: u128 = 10_000; // expo = -4
pub const BID_ASK_SPREAD_PRECISION: u128 = 1_000_000; // expo = -6
pub const BID_ASK_SPREAD_PRECISION_I128: i128 = BID_ASK_SPREAD_PRECISION as i128;

// PRECISION CONVERSIONS
pub const PRICE_TO_PEG_PRECISION_RATIO: u128 = MARK_PRICE_PRECISION / PEG_PRECISION; // expo: 7
pub const PRICE_TO_QUOTE_PRECISION_RATIO: u128 = MARK_PRICE_PRECISION / QUOTE_PRECISION; // expo: 4
pub const PRICE_TO_QUOTE_PRECISION_RATIO_I128: i128 = PRICE_TO_QUOTE_PRECISION_RATIO as i128;
pub const AMM_TO_QUOTE_PRECISION_RATIO: u128 = AMM_RESERVE_PRECISION / QUOTE_PRECISION; // expo: 7
pub const AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO: u128 =
    AMM_RESERVE_PRECISION * PEG_PRECISION / QUOTE_PRECISION; // expo: 10
pub const AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128: i128 =
    AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO as i128;
pub const MARK_PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO: u128 =
    MARK_PRICE_PRECISION * AMM_TO_QUOTE_PRECISION_RATIO; // expo: 17

// SIZE CURVES
/// Divisor applied to `sqrt(size) * imf_factor` in the size weight curves.
pub const SIZE_CURVE_SQRT_DENOMINATOR: u128 = 100_000;

// TIME PERIODS
pub const ONE_YEAR: u128 = 31_536_000;
pub const TWENTY_FOUR_HOUR: i64 = 60 * 60 * 24;
