//! Balance & interest accounting for spot markets
//!
//! Converts between scaled balances and token amounts, derives utilization and the
//! interest rate curve, and computes the twap-smoothed withdraw/borrow guard rails.

use solana_program::{clock::UnixTimestamp, msg};

use crate::{
    constants::{
        ONE_YEAR, SPOT_BALANCE_PRECISION_DECIMALS, SPOT_RATE_PRECISION,
        SPOT_UTILIZATION_PRECISION, TWENTY_FOUR_HOUR,
    },
    error::{RiskMathError, RiskMathResult},
    math::{
        fixed_point::ten_pow,
        rounding::RoundDirection,
        safe_math::{Cast, SafeMath},
    },
    state::{OraclePriceData, SpotBalanceType, SpotMarket, SpotPosition},
};

/// Factor lifting a token amount into the canonical balance space
fn get_precision_increase(spot_market: &SpotMarket) -> RiskMathResult<u128> {
    let decimals = spot_market.decimals as u32;
    if decimals > SPOT_BALANCE_PRECISION_DECIMALS {
        msg!(
            "Spot market {} decimals {} exceed {}",
            spot_market.market_index,
            decimals,
            SPOT_BALANCE_PRECISION_DECIMALS
        );
        return Err(RiskMathError::InvalidDecimals);
    }

    ten_pow(SPOT_BALANCE_PRECISION_DECIMALS - decimals)
}

/// Token amount -> scaled balance.
///
/// Deposits floor, borrows round up by one unit so a borrower's scaled debt is never
/// under-counted.
pub fn get_spot_balance(
    token_amount: u128,
    spot_market: &SpotMarket,
    balance_type: &SpotBalanceType,
) -> RiskMathResult<u128> {
    let precision_increase = get_precision_increase(spot_market)?;
    let cumulative_interest = spot_market.get_cumulative_interest(balance_type);

    let balance = token_amount
        .safe_mul(precision_increase)?
        .safe_div(cumulative_interest)?;

    balance_type.balance_rounding().adjust_nonzero(balance)
}

/// Scaled balance -> token amount. Always floors.
pub fn get_token_amount(
    balance: u128,
    spot_market: &SpotMarket,
    balance_type: &SpotBalanceType,
) -> RiskMathResult<u128> {
    let precision_decrease = get_precision_increase(spot_market)?;
    let cumulative_interest = spot_market.get_cumulative_interest(balance_type);

    balance
        .safe_mul(cumulative_interest)?
        .safe_div(precision_decrease)
}

/// Deposits positive, borrows negative
pub fn get_signed_token_amount(
    token_amount: u128,
    balance_type: &SpotBalanceType,
) -> RiskMathResult<i128> {
    match balance_type {
        SpotBalanceType::Deposit => token_amount.cast(),
        SpotBalanceType::Borrow => token_amount
            .cast::<i128>()
            .map(|token_amount| -token_amount),
    }
}

/// Token amount a balance earns for a given interest delta
pub fn get_interest_token_amount(
    balance: u128,
    spot_market: &SpotMarket,
    interest: u128,
) -> RiskMathResult<u128> {
    let precision_decrease = get_precision_increase(spot_market)?;

    balance.safe_mul(interest)?.safe_div(precision_decrease)
}

pub fn calculate_utilization_from_token_amounts(
    deposit_token_amount: u128,
    borrow_token_amount: u128,
) -> RiskMathResult<u128> {
    if deposit_token_amount == 0 {
        // borrows without deposits pin utilization at the maximum
        return Ok(if borrow_token_amount == 0 {
            0
        } else {
            SPOT_UTILIZATION_PRECISION
        });
    }

    borrow_token_amount
        .safe_mul(SPOT_UTILIZATION_PRECISION)?
        .safe_div(deposit_token_amount)
}

/// Borrowed / deposited token amount
/// Precision: SPOT_UTILIZATION_PRECISION
pub fn calculate_utilization(spot_market: &SpotMarket) -> RiskMathResult<u128> {
    let deposit_token_amount = spot_market.get_deposit_token_amount()?;
    let borrow_token_amount = spot_market.get_borrow_token_amount()?;

    calculate_utilization_from_token_amounts(deposit_token_amount, borrow_token_amount)
}

fn calculate_interest_rate_for_utilization(
    spot_market: &SpotMarket,
    utilization: u128,
) -> RiskMathResult<u128> {
    if utilization == 0 {
        return Ok(0);
    }

    let optimal_utilization = spot_market.optimal_utilization.cast::<u128>()?;
    let optimal_borrow_rate = spot_market.optimal_borrow_rate.cast::<u128>()?;

    if utilization > optimal_utilization {
        let surplus_utilization = utilization.safe_sub(optimal_utilization)?;

        let borrow_rate_slope = spot_market
            .max_borrow_rate
            .cast::<u128>()?
            .safe_sub(optimal_borrow_rate)?
            .safe_mul(SPOT_UTILIZATION_PRECISION)?
            .safe_div(SPOT_UTILIZATION_PRECISION.safe_sub(optimal_utilization)?)?;

        optimal_borrow_rate.safe_add(
            surplus_utilization
                .safe_mul(borrow_rate_slope)?
                .safe_div(SPOT_UTILIZATION_PRECISION)?,
        )
    } else {
        let borrow_rate_slope = optimal_borrow_rate
            .safe_mul(SPOT_UTILIZATION_PRECISION)?
            .safe_div(optimal_utilization)?;

        utilization
            .safe_mul(borrow_rate_slope)?
            .safe_div(SPOT_UTILIZATION_PRECISION)
    }
}

/// Annualized borrow rate from the two-slope utilization curve
/// Precision: SPOT_RATE_PRECISION
pub fn calculate_interest_rate(spot_market: &SpotMarket) -> RiskMathResult<u128> {
    let utilization = calculate_utilization(spot_market)?;
    calculate_interest_rate_for_utilization(spot_market, utilization)
}

pub fn calculate_borrow_rate(spot_market: &SpotMarket) -> RiskMathResult<u128> {
    calculate_interest_rate(spot_market)
}

/// Depositors earn the utilization-weighted share of the borrow rate
/// Precision: SPOT_RATE_PRECISION
pub fn calculate_deposit_rate(spot_market: &SpotMarket) -> RiskMathResult<u128> {
    let utilization = calculate_utilization(spot_market)?;
    let borrow_rate = calculate_interest_rate_for_utilization(spot_market, utilization)?;

    borrow_rate
        .safe_mul(utilization)?
        .safe_div(SPOT_UTILIZATION_PRECISION)
}

/// Deltas to add to the cumulative interest indices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterestAccumulated {
    pub borrow_interest: u128,
    pub deposit_interest: u128,
}

/// Interest accrued since `last_interest_ts`.
///
/// The caller adds the deltas to the cumulative indices and advances `last_interest_ts`.
pub fn calculate_accumulated_interest(
    spot_market: &SpotMarket,
    now: UnixTimestamp,
) -> RiskMathResult<InterestAccumulated> {
    let utilization = calculate_utilization(spot_market)?;

    if utilization == 0 {
        return Ok(InterestAccumulated::default());
    }

    let borrow_rate = calculate_interest_rate_for_utilization(spot_market, utilization)?;

    let time_since_last_update = now
        .safe_sub(spot_market.last_interest_ts)?
        .cast::<u128>()?;

    // rate * elapsed now, ONE_YEAR divided out below
    let modified_borrow_rate = borrow_rate.safe_mul(time_since_last_update)?;

    let modified_deposit_rate = modified_borrow_rate
        .safe_mul(utilization)?
        .safe_div(SPOT_UTILIZATION_PRECISION)?;

    let borrow_interest = RoundDirection::Up.adjust(
        spot_market
            .cumulative_borrow_interest
            .safe_mul(modified_borrow_rate)?
            .safe_div(ONE_YEAR)?
            .safe_div(SPOT_RATE_PRECISION)?,
    )?;

    let deposit_interest = RoundDirection::Down.adjust(
        spot_market
            .cumulative_deposit_interest
            .safe_mul(modified_deposit_rate)?
            .safe_div(ONE_YEAR)?
            .safe_div(SPOT_RATE_PRECISION)?,
    )?;

    Ok(InterestAccumulated {
        borrow_interest,
        deposit_interest,
    })
}

/// Headroom left under the twap guard rails. Negative means the pool is already past
/// the bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawLimits {
    pub borrow_limit: i128,
    pub withdraw_limit: i128,
}

/// Blend a stored twap with the live amount.
///
/// The denominator doubles the elapsed term rather than using the window length. At
/// zero elapsed time the stored twap is returned untouched.
fn calculate_live_token_twap(
    token_twap: u128,
    token_amount: u128,
    since_last: u128,
    since_start: u128,
) -> RiskMathResult<u128> {
    if since_last == 0 {
        return Ok(token_twap);
    }

    token_twap
        .safe_mul(since_start)?
        .safe_add(token_amount.safe_mul(since_last)?)?
        .safe_div(since_last.safe_add(since_last)?)
}

/// Advisory borrow/withdraw bounds for an external execution gate
pub fn calculate_withdraw_limit(
    spot_market: &SpotMarket,
    now: UnixTimestamp,
) -> RiskMathResult<WithdrawLimits> {
    let deposit_token_amount = spot_market.get_deposit_token_amount()?;
    let borrow_token_amount = spot_market.get_borrow_token_amount()?;

    let since_last = now.safe_sub(spot_market.last_twap_ts)?;
    if since_last < 0 {
        msg!(
            "now {} is before last_twap_ts {}",
            now,
            spot_market.last_twap_ts
        );
        return Err(RiskMathError::MathUnderflow);
    }
    let since_start = TWENTY_FOUR_HOUR.safe_sub(since_last)?.max(0);

    let since_last = since_last.cast::<u128>()?;
    let since_start = since_start.cast::<u128>()?;

    let borrow_token_twap_live = calculate_live_token_twap(
        spot_market.borrow_token_twap,
        borrow_token_amount,
        since_last,
        since_start,
    )?;

    let deposit_token_twap_live = calculate_live_token_twap(
        spot_market.deposit_token_twap,
        deposit_token_amount,
        since_last,
        since_start,
    )?;

    // between ~15-90% utilization with friction on twap
    let max_borrow_tokens = deposit_token_amount
        .safe_div(6)?
        .max(borrow_token_twap_live.safe_add(borrow_token_twap_live.safe_div(5)?)?)
        .min(deposit_token_amount.safe_sub(deposit_token_amount.safe_div(10)?)?);

    let min_deposit_tokens = deposit_token_twap_live.safe_sub(
        deposit_token_twap_live
            .safe_div(5)?
            .max(spot_market.withdraw_guard_threshold)
            .min(deposit_token_twap_live),
    )?;

    Ok(WithdrawLimits {
        borrow_limit: max_borrow_tokens
            .cast::<i128>()?
            .safe_sub(borrow_token_amount.cast()?)?,
        withdraw_limit: deposit_token_amount
            .cast::<i128>()?
            .safe_sub(min_deposit_tokens.cast()?)?,
    })
}

/// Quote value of a signed token amount at the oracle price
/// Precision: MARK_PRICE_PRECISION
pub fn get_token_value(
    token_amount: i128,
    spot_decimals: u8,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<i128> {
    if token_amount == 0 {
        return Ok(0);
    }

    let precision_decrease = 10_i128.safe_pow(spot_decimals as u32)?;

    token_amount
        .safe_mul(oracle_price_data.price)?
        .safe_div(precision_decrease)
}

/// Like `get_token_value` but values assets at min(oracle, twap) and liabilities at
/// max(oracle, twap)
pub fn get_strict_token_value(
    token_amount: i128,
    spot_decimals: u8,
    oracle_price_data: &OraclePriceData,
    oracle_price_twap: i128,
) -> RiskMathResult<i128> {
    if token_amount == 0 {
        return Ok(0);
    }

    if oracle_price_twap <= 0 {
        msg!(
            "oracle_price_data={:?} oracle_price_twap={} (<= 0)",
            oracle_price_data,
            oracle_price_twap
        );
        return Err(RiskMathError::InvalidOracle);
    }

    let precision_decrease = 10_i128.safe_pow(spot_decimals as u32)?;

    let price = if token_amount > 0 {
        oracle_price_data.price.min(oracle_price_twap)
    } else {
        oracle_price_data.price.max(oracle_price_twap)
    };

    token_amount.safe_mul(price)?.safe_div(precision_decrease)
}

/// (value, token amount) of a spot position. Value is unsigned.
pub fn get_balance_value_and_token_amount(
    spot_position: &SpotPosition,
    spot_market: &SpotMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<(u128, u128)> {
    let token_amount = spot_position.get_token_amount(spot_market)?;

    let precision_decrease = ten_pow(spot_market.decimals as u32)?;

    let value = token_amount
        .safe_mul(oracle_price_data.price.cast()?)?
        .safe_div(precision_decrease)?;

    Ok((value, token_amount))
}

pub fn get_balance_value(
    spot_position: &SpotPosition,
    spot_market: &SpotMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    let (value, _) =
        get_balance_value_and_token_amount(spot_position, spot_market, oracle_price_data)?;
    Ok(value)
}
