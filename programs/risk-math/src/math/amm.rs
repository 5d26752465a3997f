//! Virtual AMM curve
//!
//! Constant product over `base * quote = sqrt_k^2` with a peg multiplier scaling the quote
//! side into price space. All functions return new values; the input `Amm` is never
//! touched.

use solana_program::msg;

use crate::{
    constants::{
        AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO, AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128,
        BID_ASK_SPREAD_PRECISION, BID_ASK_SPREAD_PRECISION_I128, PRICE_TO_PEG_PRECISION_RATIO,
    },
    error::{RiskMathError, RiskMathResult},
    math::safe_math::{Cast, SafeMath},
    state::{Amm, AssetType, OraclePriceData, PositionDirection, SwapDirection},
};

/// Price implied by a pair of reserves
/// Precision: MARK_PRICE_PRECISION
pub fn calculate_price(
    base_asset_reserve: u128,
    quote_asset_reserve: u128,
    peg_multiplier: u128,
) -> RiskMathResult<u128> {
    if base_asset_reserve == 0 {
        msg!("Cannot price an AMM with an empty base reserve");
        return Err(RiskMathError::DivisionByZero);
    }

    quote_asset_reserve
        .safe_mul(peg_multiplier)?
        .safe_mul(PRICE_TO_PEG_PRECISION_RATIO)?
        .safe_div(base_asset_reserve)
}

/// (new input reserve, new output reserve) after moving `swap_amount` into or out of
/// the input reserve
pub fn calculate_swap_output(
    input_asset_reserve: u128,
    swap_amount: u128,
    direction: SwapDirection,
    invariant: u128,
) -> RiskMathResult<(u128, u128)> {
    let new_input_asset_reserve = match direction {
        SwapDirection::Add => input_asset_reserve.safe_add(swap_amount)?,
        SwapDirection::Remove => input_asset_reserve.safe_sub(swap_amount)?,
    };

    let new_output_asset_reserve = invariant.safe_div(new_input_asset_reserve)?;

    Ok((new_input_asset_reserve, new_output_asset_reserve))
}

/// (quote reserve, base reserve) after a swap denominated in `asset_type`
pub fn calculate_amm_reserves_after_swap(
    amm: &Amm,
    asset_type: AssetType,
    swap_amount: u128,
    swap_direction: SwapDirection,
) -> RiskMathResult<(u128, u128)> {
    let invariant = amm.sqrt_k.safe_mul(amm.sqrt_k)?;

    match asset_type {
        AssetType::Quote => {
            let swap_amount = swap_amount
                .safe_mul(AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO)?
                .safe_div(amm.peg_multiplier)?;

            calculate_swap_output(
                amm.quote_asset_reserve,
                swap_amount,
                swap_direction,
                invariant,
            )
        }
        AssetType::Base => {
            let (new_base_asset_reserve, new_quote_asset_reserve) = calculate_swap_output(
                amm.base_asset_reserve,
                swap_amount,
                swap_direction,
                invariant,
            )?;

            Ok((new_quote_asset_reserve, new_base_asset_reserve))
        }
    }
}

pub fn get_swap_direction(
    input_asset_type: AssetType,
    position_direction: PositionDirection,
) -> SwapDirection {
    match (position_direction, input_asset_type) {
        (PositionDirection::Long, AssetType::Base) => SwapDirection::Remove,
        (PositionDirection::Short, AssetType::Quote) => SwapDirection::Remove,
        _ => SwapDirection::Add,
    }
}

/// Peg that would put the reserve price on the oracle price
pub fn calculate_target_peg(
    amm: &Amm,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    let oracle_price = oracle_price_data.price.cast::<u128>()?;

    let target_peg = oracle_price
        .safe_mul(amm.base_asset_reserve)?
        .safe_div(amm.quote_asset_reserve.safe_mul(PRICE_TO_PEG_PRECISION_RATIO)?)?;

    Ok(target_peg.max(1))
}

/// Quote reserve the AMM would hold if every user closed their position
pub fn calculate_terminal_quote_asset_reserve(amm: &Amm) -> RiskMathResult<u128> {
    let terminal_base_asset_reserve = amm
        .base_asset_reserve
        .cast::<i128>()?
        .safe_add(amm.base_asset_amount_with_amm)?
        .cast::<u128>()?;

    amm.sqrt_k
        .safe_mul(amm.sqrt_k)?
        .safe_div(terminal_base_asset_reserve)
}

/// Quote cost to the protocol of moving the peg. Negative means the repeg earns fees.
/// Precision: QUOTE_PRECISION
pub fn calculate_repeg_cost(amm: &Amm, new_peg_multiplier: u128) -> RiskMathResult<i128> {
    let terminal_quote_asset_reserve = calculate_terminal_quote_asset_reserve(amm)?;

    let delta_quote_asset_reserve = amm
        .quote_asset_reserve
        .cast::<i128>()?
        .safe_sub(terminal_quote_asset_reserve.cast()?)?;

    let delta_peg_multiplier = new_peg_multiplier
        .cast::<i128>()?
        .safe_sub(amm.peg_multiplier.cast()?)?;

    delta_quote_asset_reserve
        .safe_mul(delta_peg_multiplier)?
        .safe_div(AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128)
}

/// Fees available to pay for a repeg; half the exchange fees are never spent
pub fn calculate_repeg_budget(amm: &Amm) -> RiskMathResult<u128> {
    let reserved = amm.total_exchange_fee.safe_div(2)?.cast::<i128>()?;

    Ok(amm
        .total_fee_minus_distributions
        .safe_sub(reserved)?
        .max(0)
        .unsigned_abs())
}

/// Copy of `amm` repegged toward the oracle.
///
/// A repeg that costs more than the fee budget only moves the peg as far as the budget
/// pays for. The cost is debited from `total_fee_minus_distributions`.
pub fn calculate_updated_amm(
    amm: &Amm,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<Amm> {
    if amm.curve_update_intensity == 0 {
        return Ok(*amm);
    }

    if oracle_price_data.price <= 0 {
        msg!("Oracle price {} is not positive", oracle_price_data.price);
        return Err(RiskMathError::InvalidOracle);
    }

    let target_peg = calculate_target_peg(amm, oracle_price_data)?;
    if target_peg == amm.peg_multiplier {
        return Ok(*amm);
    }

    let budget = calculate_repeg_budget(amm)?.cast::<i128>()?;

    let mut new_peg_multiplier = target_peg;
    let mut cost = calculate_repeg_cost(amm, new_peg_multiplier)?;

    if cost > budget {
        let terminal_quote_asset_reserve = calculate_terminal_quote_asset_reserve(amm)?;
        let delta_quote_asset_reserve = amm
            .quote_asset_reserve
            .cast::<i128>()?
            .safe_sub(terminal_quote_asset_reserve.cast()?)?
            .unsigned_abs();

        // cost > budget >= 0 means the reserve delta is nonzero
        let max_peg_delta = budget
            .unsigned_abs()
            .safe_mul(AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO)?
            .safe_div(delta_quote_asset_reserve)?;

        new_peg_multiplier = if target_peg > amm.peg_multiplier {
            amm.peg_multiplier
                .safe_add(max_peg_delta)?
                .min(target_peg)
        } else {
            amm.peg_multiplier
                .saturating_sub(max_peg_delta)
                .max(target_peg)
                .max(1)
        };

        cost = calculate_repeg_cost(amm, new_peg_multiplier)?;
    }

    let mut new_amm = *amm;
    new_amm.peg_multiplier = new_peg_multiplier;
    new_amm.total_fee_minus_distributions = amm.total_fee_minus_distributions.safe_sub(cost)?;

    Ok(new_amm)
}

/// (long spread, short spread) around `reserve_price`.
///
/// Starts from half the base spread per side. The side that trades against a reserve
/// price sitting on the wrong side of the oracle is widened by that gap plus the oracle
/// confidence. The total is capped at `max_spread`.
/// Precision: BID_ASK_SPREAD_PRECISION
pub fn calculate_spread(
    amm: &Amm,
    oracle_price_data: &OraclePriceData,
    reserve_price: u128,
) -> RiskMathResult<(u128, u128)> {
    let mut long_spread = (amm.base_spread as u128).safe_div(2)?;
    let mut short_spread = long_spread;

    let reserve_price_i128 = reserve_price.cast::<i128>()?;

    let oracle_reserve_price_spread_pct = reserve_price_i128
        .safe_sub(oracle_price_data.price)?
        .safe_mul(BID_ASK_SPREAD_PRECISION_I128)?
        .safe_div(reserve_price_i128)?;

    let confidence_pct = oracle_price_data
        .confidence
        .safe_mul(BID_ASK_SPREAD_PRECISION)?
        .safe_div(reserve_price)?;

    let widened = oracle_reserve_price_spread_pct
        .unsigned_abs()
        .safe_add(confidence_pct)?;

    if oracle_reserve_price_spread_pct < 0 {
        long_spread = long_spread.max(widened);
    } else {
        short_spread = short_spread.max(widened);
    }

    let max_spread = amm.max_spread as u128;
    let total_spread = long_spread.safe_add(short_spread)?;

    if total_spread > max_spread {
        long_spread = long_spread.safe_mul(max_spread)?.safe_div(total_spread)?;
        short_spread = short_spread.safe_mul(max_spread)?.safe_div(total_spread)?;
    }

    Ok((long_spread, short_spread))
}

/// (base reserve, quote reserve) shifted by half of `spread` against the taker
pub fn calculate_spread_reserves(
    amm: &Amm,
    direction: PositionDirection,
    spread: u128,
) -> RiskMathResult<(u128, u128)> {
    if spread == 0 {
        return Ok((amm.base_asset_reserve, amm.quote_asset_reserve));
    }

    let half_spread = spread.safe_div(2)?.max(1);

    let quote_asset_reserve_delta = amm
        .quote_asset_reserve
        .safe_mul(half_spread)?
        .safe_div(BID_ASK_SPREAD_PRECISION)?;

    let quote_asset_reserve = match direction {
        PositionDirection::Long => amm.quote_asset_reserve.safe_add(quote_asset_reserve_delta)?,
        PositionDirection::Short => amm.quote_asset_reserve.safe_sub(quote_asset_reserve_delta)?,
    };

    let base_asset_reserve = amm.sqrt_k.safe_mul(amm.sqrt_k)?.safe_div(quote_asset_reserve)?;

    Ok((base_asset_reserve, quote_asset_reserve))
}

/// Spread-adjusted reserves and the peg they price against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpreadReserves {
    pub base_asset_reserve: u128,
    pub quote_asset_reserve: u128,
    pub new_peg: u128,
}

/// Repeg toward the oracle, then shift the reserves by the side's spread
pub fn calculate_updated_amm_spread_reserves(
    amm: &Amm,
    direction: PositionDirection,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<SpreadReserves> {
    let new_amm = calculate_updated_amm(amm, oracle_price_data)?;

    let reserve_price = calculate_price(
        new_amm.base_asset_reserve,
        new_amm.quote_asset_reserve,
        new_amm.peg_multiplier,
    )?;

    let (long_spread, short_spread) = calculate_spread(&new_amm, oracle_price_data, reserve_price)?;

    let spread = match direction {
        PositionDirection::Long => long_spread,
        PositionDirection::Short => short_spread,
    };

    let (base_asset_reserve, quote_asset_reserve) =
        calculate_spread_reserves(&new_amm, direction, spread)?;

    Ok(SpreadReserves {
        base_asset_reserve,
        quote_asset_reserve,
        new_peg: new_amm.peg_multiplier,
    })
}
