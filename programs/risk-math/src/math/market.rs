//! Perp market prices and aggregate user pnl

use crate::{
    constants::{
        BASE_PRECISION_I128, MARK_PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO,
        PRICE_TO_QUOTE_PRECISION_RATIO_I128,
    },
    error::RiskMathResult,
    math::{
        amm::{
            calculate_amm_reserves_after_swap, calculate_price, calculate_updated_amm,
            calculate_updated_amm_spread_reserves, get_swap_direction,
        },
        safe_math::{Cast, SafeMath},
        spot_balance::get_token_amount,
    },
    state::{
        AssetType, OraclePriceData, PerpMarket, PositionDirection, SpotBalanceType, SpotMarket,
    },
};

/// Mark price after repegging toward the oracle
/// Precision: MARK_PRICE_PRECISION
pub fn calculate_reserve_price(
    market: &PerpMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    let new_amm = calculate_updated_amm(&market.amm, oracle_price_data)?;

    calculate_price(
        new_amm.base_asset_reserve,
        new_amm.quote_asset_reserve,
        new_amm.peg_multiplier,
    )
}

fn calculate_spread_price(
    market: &PerpMarket,
    direction: PositionDirection,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    let reserves =
        calculate_updated_amm_spread_reserves(&market.amm, direction, oracle_price_data)?;

    calculate_price(
        reserves.base_asset_reserve,
        reserves.quote_asset_reserve,
        reserves.new_peg,
    )
}

/// Price a taker sells at
/// Precision: MARK_PRICE_PRECISION
pub fn calculate_bid_price(
    market: &PerpMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    calculate_spread_price(market, PositionDirection::Short, oracle_price_data)
}

/// Price a taker buys at
/// Precision: MARK_PRICE_PRECISION
pub fn calculate_ask_price(
    market: &PerpMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u128> {
    calculate_spread_price(market, PositionDirection::Long, oracle_price_data)
}

/// What-if copy of `market` after trading `|base_asset_amount|` against the AMM.
///
/// Only the AMM reserves change.
pub fn calculate_new_market_after_trade(
    base_asset_amount: i128,
    direction: PositionDirection,
    market: &PerpMarket,
) -> RiskMathResult<PerpMarket> {
    let (new_quote_asset_reserve, new_base_asset_reserve) = calculate_amm_reserves_after_swap(
        &market.amm,
        AssetType::Base,
        base_asset_amount.unsigned_abs(),
        get_swap_direction(AssetType::Base, direction),
    )?;

    let mut new_market = *market;
    new_market.amm.quote_asset_reserve = new_quote_asset_reserve;
    new_market.amm.base_asset_reserve = new_base_asset_reserve;

    Ok(new_market)
}

pub fn calculate_oracle_spread(
    price: u128,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<i128> {
    price.cast::<i128>()?.safe_sub(oracle_price_data.price)
}

/// Reserve price minus oracle price
/// Precision: MARK_PRICE_PRECISION
pub fn calculate_oracle_reserve_spread(
    market: &PerpMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<i128> {
    let reserve_price = calculate_reserve_price(market, oracle_price_data)?;
    calculate_oracle_spread(reserve_price, oracle_price_data)
}

/// Aggregate unrealized pnl of every user against the AMM, at the oracle price
/// Precision: QUOTE_PRECISION
pub fn calculate_net_user_pnl(
    perp_market: &PerpMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<i128> {
    let net_user_position_value = perp_market
        .amm
        .base_asset_amount_with_amm
        .safe_mul(oracle_price_data.price)?
        .safe_div(BASE_PRECISION_I128)?
        .safe_div(PRICE_TO_QUOTE_PRECISION_RATIO_I128)?;

    let net_user_cost_basis = perp_market.amm.quote_asset_amount;

    net_user_position_value.safe_add(net_user_cost_basis)
}

/// Token amount held by the market's pnl pool
/// Precision: QUOTE_PRECISION
pub fn calculate_market_available_pnl(
    perp_market: &PerpMarket,
    spot_market: &SpotMarket,
) -> RiskMathResult<u128> {
    get_token_amount(
        perp_market.pnl_pool.scaled_balance,
        spot_market,
        &SpotBalanceType::Deposit,
    )
}

/// How far aggregate user pnl outruns the pnl pool. Positive means users could not all
/// be paid out.
/// Precision: QUOTE_PRECISION
pub fn calculate_net_user_pnl_imbalance(
    perp_market: &PerpMarket,
    spot_market: &SpotMarket,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<i128> {
    let net_user_pnl = calculate_net_user_pnl(perp_market, oracle_price_data)?;
    let pnl_pool = calculate_market_available_pnl(perp_market, spot_market)?;

    net_user_pnl.safe_sub(pnl_pool.cast()?)
}

/// Unsigned quote value of a base position at `oracle_price`
/// Precision: QUOTE_PRECISION
pub fn calculate_base_asset_value_with_oracle_price(
    base_asset_amount: i128,
    oracle_price: i128,
) -> RiskMathResult<u128> {
    base_asset_amount
        .unsigned_abs()
        .safe_mul(oracle_price.unsigned_abs())?
        .safe_div(MARK_PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        AMM_RESERVE_PRECISION, MARK_PRICE_PRECISION, PEG_PRECISION, QUOTE_PRECISION,
        QUOTE_PRECISION_I128,
    };
    use crate::state::{Amm, PoolBalance};

    fn market() -> PerpMarket {
        PerpMarket {
            amm: Amm {
                base_asset_reserve: 1_000_000 * AMM_RESERVE_PRECISION,
                quote_asset_reserve: 1_000_000 * AMM_RESERVE_PRECISION,
                sqrt_k: 1_000_000 * AMM_RESERVE_PRECISION,
                peg_multiplier: 20 * PEG_PRECISION,
                base_spread: 2_000,
                max_spread: 100_000,
                ..Amm::default()
            },
            ..PerpMarket::default()
        }
    }

    fn oracle(price: i128) -> OraclePriceData {
        OraclePriceData {
            price,
            confidence: 0,
            slot: 0,
        }
    }

    #[test]
    fn test_prices_bracket() {
        let market = market();
        let oracle = oracle(20 * MARK_PRICE_PRECISION as i128);

        let reserve = calculate_reserve_price(&market, &oracle).unwrap();
        let bid = calculate_bid_price(&market, &oracle).unwrap();
        let ask = calculate_ask_price(&market, &oracle).unwrap();

        assert_eq!(reserve, 20 * MARK_PRICE_PRECISION);
        assert!(bid <= reserve);
        assert!(reserve <= ask);
        assert_eq!(calculate_oracle_reserve_spread(&market, &oracle).unwrap(), 0);
    }

    #[test]
    fn test_new_market_after_trade() {
        let market = market();
        let before = market;

        let after_long = calculate_new_market_after_trade(
            -(1_000 * AMM_RESERVE_PRECISION as i128),
            PositionDirection::Long,
            &market,
        )
        .unwrap();

        assert_eq!(market, before);
        assert_eq!(
            after_long.amm.base_asset_reserve,
            market.amm.base_asset_reserve - 1_000 * AMM_RESERVE_PRECISION
        );
        assert!(after_long.amm.quote_asset_reserve > market.amm.quote_asset_reserve);
        assert_eq!(after_long.amm.sqrt_k, market.amm.sqrt_k);
        assert_eq!(after_long.margin_ratio_initial, market.margin_ratio_initial);

        let after_short = calculate_new_market_after_trade(
            1_000 * AMM_RESERVE_PRECISION as i128,
            PositionDirection::Short,
            &market,
        )
        .unwrap();
        assert!(after_short.amm.quote_asset_reserve < market.amm.quote_asset_reserve);
    }

    #[test]
    fn test_net_user_pnl() {
        let mut market = market();
        // users long 10 base, paid $190
        market.amm.base_asset_amount_with_amm = 10 * AMM_RESERVE_PRECISION as i128;
        market.amm.quote_asset_amount = -190 * QUOTE_PRECISION_I128;

        let oracle = oracle(20 * MARK_PRICE_PRECISION as i128);
        let pnl = calculate_net_user_pnl(&market, &oracle).unwrap();
        assert_eq!(pnl, 10 * QUOTE_PRECISION_I128);
    }

    #[test]
    fn test_imbalance_zero_when_pool_covers_pnl() {
        let mut market = market();
        market.amm.base_asset_amount_with_amm = 10 * AMM_RESERVE_PRECISION as i128;
        market.amm.quote_asset_amount = -190 * QUOTE_PRECISION_I128;

        let quote_market = SpotMarket::default();
        // 6 decimals at baseline index: scaled balance = tokens * 1e10 / 1e10
        market.pnl_pool = PoolBalance {
            scaled_balance: 10 * QUOTE_PRECISION,
            market_index: 0,
        };

        let oracle = oracle(20 * MARK_PRICE_PRECISION as i128);
        assert_eq!(
            calculate_market_available_pnl(&market, &quote_market).unwrap(),
            10 * QUOTE_PRECISION
        );
        assert_eq!(
            calculate_net_user_pnl_imbalance(&market, &quote_market, &oracle).unwrap(),
            0
        );
    }

    #[test]
    fn test_base_asset_value_with_oracle_price() {
        let value = calculate_base_asset_value_with_oracle_price(
            -(2 * AMM_RESERVE_PRECISION as i128),
            30 * MARK_PRICE_PRECISION as i128,
        )
        .unwrap();
        assert_eq!(value, 60 * QUOTE_PRECISION);
    }
}
