//! Size-adjusted margin weights
//!
//! Large positions are riskier to unwind, so asset weights decay and liability weights
//! grow with `sqrt(size)` scaled by the market's imf factor.

use solana_program::msg;

use crate::{
    constants::{
        AMM_RESERVE_PRECISION, MARGIN_PRECISION, SIZE_CURVE_SQRT_DENOMINATOR, SPOT_IMF_PRECISION,
        SPOT_WEIGHT_PRECISION,
    },
    error::{RiskMathError, RiskMathResult},
    math::{
        fixed_point::{rescale_precision, sqrt_u128, ten_pow},
        market::calculate_net_user_pnl_imbalance,
        safe_math::{Cast, SafeMath},
    },
    state::{MarginCategory, MarketAccount, OraclePriceData, PerpMarket, SpotMarket},
};

fn size_sqrt(size: u128) -> RiskMathResult<u128> {
    Ok(sqrt_u128(size.safe_mul(10)?.safe_add(1)?))
}

/// Shrink an asset weight as `size` grows. Never exceeds `asset_weight`.
///
/// size: AMM_RESERVE_PRECISION
/// imf_factor: SPOT_IMF_PRECISION
/// asset_weight: SPOT_WEIGHT_PRECISION
pub fn calculate_size_discount_asset_weight(
    size: u128,
    imf_factor: u32,
    asset_weight: u32,
) -> RiskMathResult<u32> {
    if imf_factor == 0 {
        return Ok(asset_weight);
    }

    let size_sqrt = size_sqrt(size)?;
    let imf_numerator = SPOT_IMF_PRECISION.safe_add(SPOT_IMF_PRECISION.safe_div(10)?)?;

    let size_discount_asset_weight = imf_numerator
        .safe_mul(SPOT_WEIGHT_PRECISION)?
        .safe_div(
            SPOT_IMF_PRECISION.safe_add(
                size_sqrt
                    .safe_mul(imf_factor as u128)?
                    .safe_div(SIZE_CURVE_SQRT_DENOMINATOR)?,
            )?,
        )?;

    Ok(size_discount_asset_weight
        .min(asset_weight as u128)
        .cast::<u32>()?)
}

/// Grow a liability weight (or margin ratio) as `size` grows. Never falls below
/// `liability_weight`.
///
/// `precision` is the fixed-point scale of `liability_weight`.
pub fn calculate_size_premium_liability_weight(
    size: u128,
    imf_factor: u32,
    liability_weight: u32,
    precision: u128,
) -> RiskMathResult<u32> {
    if imf_factor == 0 {
        return Ok(liability_weight);
    }

    let size_sqrt = size_sqrt(size)?;
    let liability_weight = liability_weight as u128;

    let liability_weight_numerator = liability_weight.safe_sub(liability_weight.safe_div(5)?)?;

    let denominator = SIZE_CURVE_SQRT_DENOMINATOR
        .safe_mul(SPOT_IMF_PRECISION)?
        .safe_div(precision)?;

    let size_premium_liability_weight = liability_weight_numerator.safe_add(
        size_sqrt
            .safe_mul(imf_factor as u128)?
            .safe_div(denominator)?,
    )?;

    size_premium_liability_weight
        .max(liability_weight)
        .cast::<u32>()
}

fn get_size_in_amm_reserve_precision(
    balance_amount: u128,
    spot_market: &SpotMarket,
) -> RiskMathResult<u128> {
    let size_precision = ten_pow(spot_market.decimals as u32)?;
    rescale_precision(balance_amount, size_precision, AMM_RESERVE_PRECISION)
}

/// Asset weight for a token amount
/// Precision: SPOT_WEIGHT_PRECISION
pub fn calculate_asset_weight(
    balance_amount: u128,
    spot_market: &SpotMarket,
    margin_category: MarginCategory,
) -> RiskMathResult<u32> {
    let size_in_amm_reserve_precision =
        get_size_in_amm_reserve_precision(balance_amount, spot_market)?;

    let asset_weight = match margin_category {
        MarginCategory::Initial => spot_market.initial_asset_weight,
        MarginCategory::Maintenance => spot_market.maintenance_asset_weight,
    };

    calculate_size_discount_asset_weight(
        size_in_amm_reserve_precision,
        spot_market.imf_factor,
        asset_weight,
    )
}

/// Liability weight for a token amount
/// Precision: SPOT_WEIGHT_PRECISION
pub fn calculate_liability_weight(
    balance_amount: u128,
    spot_market: &SpotMarket,
    margin_category: MarginCategory,
) -> RiskMathResult<u32> {
    let size_in_amm_reserve_precision =
        get_size_in_amm_reserve_precision(balance_amount, spot_market)?;

    let liability_weight = match margin_category {
        MarginCategory::Initial => spot_market.initial_liability_weight,
        MarginCategory::Maintenance => spot_market.maintenance_liability_weight,
    };

    calculate_size_premium_liability_weight(
        size_in_amm_reserve_precision,
        spot_market.imf_factor,
        liability_weight,
        SPOT_WEIGHT_PRECISION,
    )
}

/// Decodes a raw category discriminant. Unknown values fall back to the initial weight
/// without the size adjustment.
pub fn calculate_asset_weight_for_raw_category(
    balance_amount: u128,
    spot_market: &SpotMarket,
    margin_category: u8,
) -> RiskMathResult<u32> {
    match MarginCategory::try_from(margin_category) {
        Ok(margin_category) => calculate_asset_weight(balance_amount, spot_market, margin_category),
        Err(_) => Ok(spot_market.initial_asset_weight),
    }
}

/// See `calculate_asset_weight_for_raw_category`
pub fn calculate_liability_weight_for_raw_category(
    balance_amount: u128,
    spot_market: &SpotMarket,
    margin_category: u8,
) -> RiskMathResult<u32> {
    match MarginCategory::try_from(margin_category) {
        Ok(margin_category) => {
            calculate_liability_weight(balance_amount, spot_market, margin_category)
        }
        Err(_) => Ok(spot_market.initial_liability_weight),
    }
}

/// Margin ratio implied by a spot liability weight, `1 / (w - 1)` in fixed point
/// Precision: MARGIN_PRECISION
pub fn get_spot_market_margin_ratio(
    spot_market: &SpotMarket,
    margin_category: MarginCategory,
) -> RiskMathResult<u32> {
    let liability_weight = match margin_category {
        MarginCategory::Initial => spot_market.initial_liability_weight,
        MarginCategory::Maintenance => spot_market.maintenance_liability_weight,
    } as u128;

    if liability_weight <= SPOT_WEIGHT_PRECISION {
        msg!(
            "Spot market {} liability weight {} must exceed {}",
            spot_market.market_index,
            liability_weight,
            SPOT_WEIGHT_PRECISION
        );
        return Err(RiskMathError::InvalidSpotMarketConfig);
    }

    MARGIN_PRECISION
        .safe_mul(SPOT_WEIGHT_PRECISION)?
        .safe_div(liability_weight.safe_sub(SPOT_WEIGHT_PRECISION)?)?
        .cast()
}

/// Size-adjusted margin ratio for a perp or spot market
/// Precision: MARGIN_PRECISION
pub fn calculate_market_margin_ratio(
    market: MarketAccount,
    size: u128,
    margin_category: MarginCategory,
) -> RiskMathResult<u32> {
    let margin_ratio = match (market, margin_category) {
        (MarketAccount::Perp(perp_market), MarginCategory::Initial) => {
            perp_market.margin_ratio_initial
        }
        (MarketAccount::Perp(perp_market), MarginCategory::Maintenance) => {
            perp_market.margin_ratio_maintenance
        }
        (MarketAccount::Spot(spot_market), margin_category) => {
            get_spot_market_margin_ratio(spot_market, margin_category)?
        }
    };

    calculate_size_premium_liability_weight(
        size,
        market.imf_factor(),
        margin_ratio,
        MARGIN_PRECISION,
    )
}

/// Raw discriminant variant of `calculate_market_margin_ratio`. Unknown categories are
/// rejected.
pub fn calculate_market_margin_ratio_for_raw_category(
    market: MarketAccount,
    size: u128,
    margin_category: u8,
) -> RiskMathResult<u32> {
    let margin_category = MarginCategory::try_from(margin_category).map_err(|e| {
        msg!("Unknown margin category {}", margin_category);
        e
    })?;

    calculate_market_margin_ratio(market, size, margin_category)
}

/// Weight applied to a user's positive unrealized pnl.
///
/// Under Initial the weight is haircut by how far aggregate user pnl outruns the pnl
/// pool, then discounted by the pnl size.
/// Precision: SPOT_WEIGHT_PRECISION
pub fn calculate_unrealized_asset_weight(
    perp_market: &PerpMarket,
    quote_spot_market: &SpotMarket,
    unrealized_pnl: i128,
    margin_category: MarginCategory,
    oracle_price_data: &OraclePriceData,
) -> RiskMathResult<u32> {
    let asset_weight = match margin_category {
        MarginCategory::Initial => {
            let mut asset_weight = perp_market.unrealized_pnl_initial_asset_weight as u128;

            if perp_market.unrealized_pnl_max_imbalance > 0 {
                let net_unsettled_pnl = calculate_net_user_pnl_imbalance(
                    perp_market,
                    quote_spot_market,
                    oracle_price_data,
                )?;

                if net_unsettled_pnl > perp_market.unrealized_pnl_max_imbalance.cast::<i128>()? {
                    asset_weight = asset_weight
                        .safe_mul(perp_market.unrealized_pnl_max_imbalance)?
                        .safe_div(net_unsettled_pnl.cast()?)?;
                }
            }

            calculate_size_discount_asset_weight(
                unrealized_pnl.unsigned_abs(),
                perp_market.unrealized_pnl_imf_factor,
                asset_weight.cast()?,
            )?
        }
        MarginCategory::Maintenance => perp_market.unrealized_pnl_maintenance_asset_weight,
    };

    Ok(asset_weight)
}

/// `margin_requirement * (1 + buffer_ratio)`
/// buffer_ratio: MARGIN_PRECISION
pub fn get_margin_requirement_plus_buffer(
    margin_requirement: u128,
    buffer_ratio: u128,
) -> RiskMathResult<u128> {
    margin_requirement.safe_add(
        margin_requirement
            .safe_mul(buffer_ratio)?
            .safe_div(MARGIN_PRECISION)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol_market() -> SpotMarket {
        SpotMarket {
            decimals: 9,
            imf_factor: 1_000,
            initial_asset_weight: 8_000,
            maintenance_asset_weight: 9_000,
            initial_liability_weight: 12_000,
            maintenance_liability_weight: 11_000,
            ..SpotMarket::default()
        }
    }

    #[test]
    fn test_size_curves_without_imf() {
        assert_eq!(
            calculate_size_discount_asset_weight(u64::MAX as u128, 0, 8_000).unwrap(),
            8_000
        );
        assert_eq!(
            calculate_size_premium_liability_weight(
                u64::MAX as u128,
                0,
                12_000,
                SPOT_WEIGHT_PRECISION,
            )
            .unwrap(),
            12_000
        );
    }

    #[test]
    fn test_size_discount_monotone() {
        let mut last = u32::MAX;
        for exp in 0..20u32 {
            let size = 10u128.pow(exp);
            let weight = calculate_size_discount_asset_weight(size, 1_000, 8_000).unwrap();
            assert!(weight <= 8_000);
            assert!(weight <= last);
            last = weight;
        }
        assert!(last < 8_000);
    }

    #[test]
    fn test_size_premium_monotone() {
        let mut last = 0;
        for exp in 0..20u32 {
            let size = 10u128.pow(exp);
            let weight =
                calculate_size_premium_liability_weight(size, 1_000, 12_000, SPOT_WEIGHT_PRECISION)
                    .unwrap();
            assert!(weight >= 12_000);
            assert!(weight >= last);
            last = weight;
        }
        assert!(last > 12_000);
    }

    #[test]
    fn test_small_balances_keep_base_weights() {
        let market = sol_market();
        // 1 SOL
        assert_eq!(
            calculate_asset_weight(1_000_000_000, &market, MarginCategory::Initial).unwrap(),
            8_000
        );
        assert_eq!(
            calculate_asset_weight(1_000_000_000, &market, MarginCategory::Maintenance).unwrap(),
            9_000
        );
        assert_eq!(
            calculate_liability_weight(1_000_000_000, &market, MarginCategory::Initial).unwrap(),
            12_000
        );
        assert_eq!(
            calculate_liability_weight(1_000_000_000, &market, MarginCategory::Maintenance)
                .unwrap(),
            11_000
        );
    }

    #[test]
    fn test_large_balances_penalized() {
        let market = sol_market();
        // 100m SOL
        let size = 100_000_000 * 1_000_000_000;
        assert!(calculate_asset_weight(size, &market, MarginCategory::Initial).unwrap() < 8_000);
        assert!(
            calculate_liability_weight(size, &market, MarginCategory::Initial).unwrap() > 12_000
        );
    }

    #[test]
    fn test_raw_category_fallback() {
        let market = sol_market();
        let size = 100_000_000 * 1_000_000_000;
        assert_eq!(
            calculate_asset_weight_for_raw_category(size, &market, 7).unwrap(),
            8_000
        );
        assert_eq!(
            calculate_liability_weight_for_raw_category(size, &market, 7).unwrap(),
            12_000
        );
        assert_eq!(
            calculate_asset_weight_for_raw_category(size, &market, 0).unwrap(),
            calculate_asset_weight(size, &market, MarginCategory::Initial).unwrap()
        );
    }

    #[test]
    fn test_spot_margin_ratio() {
        let market = sol_market();
        // 1 / (1.2 - 1) = 5
        assert_eq!(
            get_spot_market_margin_ratio(&market, MarginCategory::Initial).unwrap(),
            50_000
        );
        // 1 / (1.1 - 1) = 10
        assert_eq!(
            get_spot_market_margin_ratio(&market, MarginCategory::Maintenance).unwrap(),
            100_000
        );

        let bad = SpotMarket {
            initial_liability_weight: 10_000,
            ..sol_market()
        };
        assert_eq!(
            get_spot_market_margin_ratio(&bad, MarginCategory::Initial),
            Err(RiskMathError::InvalidSpotMarketConfig)
        );
    }

    #[test]
    fn test_perp_margin_ratio() {
        let perp_market = PerpMarket {
            margin_ratio_initial: 1_000,
            margin_ratio_maintenance: 500,
            imf_factor: 0,
            ..PerpMarket::default()
        };
        let market = MarketAccount::from(&perp_market);
        assert_eq!(
            calculate_market_margin_ratio(market, 1, MarginCategory::Initial).unwrap(),
            1_000
        );
        assert_eq!(
            calculate_market_margin_ratio(market, 1, MarginCategory::Maintenance).unwrap(),
            500
        );
        assert_eq!(
            calculate_market_margin_ratio_for_raw_category(market, 1, 2),
            Err(RiskMathError::InvalidMarginCategory)
        );
    }

    #[test]
    fn test_margin_requirement_plus_buffer() {
        assert_eq!(get_margin_requirement_plus_buffer(1_000_000, 0).unwrap(), 1_000_000);
        // 2% buffer
        assert_eq!(get_margin_requirement_plus_buffer(1_000_000, 200).unwrap(), 1_020_000);
    }
}
