use crate::error::RiskMathResult;
use crate::math::safe_math::SafeMath;

/// Integer square root, floored.
///
/// Newton's method on u128. Used by the size weight curves where the input is
/// `10 * size + 1` in reserve precision.
pub fn sqrt_u128(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    let mut x = value;
    let mut y = x / 2 + 1;

    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }

    x
}

/// `10^exp` as u128
pub fn ten_pow(exp: u32) -> RiskMathResult<u128> {
    10_u128.safe_pow(exp)
}

/// Rescale `amount` from `from_precision` into `to_precision`.
///
/// Divides down when the source is finer than the target and multiplies up otherwise,
/// so truncation only happens once in either direction.
pub fn rescale_precision(
    amount: u128,
    from_precision: u128,
    to_precision: u128,
) -> RiskMathResult<u128> {
    if from_precision > to_precision {
        amount.safe_div(from_precision.safe_div(to_precision)?)
    } else {
        amount.safe_mul(to_precision)?.safe_div(from_precision)
    }
}
