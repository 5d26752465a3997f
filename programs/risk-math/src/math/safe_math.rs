//! Checked arithmetic
//!
//! Every operation in this crate goes through these helpers so overflow and division by
//! zero surface as `RiskMathError` instead of panicking or wrapping.

use solana_program::msg;

use crate::error::{RiskMathError, RiskMathResult};

/// Safe math operations trait
pub trait SafeMath: Sized {
    /// Safe addition with overflow check
    fn safe_add(self, other: Self) -> RiskMathResult<Self>;

    /// Safe subtraction with underflow check
    fn safe_sub(self, other: Self) -> RiskMathResult<Self>;

    /// Safe multiplication with overflow check
    fn safe_mul(self, other: Self) -> RiskMathResult<Self>;

    /// Safe division with zero check. Truncates toward zero.
    fn safe_div(self, other: Self) -> RiskMathResult<Self>;

    /// Safe power with overflow check
    fn safe_pow(self, exp: u32) -> RiskMathResult<Self>;
}

macro_rules! impl_safe_math {
    ($($t:ty),*) => {
        $(
            impl SafeMath for $t {
                #[inline(always)]
                fn safe_add(self, other: Self) -> RiskMathResult<Self> {
                    self.checked_add(other).ok_or_else(|| {
                        msg!("Addition overflow: {} + {}", self, other);
                        RiskMathError::MathOverflow
                    })
                }

                #[inline(always)]
                fn safe_sub(self, other: Self) -> RiskMathResult<Self> {
                    self.checked_sub(other).ok_or_else(|| {
                        msg!("Subtraction underflow: {} - {}", self, other);
                        RiskMathError::MathUnderflow
                    })
                }

                #[inline(always)]
                fn safe_mul(self, other: Self) -> RiskMathResult<Self> {
                    self.checked_mul(other).ok_or_else(|| {
                        msg!("Multiplication overflow: {} * {}", self, other);
                        RiskMathError::MathOverflow
                    })
                }

                #[inline(always)]
                fn safe_div(self, other: Self) -> RiskMathResult<Self> {
                    if other == 0 {
                        msg!("Division by zero: {} / 0", self);
                        return Err(RiskMathError::DivisionByZero);
                    }

                    self.checked_div(other).ok_or_else(|| {
                        msg!("Division overflow: {} / {}", self, other);
                        RiskMathError::MathOverflow
                    })
                }

                #[inline(always)]
                fn safe_pow(self, exp: u32) -> RiskMathResult<Self> {
                    self.checked_pow(exp).ok_or_else(|| {
                        msg!("Power overflow: {} ^ {}", self, exp);
                        RiskMathError::MathOverflow
                    })
                }
            }
        )*
    };
}

impl_safe_math!(u32, u64, u128, i64, i128);

/// Fallible integer conversion
pub trait Cast: Sized {
    #[inline(always)]
    fn cast<T: TryFrom<Self>>(self) -> RiskMathResult<T> {
        T::try_from(self).map_err(|_| {
            msg!("Failed to cast {}", core::any::type_name::<Self>());
            RiskMathError::CastingFailure
        })
    }
}

impl Cast for u8 {}
impl Cast for u16 {}
impl Cast for u32 {}
impl Cast for u64 {}
impl Cast for u128 {}
impl Cast for i64 {}
impl Cast for i128 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_math_u128() {
        assert_eq!(5u128.safe_add(3).unwrap(), 8);
        assert_eq!(5u128.safe_sub(3).unwrap(), 2);
        assert_eq!(5u128.safe_mul(3).unwrap(), 15);
        assert_eq!(5u128.safe_div(3).unwrap(), 1);
        assert_eq!(10u128.safe_pow(3).unwrap(), 1000);

        assert_eq!(u128::MAX.safe_add(1), Err(RiskMathError::MathOverflow));
        assert_eq!(0u128.safe_sub(1), Err(RiskMathError::MathUnderflow));
        assert_eq!(u128::MAX.safe_mul(2), Err(RiskMathError::MathOverflow));
        assert_eq!(1u128.safe_div(0), Err(RiskMathError::DivisionByZero));
    }

    #[test]
    fn test_safe_math_i128_truncates_toward_zero() {
        assert_eq!((-7i128).safe_div(2).unwrap(), -3);
        assert_eq!(7i128.safe_div(-2).unwrap(), -3);
        assert_eq!(i128::MIN.safe_div(-1), Err(RiskMathError::MathOverflow));
    }

    #[test]
    fn test_cast() {
        let value: u32 = 42u128.cast().unwrap();
        assert_eq!(value, 42);

        let too_big: RiskMathResult<u32> = (u32::MAX as u128 + 1).cast();
        assert_eq!(too_big, Err(RiskMathError::CastingFailure));

        let negative: RiskMathResult<u128> = (-1i128).cast();
        assert_eq!(negative, Err(RiskMathError::CastingFailure));
    }
}
