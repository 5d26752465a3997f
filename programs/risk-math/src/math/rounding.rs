use crate::error::RiskMathResult;
use crate::math::safe_math::SafeMath;

/// Rounding policy applied after a truncating fixed-point division.
///
/// `Up` adds one unit to the floored quotient. It always favors the protocol: borrowers
/// never owe less than they borrowed and borrow interest never accrues as zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundDirection {
    Down,
    Up,
}

impl RoundDirection {
    /// Adjust a floored quotient unconditionally.
    pub fn adjust(self, floored: u128) -> RiskMathResult<u128> {
        match self {
            RoundDirection::Down => Ok(floored),
            RoundDirection::Up => floored.safe_add(1),
        }
    }

    /// Adjust a floored quotient, leaving zero at zero.
    pub fn adjust_nonzero(self, floored: u128) -> RiskMathResult<u128> {
        if floored == 0 {
            return Ok(0);
        }
        self.adjust(floored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust() {
        assert_eq!(RoundDirection::Down.adjust(10).unwrap(), 10);
        assert_eq!(RoundDirection::Up.adjust(10).unwrap(), 11);
        assert_eq!(RoundDirection::Up.adjust(0).unwrap(), 1);
        assert!(RoundDirection::Up.adjust(u128::MAX).is_err());
    }

    #[test]
    fn test_adjust_nonzero() {
        assert_eq!(RoundDirection::Up.adjust_nonzero(0).unwrap(), 0);
        assert_eq!(RoundDirection::Up.adjust_nonzero(7).unwrap(), 8);
        assert_eq!(RoundDirection::Down.adjust_nonzero(7).unwrap(), 7);
    }
}
