use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

pub type RiskMathResult<T = ()> = Result<T, RiskMathError>;

/// Broad class of a failure.
///
/// Domain errors are caller or configuration mistakes. Arithmetic errors usually mean the
/// snapshot itself is corrupted or adversarial.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Domain,
    Arithmetic,
}

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq, Eq)]
pub enum RiskMathError {
    // Domain errors (0-99)
    #[error("Spot market decimals exceed the canonical balance precision")]
    InvalidDecimals = 0,

    #[error("Unrecognized margin category")]
    InvalidMarginCategory = 1,

    #[error("Unrecognized balance type")]
    InvalidBalanceType = 2,

    #[error("Invalid oracle price data")]
    InvalidOracle = 3,

    #[error("Invalid spot market configuration")]
    InvalidSpotMarketConfig = 4,

    #[error("Unrecognized position direction")]
    InvalidPositionDirection = 5,

    // Arithmetic errors (100+)
    #[error("Arithmetic overflow")]
    MathOverflow = 100,

    #[error("Arithmetic underflow")]
    MathUnderflow = 101,

    #[error("Division by zero")]
    DivisionByZero = 102,

    #[error("Integer cast failed")]
    CastingFailure = 103,
}

impl RiskMathError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RiskMathError::InvalidDecimals
            | RiskMathError::InvalidMarginCategory
            | RiskMathError::InvalidBalanceType
            | RiskMathError::InvalidOracle
            | RiskMathError::InvalidSpotMarketConfig
            | RiskMathError::InvalidPositionDirection => ErrorKind::Domain,
            RiskMathError::MathOverflow
            | RiskMathError::MathUnderflow
            | RiskMathError::DivisionByZero
            | RiskMathError::CastingFailure => ErrorKind::Arithmetic,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        self.kind() == ErrorKind::Arithmetic
    }
}

impl PrintProgramError for RiskMathError {
    fn print<E>(&self) {
        msg!("RiskMathError: {}", self);
    }
}

impl From<RiskMathError> for ProgramError {
    fn from(e: RiskMathError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RiskMathError {
    fn type_of() -> &'static str {
        "RiskMathError"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RiskMathError::InvalidDecimals.kind(), ErrorKind::Domain);
        assert_eq!(RiskMathError::InvalidMarginCategory.kind(), ErrorKind::Domain);
        assert_eq!(RiskMathError::DivisionByZero.kind(), ErrorKind::Arithmetic);
        assert!(RiskMathError::MathOverflow.is_arithmetic());
        assert!(!RiskMathError::InvalidOracle.is_arithmetic());
    }

    #[test]
    fn test_program_error_round_trip() {
        let program_error: ProgramError = RiskMathError::DivisionByZero.into();
        assert_eq!(program_error, ProgramError::Custom(102));

        let decoded = RiskMathError::from_u32(102).unwrap();
        assert_eq!(decoded, RiskMathError::DivisionByZero);
        assert!(RiskMathError::from_u32(42).is_none());
    }
}
