use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::RiskMathError;

/// Which margin requirement a weight or ratio is computed for
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarginCategory {
    #[default]
    Initial,
    Maintenance,
}

impl TryFrom<u8> for MarginCategory {
    type Error = RiskMathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MarginCategory::Initial),
            1 => Ok(MarginCategory::Maintenance),
            _ => Err(RiskMathError::InvalidMarginCategory),
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionDirection {
    #[default]
    Long,
    Short,
}

impl TryFrom<u8> for PositionDirection {
    type Error = RiskMathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PositionDirection::Long),
            1 => Ok(PositionDirection::Short),
            _ => Err(RiskMathError::InvalidPositionDirection),
        }
    }
}

/// Whether a swap adds to or removes from the input reserve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    Add,
    Remove,
}

/// Which side of the AMM a swap amount is denominated in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetType {
    Base,
    Quote,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarketType {
    #[default]
    Spot,
    Perp,
}
