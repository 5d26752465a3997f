pub mod amm;
pub mod auction;
pub mod fixed_point;
pub mod fulfillment;
pub mod margin;
pub mod market;
pub mod rounding;
pub mod safe_math;
pub mod spot_balance;

pub use amm::*;
pub use auction::*;
pub use fixed_point::*;
pub use fulfillment::*;
pub use margin::*;
pub use market::*;
pub use rounding::*;
pub use safe_math::*;
pub use spot_balance::*;
