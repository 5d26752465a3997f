pub mod fulfillment;
pub mod oracle;
pub mod order;
pub mod perp_market;
pub mod spot_market;
pub mod types;

pub use fulfillment::*;
pub use oracle::*;
pub use order::*;
pub use perp_market::*;
pub use spot_market::*;
pub use types::*;
