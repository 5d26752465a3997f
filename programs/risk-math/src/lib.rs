// Fixed-point risk math for spot lending and perpetual markets
// Pure functions over account snapshots - no entrypoint, no account mutation

pub mod constants;
pub mod error;
pub mod math;
pub mod state;

pub use error::{ErrorKind, RiskMathError, RiskMathResult};
