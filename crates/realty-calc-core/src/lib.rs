pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "summary")]
pub mod summary;

#[cfg(feature = "session")]
pub mod analysis;

#[cfg(feature = "session")]
pub mod session;

pub use error::RealtyCalcError;
pub use types::*;

/// Standard result type for all realty-calc operations
pub type RealtyCalcResult<T> = Result<T, RealtyCalcError>;
