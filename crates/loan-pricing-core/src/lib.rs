pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use error::LoanPricingError;
pub use types::*;

/// Standard result type for all loan-pricing operations
pub type LoanPricingResult<T> = Result<T, LoanPricingError>;
