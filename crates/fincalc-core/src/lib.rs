pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "discount")]
pub mod discount;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "salary")]
pub mod salary;

#[cfg(feature = "student_loan")]
pub mod student_loan;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
