pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "savings")]
pub mod savings;

pub use error::DollarMentoError;
pub use types::*;

/// Standard result type for all DollarMento calculations
pub type DollarMentoResult<T> = Result<T, DollarMentoError>;
