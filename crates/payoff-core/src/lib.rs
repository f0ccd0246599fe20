pub mod curve;
pub mod error;
pub mod types;

#[cfg(feature = "derivatives")]
pub mod derivatives;

#[cfg(feature = "derivatives")]
pub mod chart;

#[cfg(feature = "tickers")]
pub mod tickers;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::PayoffError;
pub use types::*;

/// Standard result type for all payoff operations
pub type PayoffResult<T> = Result<T, PayoffError>;
