pub mod datasource;
pub mod error;
pub mod records;
pub mod time_value;
pub mod types;

#[cfg(feature = "performance")]
pub mod performance;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "ledger")]
pub mod ledger;

#[cfg(feature = "validation")]
pub mod validation;

pub use datasource::{FundDataSource, InMemoryFundData};
pub use error::FundEngineError;
pub use records::*;
pub use types::*;

/// Standard result type for all engine operations
pub type FundEngineResult<T> = Result<T, FundEngineError>;
