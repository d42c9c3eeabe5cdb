//! Core conversion logic and its abstractions

pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod rates;
pub mod resolver;
pub mod timestamp;

// Re-export main types for cleaner imports
pub use convert::{ConversionRequest, Converter};
pub use currency::Currency;
pub use error::{ConversionError, StorageError};
pub use history::{ConversionHistory, ConversionRecord, RateSource};
pub use rates::{RateCache, RateProvider, RateSnapshot, Rates};
pub use resolver::RateResolver;
