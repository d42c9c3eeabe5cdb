//! Error types for conversions and persisted state.

use thiserror::Error;

/// Errors surfaced to callers of a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Please enter a valid number")]
    InvalidAmount,

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Invalid currency selected")]
    InvalidCurrency,

    #[error("Request timeout while fetching exchange rates")]
    Timeout,

    /// The rate provider failed; carries a diagnostic message.
    #[error("{0}")]
    ProviderError(String),
}

impl ConversionError {
    /// Provider answered with a non-success status.
    pub fn status(status: impl std::fmt::Display) -> Self {
        ConversionError::ProviderError(format!("Failed to fetch exchange rate: {status}"))
    }

    /// Transport, decoding or protocol failure talking to the provider.
    pub fn provider(diagnostic: impl std::fmt::Display) -> Self {
        ConversionError::ProviderError(format!("API Error: {diagnostic}"))
    }
}

/// Failures reading or writing persisted documents. Never surfaced to API
/// callers; they are logged and the affected data degrades to empty.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConversionError::InvalidAmount.to_string(),
            "Please enter a valid number"
        );
        assert_eq!(
            ConversionError::status(503).to_string(),
            "Failed to fetch exchange rate: 503"
        );
        assert_eq!(
            ConversionError::provider("connection refused").to_string(),
            "API Error: connection refused"
        );
    }
}
