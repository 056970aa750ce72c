//! # Persistence Error Types
//!
//! Everything that can go wrong between the in-memory Store and its
//! mirror. None of these abort the in-memory operation that triggered the
//! save; callers log and carry on.

use thiserror::Error;

/// Persistence layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Imported or stored data does not have the expected shape.
    ///
    /// ## When This Occurs
    /// - An import file whose `products` field is not an array
    /// - A backing file that is not a JSON object of string entries
    #[error("Invalid data format: {reason}")]
    InvalidFormat { reason: String },

    /// JSON encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// The storage backend itself failed to read or write.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::InvalidFormat {
            reason: "products must be an array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid data format: products must be an array"
        );
    }

    #[test]
    fn test_codec_conversion() {
        let bad: Result<Vec<i32>, _> = serde_json::from_str("not json");
        let err: StoreError = bad.unwrap_err().into();
        assert!(matches!(err, StoreError::Codec(_)));
    }
}
