//! Unified error handling for the ski-tracker library.
//!
//! The analysis stages themselves are total functions: empty or degenerate
//! input yields empty/zero-valued output. Errors only surface at the edges,
//! when a caller asks for input validation or hands in a bad configuration.

use thiserror::Error;

/// Unified error type for ski-tracker operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkiTrackError {
    /// Samples are not ordered by ascending timestamp
    #[error(
        "Sample {index} has timestamp {current}ms, earlier than previous sample at {previous}ms"
    )]
    UnsortedSamples {
        index: usize,
        previous: i64,
        current: i64,
    },
    /// Detection configuration is unusable
    #[error("Configuration error: {message}")]
    InvalidConfig { message: String },
    /// Config or result (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for SkiTrackError {
    fn from(err: serde_json::Error) -> Self {
        SkiTrackError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type alias for ski-tracker operations.
pub type Result<T> = std::result::Result<T, SkiTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SkiTrackError::UnsortedSamples {
            index: 7,
            previous: 2000,
            current: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("Sample 7"));
        assert!(msg.contains("1000ms"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: SkiTrackError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, SkiTrackError::Serialization { .. }));
    }
}
