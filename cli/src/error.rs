#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use canon_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// A pipeline or contract error from the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// Output serialization failure.
    #[display("Serialization failed: {}", _0)]
    Json(serde_json::Error),

    /// YAML output serialization failure.
    #[display("Serialization failed: {}", _0)]
    Yaml(serde_yaml::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds a type that is not itself an error, so `source()`
/// cannot be derived.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passthrough() {
        let core = AppError::UnsupportedSplit {
            request: "GetPoolSpectraS3Request".into(),
        };
        let err: CliError = core.into();
        assert_eq!(
            err.to_string(),
            "Request 'GetPoolSpectraS3Request' has an ambiguous response but no registered split"
        );
    }

    #[test]
    fn test_string_is_general() {
        let err: CliError = String::from("nope").into();
        assert_eq!(err.to_string(), "Operation failed: nope");
    }
}
