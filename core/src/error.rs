//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every pipeline failure aborts the whole run. The variants carry the
//! offending request or type name so the message points at the exact entity.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A contract document could not be deserialized.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A request or type is missing a structurally required field, or
    /// violates a shape the pipeline relies on.
    #[from(ignore)]
    #[display("Malformed contract at '{entity}': {reason}")]
    MalformedContract {
        /// The request or type name.
        entity: String,
        /// The violated invariant.
        reason: String,
    },

    /// An ambiguous multi-payload request is not in the split registry.
    #[from(ignore)]
    #[display("Request '{request}' has an ambiguous response but no registered split")]
    UnsupportedSplit {
        /// The request name.
        request: String,
    },

    /// A request or a type it reaches references a name the type table lacks.
    #[from(ignore)]
    #[display("Type '{type_name}' referenced by '{referenced_by}' is not in the type table")]
    UnresolvedType {
        /// The missing type.
        type_name: String,
        /// The request or type that references it.
        referenced_by: String,
    },

    /// A path argument was requested for a singleton or notification resource.
    #[from(ignore)]
    #[display("Request '{request}': resource {resource} cannot produce a path argument")]
    UnsupportedResource {
        /// The request name.
        request: String,
        /// The resource identifier.
        resource: String,
    },

    /// Two structurally different wrapper types resolve to one synthesized name.
    #[from(ignore)]
    #[display("Synthetic type '{type_name}' conflicts with an existing, different type")]
    DuplicateSyntheticType {
        /// The synthesized name.
        type_name: String,
    },

    /// Two distinct types collapse to the same name after nested-type markers are removed.
    #[from(ignore)]
    #[display("Type '{type_name}' is produced by two different type definitions")]
    TypeRenamingConflict {
        /// The colliding name.
        type_name: String,
    },

    /// Two requests end up with the same canonical name.
    #[from(ignore)]
    #[display("Requests '{first}' and '{second}' both resolve to '{request_name}'")]
    RequestNameConflict {
        /// The shared canonical name.
        request_name: String,
        /// Contract name of the first request.
        first: String,
        /// Contract name of the second request.
        second: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Coarse error classification, independent of the carried details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// IO failure.
    Io,
    /// Deserialization failure.
    Parse,
    /// See [`AppError::MalformedContract`].
    MalformedContract,
    /// See [`AppError::UnsupportedSplit`].
    UnsupportedSplit,
    /// See [`AppError::UnresolvedType`].
    UnresolvedType,
    /// See [`AppError::UnsupportedResource`].
    UnsupportedResource,
    /// See [`AppError::DuplicateSyntheticType`].
    DuplicateSyntheticType,
    /// See [`AppError::TypeRenamingConflict`].
    TypeRenamingConflict,
    /// See [`AppError::RequestNameConflict`].
    RequestNameConflict,
    /// Anything else.
    General,
}

impl AppError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Io(_) => ErrorKind::Io,
            AppError::Parse(_) => ErrorKind::Parse,
            AppError::MalformedContract { .. } => ErrorKind::MalformedContract,
            AppError::UnsupportedSplit { .. } => ErrorKind::UnsupportedSplit,
            AppError::UnresolvedType { .. } => ErrorKind::UnresolvedType,
            AppError::UnsupportedResource { .. } => ErrorKind::UnsupportedResource,
            AppError::DuplicateSyntheticType { .. } => ErrorKind::DuplicateSyntheticType,
            AppError::TypeRenamingConflict { .. } => ErrorKind::TypeRenamingConflict,
            AppError::RequestNameConflict { .. } => ErrorKind::RequestNameConflict,
            AppError::General(_) => ErrorKind::General,
        }
    }

    pub(crate) fn malformed(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedContract {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_io_conversion() {
        let io_err = Error::other("test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert_eq!(app_err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_display_names_entity() {
        let err = AppError::UnsupportedSplit {
            request: "GetThingRequest".into(),
        };
        assert_eq!(
            err.to_string(),
            "Request 'GetThingRequest' has an ambiguous response but no registered split"
        );
        assert_eq!(err.kind(), ErrorKind::UnsupportedSplit);

        let err = AppError::malformed("Tape", "struct declares enum constants");
        assert_eq!(
            err.to_string(),
            "Malformed contract at 'Tape': struct declares enum constants"
        );
    }
}
