//! Unified error types for the CGMES workspace
//!
//! [`CgmesError`] covers the failures that stop an operation outright: reading
//! a model, building a schema table, or writing a document. Problems found
//! while resolving individual objects during an export are not errors; they
//! are recorded as [`crate::diagnostics::Diagnostics`] and the object is left
//! out.
//!
//! # Example
//!
//! ```ignore
//! use cgmes_core::{CgmesError, CgmesResult, SchemaTable};
//!
//! fn load(version: &str) -> CgmesResult<SchemaTable> {
//!     let schema = SchemaTable::builtin(version)?;
//!     Ok(schema)
//! }
//! ```

use thiserror::Error;

/// Error type for all CGMES operations.
#[derive(Error, Debug)]
pub enum CgmesError {
    /// I/O errors (file access etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Inconsistent schema table (unknown parent, inheritance cycle, ...)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A registry key was inserted twice
    #[error("duplicate registry key '{0}'")]
    DuplicateKey(String),

    /// A handle or key that does not belong to the registry
    #[error("unknown object: {0}")]
    UnknownObject(String),

    /// A profile name that is neither a short code nor a full name
    #[error("unknown profile '{0}'; expected one of EQ, SSH, TP, SV, DY, GL, DI")]
    UnknownProfile(String),

    /// No builtin schema exists for the requested version tag
    #[error("unsupported CGMES version '{0}'")]
    UnsupportedVersion(String),
}

/// Convenience type alias for Results using CgmesError.
pub type CgmesResult<T> = Result<T, CgmesError>;

// JSON parsing errors
impl From<serde_json::Error> for CgmesError {
    fn from(err: serde_json::Error) -> Self {
        CgmesError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CgmesError::DuplicateKey("_A1".into());
        assert_eq!(err.to_string(), "duplicate registry key '_A1'");

        let err = CgmesError::UnknownProfile("XX".into());
        assert!(err.to_string().contains("unknown profile 'XX'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CgmesError = io_err.into();
        assert!(matches!(err, CgmesError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CgmesError = json_err.into();
        assert!(matches!(err, CgmesError::Parse(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CgmesResult<()> {
            Err(CgmesError::Schema("cycle".into()))
        }

        fn outer() -> CgmesResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
