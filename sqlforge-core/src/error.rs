//! Error types for sqlforge

use thiserror::Error;

/// The main error type for sqlforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid statement configuration (missing table, mismatched rows, ...)
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// An argument outside the accepted range, such as a negative LIMIT
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A dialect with the same name is already in the registry
    #[error("The sql dialect named '{name}' has been registered")]
    DialectAlreadyRegistered { name: String },

    /// No dialect is registered under the requested name
    #[error("The sql dialect '{name}' has not been registered")]
    UnknownDialect { name: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported by an executor that is not a driver error
    #[error("Execution error: {message}")]
    Execution { message: String },
}

/// Convenience Result type for sqlforge operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new duplicate dialect error
    pub fn dialect_already_registered(name: impl Into<String>) -> Self {
        Self::DialectAlreadyRegistered { name: name.into() }
    }

    /// Create a new unknown dialect error
    pub fn unknown_dialect(name: impl Into<String>) -> Self {
        Self::UnknownDialect { name: name.into() }
    }

    /// Create a new execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_error() {
        let err = Error::invalid_query("InsertBuilder: no table name");
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert_eq!(err.to_string(), "Invalid query: InsertBuilder: no table name");
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = Error::invalid_argument("the limit must be a positive integer");
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid argument: the limit must be a positive integer"
        );
    }

    #[test]
    fn test_dialect_errors() {
        let err = Error::dialect_already_registered("mysql");
        assert_eq!(
            err.to_string(),
            "The sql dialect named 'mysql' has been registered"
        );

        let err = Error::unknown_dialect("oracle");
        assert!(matches!(err, Error::UnknownDialect { .. }));
        assert_eq!(err.to_string(), "The sql dialect 'oracle' has not been registered");
    }

    #[test]
    fn test_execution_error() {
        let err = Error::execution("connection reset");
        assert_eq!(err.to_string(), "Execution error: connection reset");
    }
}
