//! Error types for rowmodel operations.

use std::fmt;

/// The primary error type for all rowmodel operations.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied argument was rejected (batch size, empty input)
    InvalidArgument(String),
    /// A precondition of the record type or its data was violated
    Domain(DomainError),
    /// No coercion rule exists between a raw value and a field's declared type
    Unsupported(ConversionError),
    /// Scalar (first-column) conversion errors
    Type(TypeError),
    /// Errors reported by the statement executor
    Query(QueryError),
    /// Configuration errors
    Config(ConfigError),
    /// Operation timed out
    Timeout,
    /// Operation was cancelled via asupersync
    Cancelled,
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct DomainError {
    pub kind: DomainErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    /// UPDATE requested for a type without a key field
    MissingKey,
    /// UPDATE requested for a type whose only mapped field is the key
    NoUpdatableColumns,
    /// INSERT would return a generated key the record cannot accept
    KeyNotAssignable,
    /// Enum text matched neither a display name nor a symbolic name
    UnknownEnumName,
    /// Enum ordinal matched no declared variant
    UnknownEnumOrdinal,
}

/// A raw value could not be coerced into a field's declared type.
#[derive(Debug)]
pub struct ConversionError {
    /// Logical name of the field being populated
    pub field: String,
    /// Declared Rust type of the field
    pub declared: &'static str,
    /// SQL type name of the raw value
    pub actual: &'static str,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL
    Syntax,
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Statement timeout
    Timeout,
    /// Scalar read-back produced no value
    NoResult,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Build a domain error of the given kind.
    pub fn domain(kind: DomainErrorKind, message: impl Into<String>) -> Self {
        Error::Domain(DomainError {
            kind,
            message: message.into(),
        })
    }

    /// Build an unsupported-conversion error for `field`.
    pub fn unsupported(
        field: impl Into<String>,
        declared: &'static str,
        actual: &'static str,
    ) -> Self {
        Error::Unsupported(ConversionError {
            field: field.into(),
            declared,
            actual,
        })
    }

    /// The domain error kind, if this is a domain error.
    pub fn domain_kind(&self) -> Option<DomainErrorKind> {
        match self {
            Error::Domain(d) => Some(d.kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Domain(e) => write!(f, "{}", e.message),
            Error::Unsupported(e) => write!(f, "{}", e),
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
            Error::Query(e) => write!(f, "Query error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No conversion between field type '{}' on field '{}' and database type '{}'",
            self.declared, self.field, self.actual
        )
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = &self.column {
            write!(
                f,
                "expected {} for column '{}', found {}",
                self.expected, col, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error::Domain(err)
    }
}

impl From<ConversionError> for Error {
    fn from(err: ConversionError) -> Self {
        Error::Unsupported(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for rowmodel operations.
pub type Result<T> = std::result::Result<T, Error>;
