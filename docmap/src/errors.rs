use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for mapping operations.
///
/// Each kind describes a category of failure so callers can tell a data
/// problem (a value that does not fit its declared type) from a setup problem
/// (a type that was never registered).
///
/// # Examples
///
/// ```rust,ignore
/// use docmap::errors::{MappingError, ErrorKind, MappingResult};
///
/// fn example() -> MappingResult<()> {
///     Err(MappingError::new("No metadata for Book", ErrorKind::MetadataNotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A value could not be converted to or from its store representation
    ConversionError,
    /// No entity metadata is registered for a type that must be traversed
    MetadataNotFound,
    /// A value read from the store violates a documented contract
    ValidationError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Two converters were registered for the same source and target
    DuplicateConverter,
    /// The object graph is nested deeper than the configured limit
    DepthLimitExceeded,
    /// Invalid data type for the operation
    InvalidDataType,
    /// Error encoding or decoding data
    EncodingError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConversionError => write!(f, "Conversion error"),
            ErrorKind::MetadataNotFound => write!(f, "Metadata not found"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::DuplicateConverter => write!(f, "Duplicate converter"),
            ErrorKind::DepthLimitExceeded => write!(f, "Depth limit exceeded"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Diagnostic details attached to conversion failures.
///
/// Every field is optional because errors are raised deep inside the
/// recursion and enriched on the way out: the property is known where the
/// value is read, the source id only at the top-level document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionContext {
    pub property: Option<String>,
    pub target_type: Option<String>,
    pub value_type: Option<String>,
    pub source_id: Option<String>,
}

impl ConversionContext {
    fn is_empty(&self) -> bool {
        self.property.is_none()
            && self.target_type.is_none()
            && self.value_type.is_none()
            && self.source_id.is_none()
    }
}

impl Display for ConversionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if let Some(property) = &self.property {
            parts.push(format!("property: {}", property));
        }
        if let Some(target_type) = &self.target_type {
            parts.push(format!("target type: {}", target_type));
        }
        if let Some(value_type) = &self.value_type {
            parts.push(format!("value type: {}", value_type));
        }
        if let Some(source_id) = &self.source_id {
            parts.push(format!("source id: {}", source_id));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Error type of the mapping engine.
///
/// `MappingError` carries a message, a kind, an optional cause, a backtrace
/// captured at construction and a [ConversionContext] for diagnosis.
///
/// # Examples
///
/// ```rust,ignore
/// use docmap::errors::{MappingError, ErrorKind};
///
/// let err = MappingError::new("Cannot convert 'abc' to i32", ErrorKind::ConversionError)
///     .with_property("age")
///     .with_target_type("i32");
/// ```
#[derive(Clone)]
pub struct MappingError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MappingError>>,
    context: ConversionContext,
    backtrace: Atomic<Backtrace>,
}

impl MappingError {
    /// Creates a new `MappingError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MappingError {
            message: message.to_string(),
            error_kind,
            cause: None,
            context: ConversionContext::default(),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `MappingError` wrapping a cause.
    ///
    /// The context of the cause is inherited so that details recorded deep in
    /// the recursion survive the wrapping.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MappingError) -> Self {
        MappingError {
            message: message.to_string(),
            error_kind,
            context: cause.context.clone(),
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Shorthand for a [ErrorKind::ConversionError].
    pub fn conversion(message: &str) -> Self {
        MappingError::new(message, ErrorKind::ConversionError)
    }

    pub fn with_property(mut self, property: &str) -> Self {
        if self.context.property.is_none() {
            self.context.property = Some(property.to_string());
        }
        self
    }

    pub fn with_target_type(mut self, target_type: impl Display) -> Self {
        if self.context.target_type.is_none() {
            self.context.target_type = Some(target_type.to_string());
        }
        self
    }

    pub fn with_value_type(mut self, value_type: impl Display) -> Self {
        if self.context.value_type.is_none() {
            self.context.value_type = Some(value_type.to_string());
        }
        self
    }

    pub fn with_source_id(mut self, source_id: Option<&str>) -> Self {
        if let Some(id) = source_id {
            self.context.source_id = Some(id.to_string());
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MappingError> {
        self.cause.as_deref()
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    /// Returns `true` if this error or any error in its cause chain has the
    /// given kind.
    pub fn has_kind(&self, kind: &ErrorKind) -> bool {
        &self.error_kind == kind || self.cause.as_ref().is_some_and(|c| c.has_kind(kind))
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.context)
        }
    }
}

impl Debug for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self, cause),
            None => write!(f, "{}\n{:?}", self, self.backtrace.read()),
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// `MappingResult<T>` is shorthand for `Result<T, MappingError>`.
pub type MappingResult<T> = Result<T, MappingError>;

#[cfg(feature = "serde")]
impl serde::de::Error for MappingError {
    fn custom<T: Display>(msg: T) -> Self {
        MappingError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for MappingError {
    fn custom<T: Display>(msg: T) -> Self {
        MappingError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl From<std::num::ParseIntError> for MappingError {
    fn from(err: std::num::ParseIntError) -> Self {
        MappingError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<std::num::ParseFloatError> for MappingError {
    fn from(err: std::num::ParseFloatError) -> Self {
        MappingError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<std::str::ParseBoolError> for MappingError {
    fn from(err: std::str::ParseBoolError) -> Self {
        MappingError::new(
            &format!("Boolean parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<chrono::ParseError> for MappingError {
    fn from(err: chrono::ParseError) -> Self {
        MappingError::new(
            &format!("Date parsing error: {}", err),
            ErrorKind::ConversionError,
        )
    }
}

impl From<uuid::Error> for MappingError {
    fn from(err: uuid::Error) -> Self {
        MappingError::new(
            &format!("UUID parsing error: {}", err),
            ErrorKind::ConversionError,
        )
    }
}

impl From<std::fmt::Error> for MappingError {
    fn from(err: std::fmt::Error) -> Self {
        MappingError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for MappingError {
    fn from(msg: String) -> Self {
        MappingError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MappingError {
    fn from(msg: &str) -> Self {
        MappingError::new(msg, ErrorKind::InternalError)
    }
}
