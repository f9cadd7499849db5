//! Error types shared by every kvlayer crate.

use std::sync::Arc;

/// Errors produced by decoding, matching and store operations.
///
/// `Error` is `Clone` because a `TypedValue` carries one and hands it back
/// from every accessor. Backend failures are kept behind an `Arc` for the
/// same reason.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The value cannot be encoded for storage.
    #[error("invalid type: {message}")]
    InvalidType { message: String },

    /// Structured encoding of a value failed.
    #[error("serialization failed: {message}")]
    Serialization { message: String },

    /// The key does not exist. Expected on read misses; callers branch on it.
    #[error("key does not exist: {key}")]
    KeyNotFound { key: String },

    /// A scalar accessor was called on a zero-length payload.
    #[error("empty byte slice")]
    EmptyValue,

    /// The payload is not valid text for the requested scalar.
    #[error("cannot parse {input:?} as {target}: {message}")]
    ParseFailure {
        target: &'static str,
        input: String,
        message: String,
    },

    /// A number does not fit the destination width.
    #[error("{value} overflows {target}{}", field_suffix(.field))]
    Overflow {
        target: &'static str,
        value: String,
        field: Option<String>,
    },

    /// The document shape does not match the destination kind.
    #[error("expected {expected}, got {found}{}", field_suffix(.field))]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        field: Option<String>,
    },

    /// The payload is not a structured document.
    ///
    /// When the payload failed to parse, `source` holds the parser error.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        message: String,
        #[source]
        source: Option<Arc<serde_json::Error>>,
    },

    /// The decode target cannot be populated.
    #[error("invalid destination: {message}")]
    InvalidDestination { message: String },

    /// Two fields of one destination type resolve to the same source name.
    #[error("duplicate field name detected for {field} in type {type_name}")]
    DuplicateField { type_name: String, field: String },

    /// The backend lacks the requested capability.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    /// Transport or storage failure inside a backend adapter.
    #[error("backend error: {0}")]
    Backend(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" (field {})", name),
        None => String::new(),
    }
}

impl Error {
    /// Create a key-not-found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    /// Create a type-mismatch error without field context.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch {
            expected,
            found,
            field: None,
        }
    }

    /// Create an overflow error without field context.
    pub fn overflow(target: &'static str, value: impl ToString) -> Self {
        Error::Overflow {
            target,
            value: value.to_string(),
            field: None,
        }
    }

    /// Create a parse failure for a textual scalar.
    pub fn parse_failure(target: &'static str, input: &[u8], message: impl ToString) -> Self {
        Error::ParseFailure {
            target,
            input: String::from_utf8_lossy(input).into_owned(),
            message: message.to_string(),
        }
    }

    /// Create a malformed-payload error with no underlying cause.
    pub fn malformed(message: impl ToString) -> Self {
        Error::MalformedPayload {
            message: message.to_string(),
            source: None,
        }
    }

    /// Create a malformed-payload error from a JSON parse failure.
    ///
    /// The parser's message is appended to `context` and the error itself is
    /// kept as the source.
    pub fn malformed_json(context: &str, error: serde_json::Error) -> Self {
        Error::MalformedPayload {
            message: format!("{}: {}", context, error),
            source: Some(Arc::new(error)),
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Error::Serialization {
            message: message.to_string(),
        }
    }

    /// Create an unsupported-capability error.
    pub fn unsupported(operation: &'static str, backend: &'static str) -> Self {
        Error::Unsupported { operation, backend }
    }

    /// Wrap a backend failure.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Backend(Arc::from(error.into()))
    }

    /// Attach the destination field name to a coercion error.
    ///
    /// Only `TypeMismatch` and `Overflow` carry field context; the innermost
    /// field name wins, so nested records report the deepest field.
    pub fn in_field(self, name: &str) -> Self {
        match self {
            Error::TypeMismatch {
                expected,
                found,
                field: None,
            } => Error::TypeMismatch {
                expected,
                found,
                field: Some(name.to_string()),
            },
            Error::Overflow {
                target,
                value,
                field: None,
            } => Error::Overflow {
                target,
                value,
                field: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// Check whether this is a read miss.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }
}

/// Result alias used throughout kvlayer.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn key_not_found_display() {
        let e = Error::key_not_found("user:1");
        assert_eq!(format!("{}", e), "key does not exist: user:1");
        assert!(e.is_key_not_found());
        assert!(!Error::EmptyValue.is_key_not_found());
    }

    #[test]
    fn type_mismatch_display_with_field() {
        let e = Error::type_mismatch("number", "string").in_field("age");
        assert_eq!(format!("{}", e), "expected number, got string (field age)");
    }

    #[test]
    fn in_field_keeps_innermost_name() {
        let e = Error::overflow("i8", 300)
            .in_field("street_number")
            .in_field("address");
        match e {
            Error::Overflow { field, .. } => assert_eq!(field.as_deref(), Some("street_number")),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn in_field_ignores_other_variants() {
        let e = Error::malformed("eof").in_field("name");
        assert!(matches!(e, Error::MalformedPayload { .. }));
    }

    #[test]
    fn parse_failure_keeps_input_text() {
        let e = Error::parse_failure("bool", b"2", "invalid syntax");
        let display = format!("{}", e);
        assert!(display.contains("\"2\""));
        assert!(display.contains("bool"));
    }

    #[test]
    fn backend_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let e = Error::backend(io);
        assert_eq!(format!("{}", e), "backend error: reset");
        let source = StdError::source(&e).expect("backend cause");
        assert_eq!(source.to_string(), "reset");
    }

    #[test]
    fn malformed_json_keeps_parser_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = parse.to_string();
        let e = Error::malformed_json("failed to unmarshal JSON", parse);
        assert_eq!(
            format!("{}", e),
            format!("malformed payload: failed to unmarshal JSON: {}", expected)
        );
        assert_eq!(StdError::source(&e).map(|s| s.to_string()), Some(expected));

        assert!(StdError::source(&Error::malformed("expected a JSON object")).is_none());
    }

    #[test]
    fn errors_are_cloneable() {
        let e = Error::backend("connection refused");
        let cloned = e.clone();
        assert_eq!(format!("{}", e), format!("{}", cloned));
    }

    #[test]
    fn unsupported_display() {
        let e = Error::unsupported("list_keys_by_pattern", "memcached");
        assert_eq!(
            format!("{}", e),
            "list_keys_by_pattern is not supported by the memcached backend"
        );
    }
}
