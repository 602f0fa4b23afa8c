//! Error types for PHP serialization and deserialization.
//!
//! Decoding errors carry the byte position and a preview of the input around
//! it so that malformed payloads can be debugged. Encoding errors identify
//! the host type that could not be represented.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::value::Type;

/// The main error type for PHP deserialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The byte position where the error occurred.
    pub position: usize,
    /// Optional context about what was being parsed.
    pub context: Option<String>,
    /// Preview of input around error position for debugging.
    pub input_preview: Option<String>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(ref preview) = self.input_preview {
            write!(f, "\n{}", preview)?;
        }
        Ok(())
    }
}

/// Specific kinds of deserialization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Expected a specific character but found something else.
    #[error("expected '{expected}', found '{found}'")]
    UnexpectedChar {
        /// The character that was expected.
        expected: char,
        /// The character that was found.
        found: char,
    },

    /// Unknown type marker.
    #[error("unknown type marker '{0}'")]
    UnknownType(char),

    /// Invalid integer value.
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Invalid float value.
    #[error("invalid float: {0}")]
    InvalidFloat(String),

    /// Invalid boolean value.
    #[error("invalid boolean value: {0}")]
    InvalidBoolean(String),

    /// Class or property name is not valid UTF-8.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,

    /// Array key of a type other than int or string.
    #[error("invalid array key type: expected int or string, found {0}")]
    InvalidArrayKey(Type),

    /// Private property name without the closing NUL of its class segment.
    #[error("invalid property name: {0}")]
    InvalidPropertyName(String),

    /// Bytes left over after the top-level value.
    #[error("trailing data starting with '{0}'")]
    TrailingData(char),

    /// Nesting depth exceeded.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),
}

impl DecodeError {
    /// Create a new error with the given kind and position.
    #[inline]
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
            input_preview: None,
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add input preview around the error position for debugging.
    ///
    /// Shows up to 20 bytes before and after the error position.
    #[cold]
    pub fn with_input_preview(mut self, data: &[u8], error_pos: usize) -> Self {
        let start = error_pos.saturating_sub(20);
        let end = (error_pos + 20).min(data.len());

        if start < end {
            // Control bytes (NUL markers in property names) would garble the caret line.
            let preview: String = String::from_utf8_lossy(&data[start..end])
                .chars()
                .map(|c| if c.is_control() { '.' } else { c })
                .collect();

            let relative_pos = error_pos.saturating_sub(start);
            let mut result = String::with_capacity(preview.len() + relative_pos + 2);
            result.push_str(&preview);
            result.push('\n');
            result.push_str(&" ".repeat(relative_pos));
            result.push('^');

            self.input_preview = Some(result);
        }
        self
    }
}

/// Errors produced while encoding a value.
///
/// Any of these aborts the whole encode call; no partial output is returned.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The host value has no PHP representation.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A map key is neither an integer nor string-like.
    #[error("unsupported map key type: {0}")]
    UnsupportedMapKeyType(String),

    /// Error raised by a `Serialize` implementation or a custom
    /// serialization hook.
    #[error("{0}")]
    Custom(String),

    /// Writing the encoded bytes failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

/// A typed accessor was called on a value of a different type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("call of {method} on {actual} value")]
pub struct TypeMismatch {
    /// The accessor that was called, e.g. `Value::as_int`.
    pub method: &'static str,
    /// The actual type of the value.
    pub actual: Type,
}

/// A value of a type other than int or string was used as an array key.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid array key type: expected int or string, found {0}")]
pub struct InvalidKey(pub Type);

/// Result type alias for PHP deserialization.
pub type Result<T> = std::result::Result<T, DecodeError>;
