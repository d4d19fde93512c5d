//! Error types for the flatprefs codec.
//!
//! This module provides the [`enum@Error`] type returned by every encode and
//! decode operation.

use std::fmt;

use flatprefs_storage::StorageError;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding a value.
///
/// Every variant that concerns a location carries the full tag (dotted path)
/// at which the problem was found.
#[derive(Debug, Error)]
pub enum Error {
    /// A required primitive, enum or set was not found at its tag.
    #[error("missing property at '{tag}'")]
    MissingProperty {
        /// The tag that was expected to hold a value.
        tag: String,
    },

    /// A stored enum name matches none of the declared variants.
    #[error("unknown enum value '{value}' at '{tag}'")]
    UnknownEnumValue {
        /// The tag holding the name.
        tag: String,
        /// The stored name.
        value: String,
    },

    /// An empty object, list or map was encoded with empty-structure markers
    /// disabled.
    #[error("empty {shape} at '{tag}' cannot be stored without an empty-structure marker")]
    EmptyStructureNotAllowed {
        /// The tag of the empty structure.
        tag: String,
        /// The kind of structure, e.g. `list` or `struct Foo`.
        shape: String,
    },

    /// A polymorphic `type` key names no known variant.
    #[error("unknown discriminator '{value}' at '{tag}'")]
    UnknownDiscriminator {
        /// The `.type` tag.
        tag: String,
        /// The stored discriminator.
        value: String,
    },

    /// A configuration was contradictory.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Nothing was stored at a root tag and no default was supplied.
    #[error("no value provided for '{tag}'")]
    ValueNotProvided {
        /// The root tag.
        tag: String,
    },

    /// The stored primitive has a different kind than the target requires.
    #[error("type mismatch at '{tag}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// The tag holding the value.
        tag: String,
        /// What the target type needed.
        expected: String,
        /// What was stored.
        actual: String,
    },

    /// A number does not fit the target type.
    #[error("value {value} at '{tag}' is out of range for {target}")]
    OutOfRange {
        /// The tag of the number.
        tag: String,
        /// The offending value, as text.
        value: String,
        /// The target type.
        target: &'static str,
    },

    /// A double stored as text could not be parsed.
    #[error("invalid number '{text}' at '{tag}'")]
    InvalidNumber {
        /// The tag of the text.
        tag: String,
        /// The stored text.
        text: String,
    },

    /// The value uses a part of the serde data model the store cannot hold.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A custom error raised by a `Serialize` or `Deserialize` implementation.
    #[error("{0}")]
    Message(String),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),

    /// The store's access lock was poisoned by a panicking thread.
    #[error("store access lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Creates a [`Error::MissingProperty`].
    pub fn missing(tag: impl Into<String>) -> Self {
        Self::MissingProperty { tag: tag.into() }
    }

    /// Creates a [`Error::TypeMismatch`].
    pub fn mismatch(
        tag: impl Into<String>,
        expected: impl Into<String>,
        actual: impl fmt::Display,
    ) -> Self {
        Self::TypeMismatch { tag: tag.into(), expected: expected.into(), actual: actual.to_string() }
    }

    /// Returns `true` for errors caused by absent data rather than bad data.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::MissingProperty { .. } | Self::ValueNotProvided { .. })
    }

    /// Anchors a serde `missing_field` error raised by a struct visitor to the
    /// struct's tag.
    ///
    /// `missing_field` only knows the bare field name. Errors raised beneath
    /// the struct carry composed tags, which always contain a separator and
    /// so never equal a field name; they are left alone.
    pub(crate) fn anchor_field(self, parent: &str, fields: &[&str]) -> Self {
        match self {
            Self::MissingProperty { tag } if fields.contains(&tag.as_str()) => {
                Self::MissingProperty { tag: crate::path::compose(parent, &tag) }
            }
            other => other,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TypeMismatch { key, expected, actual } => {
                Self::mismatch(key, expected.as_str(), actual)
            }
            other => Self::Storage(other),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self::missing(field)
    }
}
