//! Error model for enum construction and lookup failures.
//!
//! Every failure is raised synchronously at the call that detects it. There
//! is no retry or recovery path: membership and accessor errors indicate
//! caller logic defects, not transient conditions, so the crate surfaces
//! them once and moves on.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::value::Value;

/// Result type alias for operations that can produce an [`EnumError`].
pub type EnumResult<T> = Result<T, EnumError>;

/// Error categories raised by the enum runtime.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations. The string representation matches
/// the variant name exactly (e.g. `NotAVariant` -> "NotAVariant").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A variant-accessor argument was never constructed as a rich variant.
    NotAVariant,
    /// A variant's owning enum was read before the enum was sealed.
    UninitializedEnum,
    /// A `compare` operand could not be resolved to a member position.
    ///
    /// This is the `compare`-specific surface of "not a member": the
    /// lookup-style calls answer `None`/`false` for non-members instead.
    Incomparable,
    /// A mutation was attempted outside the open construction window.
    SealedEnum,
}

/// An enum runtime error: a category plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumError {
    kind: ErrorKind,
    message: String,
}

impl EnumError {
    /// Creates an error from a kind and a preformatted message.
    #[must_use]
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The argument to a variant accessor was not a rich variant.
    #[must_use]
    pub(crate) fn not_a_variant(value: &Value) -> Self {
        Self::new(ErrorKind::NotAVariant, format!("{value} is not an enum variant"))
    }

    /// A variant from `enum_name` was observed before the enum was sealed.
    #[must_use]
    pub(crate) fn uninitialized_enum(enum_name: &str) -> Self {
        Self::new(
            ErrorKind::UninitializedEnum,
            format!("enum '{enum_name}' is not initialized yet"),
        )
    }

    /// A `compare` operand is not a member of the enum doing the comparing.
    #[must_use]
    pub(crate) fn incomparable(enum_name: &str, operand: &Value) -> Self {
        Self::new(
            ErrorKind::Incomparable,
            format!("{operand} is not a member of enum '{enum_name}'"),
        )
    }

    /// A value assignment arrived after the construction window closed.
    #[must_use]
    pub(crate) fn sealed_enum(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SealedEnum, message)
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message, without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EnumError {}
