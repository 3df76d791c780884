use crate::descriptor::{DeclaredType, TypeHead};
use crate::value::TypedValue;
use std::fmt;

/// Longest value preview rendered into error messages, in characters.
const PREVIEW_CHARS: usize = 80;

fn preview(value: &TypedValue) -> String {
    let text = match value {
        TypedValue::Str(s) => format!("{s:?}"),
        other => other.to_string(),
    };
    if text.chars().count() <= PREVIEW_CHARS {
        return text;
    }
    let mut short: String = text.chars().take(PREVIEW_CHARS).collect();
    short.push_str("...");
    short
}

/// Why a single parser (or a nested coercion) failed.
///
/// Returned by every [`TypeParser`](crate::registry::TypeParser) and by
/// [`Coercer::coerce_descriptor`](super::Coercer::coerce_descriptor). The
/// top-level [`Coercer::coerce`](super::Coercer::coerce) wraps it exactly once
/// into a [`CoercionError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionFailure {
    /// No parser is registered for the head in either tier
    UnregisteredType {
        head: TypeHead,
    },
    /// A parser could not interpret the source value as its target shape
    Conversion {
        /// The value the parser received
        value: TypedValue,
        /// Rendered target type, e.g. `int` or `list[int]`
        target: String,
        reason: String,
    },
    /// Parametrized tuple whose source length differs from its parameter count
    ArityMismatch {
        expected: usize,
        actual: usize,
    },
    /// Every union alternative failed; one entry per alternative, in order
    AllAlternativesFailed {
        attempts: Vec<CoercionFailure>,
    },
}

impl CoercionFailure {
    pub fn conversion(
        value: &TypedValue,
        target: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        CoercionFailure::Conversion {
            value: value.clone(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionFailure::UnregisteredType { head } => {
                write!(f, "no parser registered for type `{head}`")
            }
            CoercionFailure::Conversion {
                value,
                target,
                reason,
            } => write!(
                f,
                "cannot convert {} value {} to `{target}`: {reason}",
                value.kind(),
                preview(value)
            ),
            CoercionFailure::ArityMismatch { expected, actual } => write!(
                f,
                "tuple arity mismatch: expected {expected} elements, got {actual}"
            ),
            CoercionFailure::AllAlternativesFailed { attempts } => {
                write!(f, "all {} union alternatives failed", attempts.len())?;
                for (i, attempt) in attempts.iter().enumerate() {
                    write!(f, "; [{i}] {attempt}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CoercionFailure {}

/// The error surfaced by [`Coercer::coerce`](super::Coercer::coerce).
///
/// Always carries the top-level source value and declared type, regardless of
/// how deep inside the value tree the failure happened. The underlying
/// [`CoercionFailure`] is available through [`CoercionError::cause`] and
/// [`std::error::Error::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    value: TypedValue,
    declared: DeclaredType,
    cause: CoercionFailure,
}

impl CoercionError {
    #[must_use]
    pub fn new(value: TypedValue, declared: DeclaredType, cause: CoercionFailure) -> Self {
        Self {
            value,
            declared,
            cause,
        }
    }

    #[must_use]
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    #[must_use]
    pub fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    #[must_use]
    pub fn cause(&self) -> &CoercionFailure {
        &self.cause
    }

    #[must_use]
    pub fn into_parts(self) -> (TypedValue, DeclaredType, CoercionFailure) {
        (self.value, self.declared, self.cause)
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to coerce {} value {} to `{}`",
            self.value.kind(),
            preview(&self.value),
            self.declared
        )
    }
}

impl std::error::Error for CoercionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
