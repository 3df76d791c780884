use super::error::{CoercionError, CoercionFailure};
use crate::descriptor::{
    resolve, ContainerKind, DeclaredType, ScalarKind, TemporalKind, TypeDescriptor, TypeHead,
};
use crate::registry::{self, GeneralRegistry, LocalRegistry, ParserEntry, Tier, TypeParser};
use crate::value::TypedValue;
use std::sync::Arc;
use tracing::{debug, trace};

/// The coercion engine.
///
/// Holds a handle to the shared general registry and its own local registry.
/// Parsers receive `&Coercer` and convert nested values through
/// [`Coercer::coerce_descriptor`].
#[derive(Debug, Clone)]
pub struct Coercer {
    general: GeneralRegistry,
    local: LocalRegistry,
}

impl Default for Coercer {
    /// Engine over the process-wide general registry.
    fn default() -> Self {
        Self::new(GeneralRegistry::global())
    }
}

impl Coercer {
    /// Engine sharing `general`, with an empty local tier.
    #[must_use]
    pub fn new(general: GeneralRegistry) -> Self {
        Self {
            general,
            local: LocalRegistry::new(),
        }
    }

    /// Register a parser visible to this engine only. Overrides the general
    /// tier for `head`.
    pub fn register_local<P>(&mut self, head: TypeHead, parser: P)
    where
        P: TypeParser + 'static,
    {
        self.local.register(head, Arc::new(parser));
    }

    /// The shared general tier. Registrations made through it are visible to
    /// every engine holding the same handle.
    #[must_use]
    pub fn general(&self) -> &GeneralRegistry {
        &self.general
    }

    #[must_use]
    pub fn local(&self) -> &LocalRegistry {
        &self.local
    }

    /// Local-over-general lookup.
    #[must_use]
    pub fn lookup(&self, head: &TypeHead) -> Option<(ParserEntry, Tier)> {
        registry::lookup(&self.local, &self.general, head)
    }

    /// Convert `value` into the shape of `declared`.
    ///
    /// A value that already is exactly the declared concrete type is returned
    /// unchanged. Every failure, however deeply nested, is reported as one
    /// [`CoercionError`] carrying this call's value and declared type.
    ///
    /// ```
    /// use restmodels::coercion::Coercer;
    /// use restmodels::descriptor::DeclaredType;
    /// use restmodels::value::TypedValue;
    /// use serde_json::json;
    ///
    /// let coercer = Coercer::default();
    /// let declared = DeclaredType::list_of(DeclaredType::list_of(DeclaredType::int()));
    /// let out = coercer.coerce(json!([["1", "2"], ["3"]]), &declared).unwrap();
    /// assert_eq!(out.to_string(), "[[1,2],[3]]");
    /// ```
    pub fn coerce(
        &self,
        value: impl Into<TypedValue>,
        declared: &DeclaredType,
    ) -> Result<TypedValue, CoercionError> {
        let value = value.into();
        let descriptor = resolve(declared);
        if descriptor.is_concrete() && is_exact_instance(&value, &descriptor.head) {
            debug!(declared = %declared, "coercion fast path");
            return Ok(value);
        }
        match self.dispatch(&value, &descriptor) {
            Ok(coerced) => Ok(coerced),
            Err(cause) => {
                debug!(
                    declared = %declared,
                    kind = value.kind(),
                    error = %cause,
                    "coercion failed"
                );
                Err(CoercionError::new(value, declared.clone(), cause))
            }
        }
    }

    /// Convert a nested value against an already resolved descriptor.
    ///
    /// This is the re-entry point for parsers. Failures are returned as-is so
    /// that the outermost [`Coercer::coerce`] wraps them exactly once.
    pub fn coerce_descriptor(
        &self,
        value: &TypedValue,
        descriptor: &TypeDescriptor,
    ) -> Result<TypedValue, CoercionFailure> {
        if descriptor.is_concrete() && is_exact_instance(value, &descriptor.head) {
            trace!(head = %descriptor.head, "nested fast path");
            return Ok(value.clone());
        }
        self.dispatch(value, descriptor)
    }

    fn dispatch(
        &self,
        value: &TypedValue,
        descriptor: &TypeDescriptor,
    ) -> Result<TypedValue, CoercionFailure> {
        let Some((entry, tier)) = self.lookup(&descriptor.head) else {
            return Err(CoercionFailure::UnregisteredType {
                head: descriptor.head.clone(),
            });
        };
        trace!(head = %descriptor.head, tier = %tier, kind = value.kind(), "dispatching");
        entry.parse(value, descriptor, self)
    }
}

/// Whether `value` already is exactly the type named by a concrete `head`.
#[must_use]
pub fn is_exact_instance(value: &TypedValue, head: &TypeHead) -> bool {
    matches!(
        (head, value),
        (TypeHead::Scalar(ScalarKind::Str), TypedValue::Str(_))
            | (TypeHead::Scalar(ScalarKind::Int), TypedValue::Int(_))
            | (TypeHead::Scalar(ScalarKind::Bool), TypedValue::Bool(_))
            | (TypeHead::Scalar(ScalarKind::Float), TypedValue::Float(_))
            | (TypeHead::Scalar(ScalarKind::Decimal), TypedValue::Decimal(_))
            | (TypeHead::Scalar(ScalarKind::Bytes), TypedValue::Bytes(_))
            | (TypeHead::Temporal(TemporalKind::DateTime), TypedValue::DateTime(_))
            | (TypeHead::Temporal(TemporalKind::Date), TypedValue::Date(_))
            | (TypeHead::Temporal(TemporalKind::Time), TypedValue::Time(_))
            | (TypeHead::Temporal(TemporalKind::Duration), TypedValue::Duration(_))
            | (TypeHead::Container(ContainerKind::Tuple), TypedValue::Tuple(_))
            | (TypeHead::Container(ContainerKind::List), TypedValue::List(_))
            | (TypeHead::Container(ContainerKind::Set), TypedValue::Set(_))
            | (TypeHead::Container(ContainerKind::FrozenSet), TypedValue::FrozenSet(_))
    )
}
