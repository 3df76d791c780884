//! # Registry Module
//!
//! Two-tier lookup of type parsers by [`TypeHead`].
//!
//! ## Tiers
//!
//! - **General** ([`GeneralRegistry`]) - process-wide defaults.
//!   [`GeneralRegistry::global`] is built with the builtins on first use and
//!   backs every [`Coercer::default`] engine. Registrations are additive and
//!   become visible to every coercer sharing the handle. Isolated registries
//!   come from [`GeneralRegistry::with_builtins`].
//! - **Local** ([`LocalRegistry`]) - owned by a single [`Coercer`], created
//!   empty, extended through [`Coercer::register_local`].
//!
//! Lookup checks the local tier first, then the general tier.
//!
//! ## Register before use
//!
//! Finish registering before coercion traffic starts. Reads take a lock-free
//! snapshot of the general map, so a registration racing with a coercion call
//! is memory safe, but whether that call observes the new parser is
//! unspecified.
//!
//! ```
//! use restmodels::coercion::{CoercionFailure, Coercer};
//! use restmodels::descriptor::{DeclaredType, TypeDescriptor, TypeHead};
//! use restmodels::registry::GeneralRegistry;
//! use restmodels::value::TypedValue;
//!
//! let general = GeneralRegistry::with_builtins();
//! general.register(TypeHead::custom("Upper"), |value: &TypedValue, _: &TypeDescriptor, _: &Coercer| {
//!     Ok::<_, CoercionFailure>(TypedValue::Str(value.to_string().to_uppercase()))
//! });
//!
//! let coercer = Coercer::new(general);
//! let out = coercer.coerce("abc", &DeclaredType::custom("Upper")).unwrap();
//! assert_eq!(out, TypedValue::Str("ABC".into()));
//! ```
//!
//! [`Coercer`]: crate::coercion::Coercer
//! [`Coercer::register_local`]: crate::coercion::Coercer::register_local
//! [`Coercer::default`]: crate::coercion::Coercer

use crate::coercion::{CoercionFailure, Coercer};
use crate::descriptor::{TypeDescriptor, TypeHead};
use crate::value::TypedValue;
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Conversion routine for one head type.
///
/// Receives the source value, the full descriptor (so it can read the nested
/// parameter descriptors) and the calling [`Coercer`], through which nested
/// values are converted with [`Coercer::coerce_descriptor`].
pub trait TypeParser: Send + Sync {
    fn parse(
        &self,
        value: &TypedValue,
        descriptor: &TypeDescriptor,
        coercer: &Coercer,
    ) -> Result<TypedValue, CoercionFailure>;
}

impl<F> TypeParser for F
where
    F: Fn(&TypedValue, &TypeDescriptor, &Coercer) -> Result<TypedValue, CoercionFailure>
        + Send
        + Sync,
{
    fn parse(
        &self,
        value: &TypedValue,
        descriptor: &TypeDescriptor,
        coercer: &Coercer,
    ) -> Result<TypedValue, CoercionFailure> {
        (self)(value, descriptor, coercer)
    }
}

/// Shared, stateless parser entry.
pub type ParserEntry = Arc<dyn TypeParser>;

type ParserMap = HashMap<TypeHead, ParserEntry>;

static GLOBAL: Lazy<GeneralRegistry> = Lazy::new(GeneralRegistry::with_builtins);

/// Process-wide parser tier.
///
/// Cloning the handle shares the underlying map.
#[derive(Clone)]
pub struct GeneralRegistry {
    parsers: Arc<ArcSwap<ParserMap>>,
}

impl GeneralRegistry {
    /// Registry with no parsers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Arc::new(ArcSwap::from_pointee(HashMap::new())),
        }
    }

    /// Registry populated with every builtin parser.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        crate::parsers::register_builtins(&registry);
        registry
    }

    /// Handle to the process-wide registry, populated with the builtins the
    /// first time it is touched.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Add or overwrite the parser for `head`.
    pub fn register<P>(&self, head: TypeHead, parser: P)
    where
        P: TypeParser + 'static,
    {
        self.register_entry(head, Arc::new(parser));
    }

    /// Add or overwrite the parser for `head` with an existing entry.
    pub fn register_entry(&self, head: TypeHead, entry: ParserEntry) {
        debug!(head = %head, "registering general type parser");
        self.parsers.rcu(|current| {
            let mut next: ParserMap = (**current).clone();
            next.insert(head.clone(), Arc::clone(&entry));
            next
        });
    }

    #[must_use]
    pub fn lookup(&self, head: &TypeHead) -> Option<ParserEntry> {
        self.parsers.load().get(head).cloned()
    }

    #[must_use]
    pub fn contains(&self, head: &TypeHead) -> bool {
        self.parsers.load().contains_key(head)
    }

    /// Registered heads, in no particular order.
    #[must_use]
    pub fn heads(&self) -> Vec<TypeHead> {
        self.parsers.load().keys().cloned().collect()
    }
}

impl fmt::Debug for GeneralRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneralRegistry")
            .field("heads", &self.parsers.load().len())
            .finish()
    }
}

/// Per-coercer parser tier.
#[derive(Default, Clone)]
pub struct LocalRegistry {
    parsers: ParserMap,
}

impl LocalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite the parser for `head`.
    pub fn register(&mut self, head: TypeHead, entry: ParserEntry) {
        debug!(head = %head, "registering local type parser");
        self.parsers.insert(head, entry);
    }

    #[must_use]
    pub fn lookup(&self, head: &TypeHead) -> Option<ParserEntry> {
        self.parsers.get(head).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for LocalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRegistry")
            .field("heads", &self.parsers.len())
            .finish()
    }
}

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Local,
    General,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Local => f.write_str("local"),
            Tier::General => f.write_str("general"),
        }
    }
}

/// Local-over-general lookup.
#[must_use]
pub fn lookup(
    local: &LocalRegistry,
    general: &GeneralRegistry,
    head: &TypeHead,
) -> Option<(ParserEntry, Tier)> {
    local
        .lookup(head)
        .map(|entry| (entry, Tier::Local))
        .or_else(|| general.lookup(head).map(|entry| (entry, Tier::General)))
}
