use std::fmt;
use std::sync::Arc;

/// Scalar heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Str,
    Int,
    Bool,
    Float,
    Decimal,
    Bytes,
}

impl ScalarKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Str => "str",
            ScalarKind::Int => "int",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Bytes => "bytes",
        }
    }
}

/// Temporal heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// Date plus time of day (an instant)
    DateTime,
    Date,
    Time,
    Duration,
}

impl TemporalKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TemporalKind::DateTime => "datetime",
            TemporalKind::Date => "date",
            TemporalKind::Time => "time",
            TemporalKind::Duration => "timedelta",
        }
    }
}

/// Container heads. Containers are the only builtin heads that take parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Tuple,
    List,
    Set,
    FrozenSet,
}

impl ContainerKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Tuple => "tuple",
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
            ContainerKind::FrozenSet => "frozenset",
        }
    }
}

/// Name of a caller-registered head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Arc<str>);

impl TypeTag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::new(name)
    }
}

/// A declared target type.
///
/// Built statically by the caller (or parsed from an annotation string, see
/// [`DeclaredType::from_str`](std::str::FromStr)) and handed to the engine
/// alongside the raw value.
///
/// ```
/// use restmodels::descriptor::DeclaredType;
///
/// let declared = DeclaredType::list_of(DeclaredType::tuple_of([
///     DeclaredType::datetime(),
///     DeclaredType::int(),
/// ]));
/// assert_eq!(declared.to_string(), "list[tuple[datetime, int]]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Scalar(ScalarKind),
    Temporal(TemporalKind),
    /// The null type
    None,
    /// Container with its generic parameters; no parameters means "shallow"
    Container(ContainerKind, Vec<DeclaredType>),
    /// Alternatives in declared order
    Union(Vec<DeclaredType>),
    /// Caller-registered head with optional parameters
    Custom(TypeTag, Vec<DeclaredType>),
}

impl DeclaredType {
    #[must_use]
    pub fn str() -> Self {
        DeclaredType::Scalar(ScalarKind::Str)
    }

    #[must_use]
    pub fn int() -> Self {
        DeclaredType::Scalar(ScalarKind::Int)
    }

    #[must_use]
    pub fn bool() -> Self {
        DeclaredType::Scalar(ScalarKind::Bool)
    }

    #[must_use]
    pub fn float() -> Self {
        DeclaredType::Scalar(ScalarKind::Float)
    }

    #[must_use]
    pub fn decimal() -> Self {
        DeclaredType::Scalar(ScalarKind::Decimal)
    }

    #[must_use]
    pub fn bytes() -> Self {
        DeclaredType::Scalar(ScalarKind::Bytes)
    }

    #[must_use]
    pub fn datetime() -> Self {
        DeclaredType::Temporal(TemporalKind::DateTime)
    }

    #[must_use]
    pub fn date() -> Self {
        DeclaredType::Temporal(TemporalKind::Date)
    }

    #[must_use]
    pub fn time() -> Self {
        DeclaredType::Temporal(TemporalKind::Time)
    }

    #[must_use]
    pub fn duration() -> Self {
        DeclaredType::Temporal(TemporalKind::Duration)
    }

    /// Un-parametrized container: converted shallowly.
    #[must_use]
    pub fn bare(kind: ContainerKind) -> Self {
        DeclaredType::Container(kind, Vec::new())
    }

    #[must_use]
    pub fn list_of(item: DeclaredType) -> Self {
        DeclaredType::Container(ContainerKind::List, vec![item])
    }

    #[must_use]
    pub fn set_of(item: DeclaredType) -> Self {
        DeclaredType::Container(ContainerKind::Set, vec![item])
    }

    #[must_use]
    pub fn frozenset_of(item: DeclaredType) -> Self {
        DeclaredType::Container(ContainerKind::FrozenSet, vec![item])
    }

    pub fn tuple_of(items: impl IntoIterator<Item = DeclaredType>) -> Self {
        DeclaredType::Container(ContainerKind::Tuple, items.into_iter().collect())
    }

    pub fn union_of(alternatives: impl IntoIterator<Item = DeclaredType>) -> Self {
        DeclaredType::Union(alternatives.into_iter().collect())
    }

    /// `inner | None`
    #[must_use]
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Union(vec![inner, DeclaredType::None])
    }

    pub fn custom(tag: impl Into<TypeTag>) -> Self {
        DeclaredType::Custom(tag.into(), Vec::new())
    }

    /// Whether the declared type carries generic parameters (or is a union).
    #[must_use]
    pub fn is_parametrized(&self) -> bool {
        match self {
            DeclaredType::Scalar(_) | DeclaredType::Temporal(_) | DeclaredType::None => false,
            DeclaredType::Container(_, params) | DeclaredType::Custom(_, params) => {
                !params.is_empty()
            }
            DeclaredType::Union(_) => true,
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[DeclaredType]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    f.write_str("[")?;
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{p}")?;
    }
    f.write_str("]")
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(kind) => f.write_str(kind.name()),
            DeclaredType::Temporal(kind) => f.write_str(kind.name()),
            DeclaredType::None => f.write_str("None"),
            DeclaredType::Container(kind, params) => {
                f.write_str(kind.name())?;
                write_params(f, params)
            }
            DeclaredType::Custom(tag, params) => {
                write!(f, "{tag}")?;
                write_params(f, params)
            }
            DeclaredType::Union(alternatives) if alternatives.is_empty() => {
                f.write_str("Union[]")
            }
            DeclaredType::Union(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                Ok(())
            }
        }
    }
}

/// Dispatch key of a declared type: the type with its parameters stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHead {
    Scalar(ScalarKind),
    Temporal(TemporalKind),
    Container(ContainerKind),
    Union,
    None,
    Custom(TypeTag),
}

impl TypeHead {
    /// Every head with a builtin parser.
    pub const BUILTINS: [TypeHead; 16] = [
        TypeHead::Scalar(ScalarKind::Str),
        TypeHead::Scalar(ScalarKind::Int),
        TypeHead::Scalar(ScalarKind::Bool),
        TypeHead::Scalar(ScalarKind::Float),
        TypeHead::Scalar(ScalarKind::Decimal),
        TypeHead::Scalar(ScalarKind::Bytes),
        TypeHead::Temporal(TemporalKind::DateTime),
        TypeHead::Temporal(TemporalKind::Date),
        TypeHead::Temporal(TemporalKind::Time),
        TypeHead::Temporal(TemporalKind::Duration),
        TypeHead::Container(ContainerKind::Tuple),
        TypeHead::Container(ContainerKind::List),
        TypeHead::Container(ContainerKind::Set),
        TypeHead::Container(ContainerKind::FrozenSet),
        TypeHead::Union,
        TypeHead::None,
    ];

    pub fn custom(tag: impl Into<TypeTag>) -> Self {
        TypeHead::Custom(tag.into())
    }
}

impl fmt::Display for TypeHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHead::Scalar(kind) => f.write_str(kind.name()),
            TypeHead::Temporal(kind) => f.write_str(kind.name()),
            TypeHead::Container(kind) => f.write_str(kind.name()),
            TypeHead::Union => f.write_str("Union"),
            TypeHead::None => f.write_str("None"),
            TypeHead::Custom(tag) => write!(f, "{tag}"),
        }
    }
}

/// Head plus ordered nested parameter descriptors.
///
/// A finite tree derived from a [`DeclaredType`], never from the value being
/// converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub head: TypeHead,
    pub params: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    #[must_use]
    pub fn leaf(head: TypeHead) -> Self {
        Self {
            head,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn new(head: TypeHead, params: Vec<TypeDescriptor>) -> Self {
        Self { head, params }
    }

    /// Concrete, non-parametrized head eligible for the identity fast path.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.params.is_empty()
            && matches!(
                self.head,
                TypeHead::Scalar(_) | TypeHead::Temporal(_) | TypeHead::Container(_)
            )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.head == TypeHead::Union {
            if self.params.is_empty() {
                return f.write_str("Union[]");
            }
            for (i, alt) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                write!(f, "{alt}")?;
            }
            return Ok(());
        }
        write!(f, "{}", self.head)?;
        if !self.params.is_empty() {
            f.write_str("[")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Decompose a declared type into its head and parameter descriptors.
///
/// Union alternatives keep their declared order. Nested unions are flattened,
/// repeated alternatives keep only their first occurrence, and a union left
/// with a single alternative resolves to that alternative. Resolution never
/// fails: an unknown head only becomes an error when the engine looks it up.
#[must_use]
pub fn resolve(declared: &DeclaredType) -> TypeDescriptor {
    match declared {
        DeclaredType::Scalar(kind) => TypeDescriptor::leaf(TypeHead::Scalar(*kind)),
        DeclaredType::Temporal(kind) => TypeDescriptor::leaf(TypeHead::Temporal(*kind)),
        DeclaredType::None => TypeDescriptor::leaf(TypeHead::None),
        DeclaredType::Container(kind, params) => TypeDescriptor::new(
            TypeHead::Container(*kind),
            params.iter().map(resolve).collect(),
        ),
        DeclaredType::Custom(tag, params) => TypeDescriptor::new(
            TypeHead::Custom(tag.clone()),
            params.iter().map(resolve).collect(),
        ),
        DeclaredType::Union(alternatives) => {
            let mut flat: Vec<TypeDescriptor> = Vec::with_capacity(alternatives.len());
            flatten_union(alternatives, &mut flat);
            if flat.len() == 1 {
                return flat.remove(0);
            }
            TypeDescriptor::new(TypeHead::Union, flat)
        }
    }
}

fn flatten_union(alternatives: &[DeclaredType], out: &mut Vec<TypeDescriptor>) {
    for alt in alternatives {
        let resolved = resolve(alt);
        if resolved.head == TypeHead::Union {
            for inner in resolved.params {
                if !out.contains(&inner) {
                    out.push(inner);
                }
            }
        } else if !out.contains(&resolved) {
            out.push(resolved);
        }
    }
}
