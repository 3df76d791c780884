//! Parser for annotation-style type expressions such as
//! `list[tuple[datetime, int]]`, `int | str | None` or `Optional[Decimal]`.

use super::core::{ContainerKind, DeclaredType, ScalarKind, TemporalKind, TypeTag};
use std::fmt;
use std::str::FromStr;

/// Error produced when a type expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExprError {
    /// Byte offset into the expression where parsing stopped
    pub offset: usize,
    pub message: String,
}

impl TypeExprError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for TypeExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid type expression at offset {}: {}",
            self.offset, self.message
        )
    }
}

impl std::error::Error for TypeExprError {}

impl FromStr for DeclaredType {
    type Err = TypeExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let declared = parser.expr()?;
        parser.skip_ws();
        if parser.pos < s.len() {
            return Err(TypeExprError::new(parser.pos, "unexpected trailing input"));
        }
        Ok(declared)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// `expr := term ('|' term)*`
    fn expr(&mut self) -> Result<DeclaredType, TypeExprError> {
        let first = self.term()?;
        if !self.eat('|') {
            return Ok(first);
        }
        let mut alternatives = vec![first];
        loop {
            alternatives.push(self.term()?);
            if !self.eat('|') {
                break;
            }
        }
        Ok(DeclaredType::Union(alternatives))
    }

    /// `term := ident ('[' expr (',' expr)* ']')?`
    fn term(&mut self) -> Result<DeclaredType, TypeExprError> {
        self.skip_ws();
        let start = self.pos;
        let name = self.ident()?;
        let params = if self.eat('[') {
            self.params()?
        } else {
            Vec::new()
        };
        build(name, params, start)
    }

    fn params(&mut self) -> Result<Vec<DeclaredType>, TypeExprError> {
        let mut params = Vec::new();
        if self.eat(']') {
            return Ok(params);
        }
        loop {
            params.push(self.expr()?);
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(params);
            }
            return Err(TypeExprError::new(self.pos, "expected ',' or ']'"));
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeExprError> {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(TypeExprError::new(start, "expected a type name"));
        }
        let name = &src[start..self.pos];
        if name == "..." {
            return Err(TypeExprError::new(start, "variadic tuples are not supported"));
        }
        // Dotted names need a non-empty segment on each side of every dot.
        if name.split('.').any(str::is_empty) {
            return Err(TypeExprError::new(start, format!("malformed type name '{name}'")));
        }
        Ok(name)
    }
}

fn build(
    name: &str,
    params: Vec<DeclaredType>,
    offset: usize,
) -> Result<DeclaredType, TypeExprError> {
    let leaf = match name {
        "str" => Some(DeclaredType::Scalar(ScalarKind::Str)),
        "int" => Some(DeclaredType::Scalar(ScalarKind::Int)),
        "bool" => Some(DeclaredType::Scalar(ScalarKind::Bool)),
        "float" => Some(DeclaredType::Scalar(ScalarKind::Float)),
        "decimal" | "Decimal" => Some(DeclaredType::Scalar(ScalarKind::Decimal)),
        "bytes" => Some(DeclaredType::Scalar(ScalarKind::Bytes)),
        "datetime" => Some(DeclaredType::Temporal(TemporalKind::DateTime)),
        "date" => Some(DeclaredType::Temporal(TemporalKind::Date)),
        "time" => Some(DeclaredType::Temporal(TemporalKind::Time)),
        "timedelta" | "duration" => Some(DeclaredType::Temporal(TemporalKind::Duration)),
        "None" | "none" | "NoneType" => Some(DeclaredType::None),
        _ => None,
    };
    if let Some(leaf) = leaf {
        if !params.is_empty() {
            return Err(TypeExprError::new(
                offset,
                format!("`{name}` does not take type parameters"),
            ));
        }
        return Ok(leaf);
    }

    let declared = match name {
        "tuple" | "Tuple" => DeclaredType::Container(ContainerKind::Tuple, params),
        "list" | "List" => DeclaredType::Container(ContainerKind::List, params),
        "set" | "Set" => DeclaredType::Container(ContainerKind::Set, params),
        "frozenset" | "FrozenSet" => DeclaredType::Container(ContainerKind::FrozenSet, params),
        "Union" => DeclaredType::Union(params),
        "Optional" => {
            if params.len() != 1 {
                return Err(TypeExprError::new(
                    offset,
                    "`Optional` takes exactly one type parameter",
                ));
            }
            let mut params = params;
            DeclaredType::optional(params.remove(0))
        }
        other => DeclaredType::Custom(TypeTag::new(other), params),
    };
    Ok(declared)
}
