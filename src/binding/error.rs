use crate::coercion::CoercionError;
use std::fmt;

/// Failure of a bound endpoint call.
#[derive(Debug)]
pub enum BindingError {
    /// A `{name}` placeholder in the path template had no argument
    MissingPathParam {
        name: String,
        template: String,
    },
    /// A declared body parameter had no argument
    MissingBodyParam {
        name: String,
    },
    /// A flat body needs exactly one body parameter
    FlatBodyArity {
        count: usize,
    },
    /// The transport failed or the server answered with an error status
    Transport(anyhow::Error),
    /// The response body could not be coerced into the declared return type
    Coercion(CoercionError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::MissingPathParam { name, template } => {
                write!(f, "missing path parameter '{name}' for '{template}'")
            }
            BindingError::MissingBodyParam { name } => {
                write!(f, "missing body parameter '{name}'")
            }
            BindingError::FlatBodyArity { count } => write!(
                f,
                "a flat body takes exactly one body parameter, {count} declared"
            ),
            BindingError::Transport(err) => write!(f, "request failed: {err:#}"),
            BindingError::Coercion(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindingError::Transport(err) => {
                let source: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(source)
            }
            BindingError::Coercion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoercionError> for BindingError {
    fn from(err: CoercionError) -> Self {
        BindingError::Coercion(err)
    }
}
