//! Request body assembly.

use super::{render_arg, BindingError, CallArgs};
use serde_json::{Map, Value};

/// Shape of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyStyle {
    /// JSON object keyed by body parameter name
    #[default]
    Embedded,
    /// The single body parameter, sent as its string form
    Flat,
}

/// Assemble the body from the named parameters.
///
/// With `exclude` the consumed arguments are removed from `args`.
pub fn build_body(
    body_params: &[String],
    args: &mut CallArgs,
    style: BodyStyle,
    exclude: bool,
) -> Result<Value, BindingError> {
    let mut take = |name: &str| {
        let value = if exclude {
            args.shift_remove(name)
        } else {
            args.get(name).cloned()
        };
        value.ok_or_else(|| BindingError::MissingBodyParam {
            name: name.to_string(),
        })
    };

    match style {
        BodyStyle::Embedded => {
            let mut body = Map::new();
            for name in body_params {
                body.insert(name.clone(), take(name)?);
            }
            Ok(Value::Object(body))
        }
        BodyStyle::Flat => match body_params {
            [name] => Ok(Value::String(render_arg(&take(name)?))),
            _ => Err(BindingError::FlatBodyArity {
                count: body_params.len(),
            }),
        },
    }
}
