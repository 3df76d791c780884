//! Path template substitution.

use super::{render_arg, BindingError, CallArgs};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex should be valid"));

/// Names of the `{name}` placeholders in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replace every `{name}` placeholder with the text of `args[name]`.
///
/// With `exclude` the substituted arguments are removed from `args`, leaving
/// only the ones meant for the query string or the body. A placeholder that
/// appears more than once is substituted everywhere from the same argument.
pub fn build_path(
    template: &str,
    args: &mut CallArgs,
    exclude: bool,
) -> Result<String, BindingError> {
    let mut rendered: HashMap<&str, String> = HashMap::new();
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if !rendered.contains_key(name) {
            let value = if exclude {
                args.shift_remove(name)
            } else {
                args.get(name).cloned()
            };
            let Some(value) = value else {
                return Err(BindingError::MissingPathParam {
                    name: name.to_string(),
                    template: template.to_string(),
                });
            };
            rendered.insert(name, render_arg(&value));
        }
        out.push_str(&template[last..whole.start()]);
        if let Some(text) = rendered.get(name) {
            out.push_str(text);
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}
