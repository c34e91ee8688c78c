//! `{{variable}}` substitution for step values and URLs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use sitepilot_core::{Error, Result};

static VAR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("variable token regex is valid")
});

/// Escape a bound value for the double-quoted argument context of the
/// driver command line. Only substituted values are escaped; literal
/// template text passes through untouched.
fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Substitute every `{{name}}` token. Referencing a variable that is not
/// bound is a hard error naming the variable, never a silent passthrough.
pub fn interpolate(template: &str, variables: &BTreeMap<String, String>) -> Result<String> {
    let mut missing: Option<String> = None;
    let result = VAR_TOKEN.replace_all(template, |caps: &regex::Captures| {
        let name = &caps[1];
        match variables.get(name) {
            Some(value) => escape_value(value),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });
    if let Some(name) = missing {
        return Err(Error::Interpolation(format!(
            "undefined variable '{}'",
            name
        )));
    }
    Ok(result.into_owned())
}
