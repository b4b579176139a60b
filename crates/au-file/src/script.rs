//! Class-name extraction from behavior code.

use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)[^{]*\{").expect("class declaration pattern")
});

/// The name of the first `class Name ... {` declaration in `code`.
pub fn extract_class_name(code: &str) -> Option<String> {
    CLASS_DECLARATION
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
}
