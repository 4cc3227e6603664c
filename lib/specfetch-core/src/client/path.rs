use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;

/// Characters escaped in URL components: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Regular expression for matching path placeholders in the format `:name`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(?<name>\w+)(?:/|$)").expect("a valid regex"));

/// Percent-encodes a path segment or query component.
pub(super) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Renders a JSON value as the raw text placed in a URL.
///
/// Arrays are comma-joined and `null` renders empty.
pub(super) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Replaces every `:name` placeholder followed by `/` or the end of `path`.
fn replace_path_param(path: &str, name: &str, value: &str) -> String {
    let pattern = [":", name].concat();
    let mut result = String::with_capacity(path.len() + value.len());
    let mut rest = path;

    while let Some(index) = rest.find(&pattern) {
        let (before, found) = rest.split_at(index);
        let tail = found.get(pattern.len()..).unwrap_or_default();
        result.push_str(before);
        if is_placeholder_end(tail) {
            result.push_str(value);
        } else {
            result.push_str(&pattern);
        }
        rest = tail;
    }
    result.push_str(rest);

    result
}

fn is_placeholder_end(tail: &str) -> bool {
    tail.is_empty() || tail.starts_with('/')
}

/// A URL path template with `:name` placeholders.
///
/// Placeholders only count when followed by `/` or the end of the template, so
/// `:id` never matches inside `:idx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{template}")]
pub(super) struct PathTemplate {
    template: &'static str,
}

impl PathTemplate {
    pub(super) fn new(template: &'static str) -> Self {
        Self { template }
    }

    /// Whether the template has a `:name` placeholder.
    pub(super) fn has_placeholder(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let pattern = [":", name].concat();
        self.template
            .match_indices(&pattern)
            .any(|(index, _)| {
                let tail = self
                    .template
                    .get(index + pattern.len()..)
                    .unwrap_or_default();
                is_placeholder_end(tail)
            })
    }

    /// Names of the placeholders found in the template.
    pub(super) fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        RE.captures_iter(self.template)
            .filter_map(|caps| caps.name("name"))
            .map(|name| name.as_str())
    }

    /// Substitutes the given values, percent-encoded, into their placeholders.
    ///
    /// Placeholders without a value are left untouched.
    pub(super) fn render<'a>(&self, params: impl IntoIterator<Item = (&'a str, &'a Value)>) -> String {
        params
            .into_iter()
            .fold(self.template.to_string(), |path, (name, value)| {
                let encoded = encode_component(&value_to_string(value));
                // every occurrence, not just the first: a repeated placeholder names one value
                replace_path_param(&path, name, &encoded)
            })
    }
}
