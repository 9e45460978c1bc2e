//! Frontmatter extraction from markdown articles
//!
//! An article may open with a YAML block delimited by `---` or a TOML
//! block delimited by `+++`. Both are parsed into a `serde_json::Value`
//! so the rest of the pipeline reads fields the same way regardless of
//! the source syntax. The body is everything after the closing
//! delimiter; the frontmatter text itself never reaches the publish
//! payloads.

use serde_json::Value;
use tracing::warn;

/// Result of frontmatter extraction
#[derive(Debug, Clone)]
pub struct FrontmatterResult<'a> {
    value: Option<Value>,
    body: &'a str,
}

impl<'a> FrontmatterResult<'a> {
    /// Check if valid frontmatter was found and parsed
    pub fn has_frontmatter(&self) -> bool {
        self.value.is_some()
    }

    /// Get the parsed frontmatter, if present
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Take ownership of the parsed frontmatter, if present
    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Get the body content (everything after the frontmatter)
    pub fn body(&self) -> &'a str {
        self.body
    }
}

/// Extract YAML (`---`) or TOML (`+++`) frontmatter from `content`
///
/// Missing delimiters mean no frontmatter; an unterminated or invalid
/// block logs a warning and is treated as absent rather than failing
/// the run. Whether a post can be published without frontmatter is
/// decided later, when the title invariant is checked.
pub fn extract_frontmatter(content: &str) -> FrontmatterResult<'_> {
    if let Some(result) = extract_delimited(content, "---") {
        return result;
    }
    if let Some(result) = extract_delimited(content, "+++") {
        return result;
    }
    FrontmatterResult {
        value: None,
        body: content,
    }
}

fn extract_delimited<'a>(content: &'a str, delimiter: &str) -> Option<FrontmatterResult<'a>> {
    let rest = content.strip_prefix(delimiter)?;
    // The opening delimiter must be alone on its line
    let after_open = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;

    let (raw, after_close) = if let Some(rest) = after_open.strip_prefix(delimiter) {
        // Empty block: the closing delimiter follows immediately
        ("", rest)
    } else {
        let close = format!("\n{delimiter}");
        match after_open.find(&close) {
            Some(pos) => (&after_open[..pos], &after_open[pos + close.len()..]),
            None => {
                warn!("Frontmatter opening delimiter found but no closing delimiter");
                return Some(FrontmatterResult {
                    value: None,
                    body: content,
                });
            }
        }
    };

    let body = after_close.strip_prefix('\n').unwrap_or(after_close);
    let value = if delimiter == "+++" {
        parse_toml(raw)
    } else {
        parse_yaml(raw)
    };

    Some(FrontmatterResult { value, body })
}

fn parse_yaml(raw: &str) -> Option<Value> {
    let parsed: serde_yaml::Value = match serde_yaml::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse YAML frontmatter: {}", e);
            return None;
        }
    };
    match serde_json::to_value(parsed) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Frontmatter is not representable as JSON: {}", e);
            None
        }
    }
}

fn parse_toml(raw: &str) -> Option<Value> {
    match raw.parse::<toml::Value>() {
        Ok(value) => Some(toml_to_json(value)),
        Err(e) => {
            warn!("Failed to parse TOML frontmatter: {}", e);
            None
        }
    }
}

/// Convert a TOML value to JSON, rendering datetimes as strings
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
