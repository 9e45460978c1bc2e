//! Markdown loading and transformation
//!
//! [`MarkdownSource`] parses an article file into frontmatter plus a
//! rewritten body: relative image and link targets are made absolute
//! using the configured base URLs, and bare fenced code blocks can be
//! given a default language. Field accessors go through the configured
//! frontmatter key names so source files keep their own vocabulary.

pub mod frontmatter;
pub(crate) mod rewrite;

use std::path::Path;

use serde_json::Value;

use crate::config::{FrontmatterKeys, MarkdownConfig};
use crate::error::{ConfigError, MdcastError, Result};

pub use frontmatter::{extract_frontmatter, FrontmatterResult};
pub use rewrite::{is_external, normalize_path, strip_extension};

/// A parsed and transformed markdown article
#[derive(Debug, Clone)]
pub struct MarkdownSource {
    frontmatter: Option<Value>,
    body: String,
    file_stem: String,
    keys: FrontmatterKeys,
}

impl MarkdownSource {
    /// Load and transform an article from disk
    pub fn load(path: &Path, config: &MarkdownConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MdcastError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        Self::from_content(&content, &file_stem, config)
    }

    /// Parse and transform article content
    ///
    /// `file_stem` is the slug fallback when the frontmatter has none.
    pub fn from_content(content: &str, file_stem: &str, config: &MarkdownConfig) -> Result<Self> {
        let extracted = extract_frontmatter(content);
        let body = rewrite_body(extracted.body(), config)?;

        Ok(Self {
            frontmatter: extracted.into_value(),
            body,
            file_stem: file_stem.to_string(),
            keys: config.frontmatter.clone(),
        })
    }

    /// The transformed body, frontmatter removed
    pub fn markdown(&self) -> &str {
        &self.body
    }

    pub fn title(&self) -> Option<&str> {
        self.field_str(&self.keys.title)
    }

    pub fn description(&self) -> Option<&str> {
        self.field_str(&self.keys.description)
    }

    /// Explicit canonical URL from the frontmatter, overriding the
    /// `canonical_url_base` + slug construction
    pub fn canonical_url(&self) -> Option<&str> {
        self.field_str(&self.keys.canonical_url)
    }

    /// Tags as an ordered list; a comma-separated string is accepted
    /// for convenience
    pub fn tags(&self) -> Vec<String> {
        let Some(value) = self.field(&self.keys.tags) else {
            return Vec::new();
        };
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Cover image path as written in the frontmatter (first element
    /// when the key holds a list)
    pub fn image(&self) -> Option<&str> {
        match self.field(&self.keys.image)? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first()?.as_str(),
            _ => None,
        }
    }

    /// Publish date, normalized to RFC 3339 when it parses as a date
    pub fn date(&self) -> Option<String> {
        let raw = self.field_str(&self.keys.date)?;
        if let Ok(date) = raw.parse::<chrono::NaiveDate>() {
            return Some(date.format("%Y-%m-%d").to_string());
        }
        if let Ok(datetime) = raw.parse::<chrono::DateTime<chrono::FixedOffset>>() {
            return Some(datetime.to_rfc3339());
        }
        Some(raw.to_string())
    }

    /// Slug from the frontmatter, falling back to the file name
    /// without extension
    pub fn slug(&self) -> &str {
        self.field_str(&self.keys.slug).unwrap_or(&self.file_stem)
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.frontmatter.as_ref()?.get(key)
    }

    fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key)?.as_str()
    }
}

/// Rewrite relative references and bare code fences in the body
fn rewrite_body(body: &str, config: &MarkdownConfig) -> Result<String> {
    let mut edits = Vec::new();

    for image in rewrite::collect_images(body) {
        if is_external(&image.dest) {
            continue;
        }
        if config.image_url_base.is_empty() {
            return Err(ConfigError::MissingBaseUrl {
                option: "image_url_base".to_string(),
                path: image.dest.clone(),
            }
            .into());
        }
        let new_dest = format!("{}{}", config.image_url_base, normalize_path(&image.dest));
        if let Some(edit) = rewrite::dest_edit(body, &image, &new_dest) {
            edits.push(edit);
        }
    }

    for link in rewrite::collect_links(body) {
        if is_external(&link.dest) {
            continue;
        }
        if config.link_url_base.is_empty() {
            return Err(ConfigError::MissingBaseUrl {
                option: "link_url_base".to_string(),
                path: link.dest.clone(),
            }
            .into());
        }
        let normalized = normalize_path(&link.dest);
        let new_dest = format!("{}{}", config.link_url_base, strip_extension(&normalized));
        if let Some(edit) = rewrite::dest_edit(body, &link, &new_dest) {
            edits.push(edit);
        }
    }

    if let Some(language) = config.default_language.as_deref() {
        for block in rewrite::collect_fenced_blocks(body) {
            if block.info.trim().is_empty() {
                edits.push(rewrite::fence_info_edit(body, &block, language));
            }
        }
    }

    Ok(rewrite::apply_edits(body, edits))
}
