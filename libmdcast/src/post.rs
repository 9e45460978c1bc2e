//! The normalized post record
//!
//! One [`Post`] is assembled per run and shared read-only by every
//! platform adapter. Adapters that need a modified body work on a
//! local copy.

use serde::{Deserialize, Serialize};

use crate::config::MarkdownConfig;
use crate::error::{ConfigError, MdcastError, Result};
use crate::markdown::{is_external, normalize_path, MarkdownSource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Transformed markdown body, frontmatter removed
    pub markdown: String,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
    pub tags: Vec<String>,
    /// Absolute cover image URL
    pub image: Option<String>,
    pub slug: String,
    /// Publish date in normalized form, when the frontmatter has one
    pub date: Option<String>,
}

impl Post {
    /// Combine the transformed article and its frontmatter fields into
    /// a post record
    ///
    /// Pure combination, no I/O. The canonical URL is
    /// `canonical_url_base` + slug unless the frontmatter carries an
    /// explicit one; the cover image gets `image_url_base` prepended
    /// when it is relative.
    pub fn assemble(source: &MarkdownSource, config: &MarkdownConfig) -> Result<Self> {
        let title = source
            .title()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                MdcastError::InvalidInput("Article frontmatter has no title".to_string())
            })?
            .to_string();

        let markdown = source.markdown().trim().to_string();
        if markdown.is_empty() {
            return Err(MdcastError::InvalidInput(
                "Article body is empty".to_string(),
            ));
        }

        let slug = source.slug().to_string();

        let canonical_url = match source.canonical_url() {
            Some(url) => Some(url.to_string()),
            None if config.canonical_url_base.is_empty() => None,
            None => Some(format!("{}/{}", config.canonical_url_base, slug)),
        };

        let image = source
            .image()
            .map(|path| absolute_image_url(path, config))
            .transpose()?;

        Ok(Self {
            title,
            markdown,
            description: source.description().map(str::to_string),
            canonical_url,
            tags: source.tags(),
            image,
            slug,
            date: source.date(),
        })
    }
}

fn absolute_image_url(path: &str, config: &MarkdownConfig) -> Result<String> {
    if is_external(path) {
        return Ok(path.to_string());
    }
    if config.image_url_base.is_empty() {
        return Err(ConfigError::MissingBaseUrl {
            option: "image_url_base".to_string(),
            path: path.to_string(),
        }
        .into());
    }
    Ok(format!("{}{}", config.image_url_base, normalize_path(path)))
}
