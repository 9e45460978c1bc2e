//! Configuration management for mdcast
//!
//! Configuration is loaded once per run from a project-local file
//! (`mdcast.toml`, `.mdcast.toml`, or `mdcast.json`), or from the path
//! in `MDCAST_CONFIG`. API credentials are never stored here; they come
//! from the environment at publish time (see [`crate::credentials`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::tags::HashnodeTag;

/// Filenames searched, in order, in the working directory
pub const CONFIG_FILENAMES: &[&str] = &["mdcast.toml", ".mdcast.toml", "mdcast.json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markdown: MarkdownConfig,
    pub devto: DevtoOptions,
    pub hashnode: HashnodeOptions,
    pub medium: MediumOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Frontmatter key names for each post field
    pub frontmatter: FrontmatterKeys,
    /// Base URL prepended to relative links in the body
    pub link_url_base: String,
    /// Base URL the post slug is appended to
    pub canonical_url_base: String,
    /// Base URL prepended to relative image paths
    pub image_url_base: String,
    /// Language filled in on fenced code blocks that lack one
    pub default_language: Option<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            frontmatter: FrontmatterKeys::default(),
            link_url_base: String::new(),
            canonical_url_base: String::new(),
            image_url_base: String::new(),
            default_language: None,
        }
    }
}

/// Maps post fields to the frontmatter keys that hold them
///
/// Lets a source file use e.g. `summary:` for the description without
/// renaming anything in the file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontmatterKeys {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub tags: String,
    pub image: String,
    pub date: String,
    pub slug: String,
}

impl Default for FrontmatterKeys {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            description: "description".to_string(),
            canonical_url: "canonical_url".to_string(),
            tags: "tags".to_string(),
            image: "image".to_string(),
            date: "date".to_string(),
            slug: "slug".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevtoOptions {
    pub should_publish: bool,
}

impl Default for DevtoOptions {
    fn default() -> Self {
        Self {
            should_publish: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HashnodeOptions {
    pub should_hide: bool,
    /// Ordered name/slug/id entries; lookup is first-match by
    /// normalized substring (see [`crate::tags`])
    pub tags_dictionary: Vec<HashnodeTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumOptions {
    pub should_publish: bool,
    pub should_notify_followers: bool,
    pub tags_dictionary: Vec<String>,
}

impl Default for MediumOptions {
    fn default() -> Self {
        Self {
            should_publish: true,
            should_notify_followers: false,
            tags_dictionary: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from `MDCAST_CONFIG` or the working directory
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("MDCAST_CONFIG") {
            let expanded = shellexpand::tilde(&path).to_string();
            return Self::load_from_path(Path::new(&expanded));
        }

        let cwd = std::env::current_dir().map_err(ConfigError::ReadError)?;
        Self::load_from_dir(&cwd)
    }

    /// Load configuration by searching the conventional filenames in `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        match find_config_file(dir) {
            Some(path) => Self::load_from_path(&path),
            None => Err(ConfigError::NotFound(dir.display().to_string()).into()),
        }
    }

    /// Load configuration from a specific path (TOML or JSON by extension)
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(ConfigError::JsonParseError)?
        } else {
            toml::from_str(&content).map_err(ConfigError::ParseError)?
        };

        Ok(config)
    }

    /// Write a scaffold config file into `dir`
    ///
    /// Returns the path written. Callers are expected to check for an
    /// existing config first; this overwrites unconditionally.
    pub fn write_scaffold(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILENAMES[0]);
        std::fs::write(&path, SCAFFOLD).map_err(ConfigError::ReadError)?;
        Ok(path)
    }
}

/// Find an existing config file in `dir`, if any
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

const SCAFFOLD: &str = r#"# mdcast configuration
#
# Credentials are read from the environment, not from this file:
#   DEVTO_API_KEY, DEVTO_ORG_ID, GIPHY_API_KEY,
#   HASHNODE_TOKEN, HASHNODE_PUBLICATION_ID,
#   MEDIUM_TOKEN, MEDIUM_PUBLICATION_NAME, GITHUB_TOKEN

[markdown]
# Base URL prepended to relative links in the article body.
link_url_base = ""
# The post slug is appended to this to form the canonical URL.
canonical_url_base = ""
# Base URL prepended to relative image paths.
image_url_base = ""
# Uncomment to tag bare fenced code blocks with a language.
# default_language = "bash"

# Rename these if your frontmatter uses different keys,
# e.g. description = "summary".
[markdown.frontmatter]
title = "title"
description = "description"
canonical_url = "canonical_url"
tags = "tags"
image = "image"
date = "date"
slug = "slug"

[devto]
should_publish = true

[hashnode]
should_hide = false
# Find the slug on hashnode.com, then query the id at
# https://gql.hashnode.com with: query { tag(slug: "...") { id } }
tags_dictionary = []
# [[hashnode.tags_dictionary]]
# id = "56744723958ef13879b954e0"
# name = "TypeScript"
# slug = "typescript"

[medium]
should_publish = true
should_notify_followers = false
# Medium tag slugs, e.g. from https://medium.com/tag/<slug>
tags_dictionary = []
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdcastError;

    #[test]
    fn test_default_frontmatter_keys() {
        let keys = FrontmatterKeys::default();
        assert_eq!(keys.title, "title");
        assert_eq!(keys.tags, "tags");
        assert_eq!(keys.slug, "slug");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.devto.should_publish);
        assert!(!config.hashnode.should_hide);
        assert!(config.medium.tags_dictionary.is_empty());
        assert_eq!(config.markdown.link_url_base, "");
    }

    #[test]
    fn test_parse_full_toml() {
        let content = r#"
            [markdown]
            link_url_base = "https://site.com"
            canonical_url_base = "https://site.com/blog"
            image_url_base = "https://site.com"
            default_language = "bash"

            [markdown.frontmatter]
            description = "summary"
            image = "images"

            [devto]
            should_publish = false

            [hashnode]
            should_hide = true

            [[hashnode.tags_dictionary]]
            id = "56744723958ef13879b954e0"
            name = "TypeScript"
            slug = "typescript"

            [medium]
            should_notify_followers = true
            tags_dictionary = ["typescript", "react"]
        "#;

        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.markdown.frontmatter.description, "summary");
        assert_eq!(config.markdown.frontmatter.image, "images");
        assert_eq!(config.markdown.frontmatter.title, "title");
        assert_eq!(config.markdown.default_language.as_deref(), Some("bash"));
        assert!(!config.devto.should_publish);
        assert!(config.hashnode.should_hide);
        assert_eq!(config.hashnode.tags_dictionary[0].slug, "typescript");
        assert_eq!(config.medium.tags_dictionary, vec!["typescript", "react"]);
    }

    #[test]
    fn test_load_from_dir_json() {
        let dir = tempfile::tempdir().unwrap();
        let content = r#"{"markdown": {"image_url_base": "https://x.com"}}"#;
        std::fs::write(dir.path().join("mdcast.json"), content).unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.markdown.image_url_base, "https://x.com");
    }

    #[test]
    fn test_load_from_dir_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("mdcast.toml"),
            "[markdown]\nlink_url_base = \"https://toml.example\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("mdcast.json"),
            r#"{"markdown": {"link_url_base": "https://json.example"}}"#,
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.markdown.link_url_base, "https://toml.example");
    }

    #[test]
    fn test_load_from_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            MdcastError::Config(ConfigError::NotFound(_))
        ));
        assert!(format!("{}", err).contains("mdcast init"));
    }

    #[test]
    fn test_load_from_dir_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mdcast.toml"), "not = [valid").unwrap();
        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            MdcastError::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_scaffold_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::write_scaffold(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "mdcast.toml");

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert!(config.devto.should_publish);
        assert!(config.hashnode.tags_dictionary.is_empty());
    }
}
