//! dev.to (Forem) platform adapter
//!
//! Content adaptation before the POST:
//! - tags are normalized to dev.to's bare alphanumeric form
//! - fenced code block metadata is stripped (the Forem renderer only
//!   understands the language token)
//! - GIF images are re-hosted through Giphy when a `GIPHY_API_KEY` is
//!   available, since dev.to re-encodes animated images poorly

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::DevtoOptions;
use crate::credentials::DevtoCredentials;
use crate::error::{PlatformError, Result};
use crate::markdown::rewrite;
use crate::platforms::{Platform, PublishedRef};
use crate::post::Post;
use crate::tags::normalize_tag;

const DEVTO_API_BASE: &str = "https://dev.to/api";
const GIPHY_UPLOAD_URL: &str = "https://upload.giphy.com/v1/gifs";
const GIPHY_DRY_RUN_URL: &str = "https://media.giphy.com/media/example/giphy.gif";

/// The `article` object of dev.to's create-article endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePayload {
    pub body_markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub published: bool,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    pub tags: Vec<String>,
}

pub struct DevtoPlatform {
    options: DevtoOptions,
    credentials: DevtoCredentials,
    client: reqwest::Client,
}

impl DevtoPlatform {
    pub fn new(options: DevtoOptions, credentials: DevtoCredentials) -> Self {
        Self {
            options,
            credentials,
            client: reqwest::Client::new(),
        }
    }

    /// Run all content adaptation and build the article payload
    ///
    /// Performs every transformation step even in dry-run mode; only
    /// the Giphy upload is replaced by a placeholder URL there.
    pub async fn prepare_article(&self, post: &Post, dry_run: bool) -> Result<ArticlePayload> {
        let body = self.sanitize_markdown(post, dry_run).await?;

        Ok(ArticlePayload {
            body_markdown: body,
            organization_id: self.credentials.organization_id.clone(),
            published: self.options.should_publish,
            title: post.title.clone(),
            description: post.description.clone(),
            canonical_url: post.canonical_url.clone(),
            main_image: post.image.clone(),
            tags: post.tags.iter().map(|tag| normalize_tag(tag)).collect(),
        })
    }

    /// Strip code fence metadata and re-host GIF images
    async fn sanitize_markdown(&self, post: &Post, dry_run: bool) -> Result<String> {
        let body = post.markdown.as_str();
        let mut edits = Vec::new();

        for block in rewrite::collect_fenced_blocks(body) {
            let language = block.info.split_whitespace().next().unwrap_or_default();
            if language != block.info.trim() {
                edits.push(rewrite::fence_info_edit(body, &block, language));
            }
        }

        for image in rewrite::collect_images(body) {
            if !image.dest.to_lowercase().ends_with(".gif") {
                continue;
            }
            if let Some(hosted) = self.rehost_gif(&image.dest, post, dry_run).await {
                if let Some(edit) = rewrite::dest_edit(body, &image, &hosted) {
                    edits.push(edit);
                }
            }
        }

        Ok(rewrite::apply_edits(body, edits))
    }

    /// Upload a GIF to Giphy, returning the re-hosted media URL
    ///
    /// Returns `None` when no Giphy key is configured or the upload
    /// fails; the original URL is kept in both cases.
    async fn rehost_gif(&self, gif_url: &str, post: &Post, dry_run: bool) -> Option<String> {
        let Some(api_key) = self.credentials.giphy_api_key.as_deref() else {
            warn!("Giphy API key not configured, skipping GIF re-hosting");
            return None;
        };

        if dry_run {
            return Some(GIPHY_DRY_RUN_URL.to_string());
        }

        let body = json!({
            "source_image_url": gif_url,
            "tags": ["blog", post.slug],
            "source_post_url": post.canonical_url,
        });

        let response = self
            .client
            .post(GIPHY_UPLOAD_URL)
            .query(&[("api_key", api_key)])
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to upload GIF to Giphy: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Giphy upload returned {}", response.status());
            return None;
        }

        let parsed: serde_json::Value = response.json().await.ok()?;
        let id = parsed["data"]["id"].as_str()?;
        Some(format!("https://media.giphy.com/media/{id}/giphy.gif"))
    }
}

#[async_trait]
impl Platform for DevtoPlatform {
    fn name(&self) -> &str {
        "devto"
    }

    async fn publish(&self, post: &Post, dry_run: bool) -> Result<PublishedRef> {
        let article = self.prepare_article(post, dry_run).await?;

        if dry_run {
            debug!("Article prepared for dev.to: {:?}", article);
            return Ok(PublishedRef {
                platform: self.name().to_string(),
                reference: None,
                dry_run: true,
            });
        }

        let response = self
            .client
            .post(format!("{DEVTO_API_BASE}/articles"))
            .header("api-key", &self.credentials.api_key)
            .header("Accept", "application/vnd.forem.api-v1+json")
            .json(&json!({ "article": article }))
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "dev.to returned {status}: {body}"
            ))
            .into());
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlatformError::Api(format!("Invalid dev.to response: {e}")))?;
        let reference = parsed["url"]
            .as_str()
            .or_else(|| parsed["id"].as_str())
            .map(str::to_string);

        Ok(PublishedRef {
            platform: self.name().to_string(),
            reference,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(giphy_key: Option<&str>) -> DevtoPlatform {
        DevtoPlatform::new(
            DevtoOptions::default(),
            DevtoCredentials {
                api_key: "test-key".to_string(),
                organization_id: None,
                giphy_api_key: giphy_key.map(str::to_string),
            },
        )
    }

    fn post() -> Post {
        Post {
            title: "T".to_string(),
            markdown: "Body text.".to_string(),
            description: Some("D".to_string()),
            canonical_url: Some("https://site.com/blog/t".to_string()),
            tags: vec!["shadcn-ui".to_string(), "Next.js".to_string()],
            image: Some("https://x.com/a.png".to_string()),
            slug: "t".to_string(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_prepare_article_normalizes_tags() {
        let article = platform(None).prepare_article(&post(), true).await.unwrap();
        assert_eq!(article.tags, vec!["shadcnui", "nextjs"]);
    }

    #[tokio::test]
    async fn test_prepare_article_end_to_end_fields() {
        // Everything lands in the payload without any network call.
        let article = platform(None).prepare_article(&post(), true).await.unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(article.main_image.as_deref(), Some("https://x.com/a.png"));
        assert!(article.published);
        assert_eq!(article.canonical_url.as_deref(), Some("https://site.com/blog/t"));
    }

    #[tokio::test]
    async fn test_code_fence_meta_stripped() {
        let mut post = post();
        post.markdown = "```rust title=main.rs {1-3}\nfn main() {}\n```\n".to_string();
        let article = platform(None).prepare_article(&post, true).await.unwrap();
        assert!(article.body_markdown.contains("```rust\n"));
        assert!(!article.body_markdown.contains("title=main.rs"));
    }

    #[tokio::test]
    async fn test_plain_fences_untouched() {
        let mut post = post();
        post.markdown = "```rust\nfn main() {}\n```\n".to_string();
        let article = platform(None).prepare_article(&post, true).await.unwrap();
        assert_eq!(article.body_markdown, post.markdown);
    }

    #[tokio::test]
    async fn test_gif_rehosted_in_dry_run_with_key() {
        let mut post = post();
        post.markdown = "![demo](https://site.com/demo.GIF)\n".to_string();
        let article = platform(Some("giphy-key"))
            .prepare_article(&post, true)
            .await
            .unwrap();
        assert!(article.body_markdown.contains(GIPHY_DRY_RUN_URL));
        assert!(!article.body_markdown.contains("demo.GIF"));
    }

    #[tokio::test]
    async fn test_gif_kept_without_giphy_key() {
        let mut post = post();
        post.markdown = "![demo](https://site.com/demo.gif)\n".to_string();
        let article = platform(None).prepare_article(&post, true).await.unwrap();
        assert!(article.body_markdown.contains("demo.gif"));
    }

    #[tokio::test]
    async fn test_non_gif_images_untouched() {
        let mut post = post();
        post.markdown = "![img](https://site.com/a.png)\n".to_string();
        let article = platform(Some("giphy-key"))
            .prepare_article(&post, true)
            .await
            .unwrap();
        assert!(article.body_markdown.contains("a.png"));
    }

    #[tokio::test]
    async fn test_dry_run_publish_issues_no_call() {
        let result = platform(None).publish(&post(), true).await.unwrap();
        assert!(result.dry_run);
        assert_eq!(result.platform, "devto");
        assert!(result.reference.is_none());
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let article = ArticlePayload {
            body_markdown: "b".to_string(),
            organization_id: None,
            published: true,
            title: "t".to_string(),
            description: None,
            canonical_url: None,
            main_image: None,
            tags: vec![],
        };
        let value = serde_json::to_value(&article).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("organization_id"));
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("main_image"));
        assert!(object.contains_key("tags"));
    }
}
