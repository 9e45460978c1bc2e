//! Medium platform adapter
//!
//! Medium's markdown importer is the most limited of the three
//! targets, so this adapter does the heaviest content adaptation:
//! - a preamble with the title, description and cover image is
//!   prepended, since Medium derives the story header from the content
//! - fenced code blocks become `<pre><code class="language-x">` HTML,
//!   the only form Medium keeps syntax metadata for
//! - tables are not supported at all; they are re-hosted as secret
//!   GitHub gists when a `GITHUB_TOKEN` is available, or wrapped in a
//!   plain code block otherwise

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::MediumOptions;
use crate::credentials::MediumCredentials;
use crate::error::{PlatformError, Result};
use crate::markdown::rewrite;
use crate::platforms::{Platform, PublishedRef};
use crate::post::Post;
use crate::tags::TagDictionary;

const MEDIUM_API_BASE: &str = "https://api.medium.com/v1";
const GITHUB_GISTS_URL: &str = "https://api.github.com/gists";
const GIST_DRY_RUN_URL: &str = "https://gist.github.com/example";

/// Body of Medium's create-post endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPayload {
    pub title: String,
    pub content_format: &'static str,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    pub publish_status: &'static str,
    pub notify_followers: bool,
}

pub struct MediumPlatform {
    options: MediumOptions,
    credentials: MediumCredentials,
    dictionary: TagDictionary<String>,
    client: reqwest::Client,
}

impl MediumPlatform {
    pub fn new(options: MediumOptions, credentials: MediumCredentials) -> Self {
        let dictionary = TagDictionary::from_slugs(&options.tags_dictionary);
        Self {
            options,
            credentials,
            dictionary,
            client: reqwest::Client::new(),
        }
    }

    /// Run all content adaptation and build the story payload
    pub async fn prepare_story(&self, post: &Post, dry_run: bool) -> Result<StoryPayload> {
        let tags = self
            .dictionary
            .resolve_all(post.tags.iter().map(String::as_str))?
            .into_iter()
            .cloned()
            .collect();

        let body = self.adapt_markdown(post, dry_run).await;
        let content = format!("{}{}", preamble(post), body);

        Ok(StoryPayload {
            title: post.title.clone(),
            content_format: "markdown",
            content,
            tags,
            canonical_url: post.canonical_url.clone(),
            publish_status: if self.options.should_publish {
                "public"
            } else {
                "draft"
            },
            notify_followers: self.options.should_notify_followers,
        })
    }

    /// Convert code fences to HTML and move tables out of the body
    async fn adapt_markdown(&self, post: &Post, dry_run: bool) -> String {
        let body = post.markdown.as_str();
        let mut edits = Vec::new();

        for block in rewrite::collect_fenced_blocks(body) {
            let text = &body[block.span.clone()];
            let language = block.info.split_whitespace().next().unwrap_or_default();
            edits.push(rewrite::Edit {
                range: block.span.clone(),
                text: code_block_html(text, language),
            });
        }

        for span in rewrite::collect_tables(body) {
            let table = body[span.clone()].trim_end();
            let replacement = match self.rehost_table(table, post, dry_run).await {
                Some(url) => format!("{url}\n"),
                None => format!("```\n{table}\n```\n"),
            };
            edits.push(rewrite::Edit {
                range: span,
                text: replacement,
            });
        }

        rewrite::apply_edits(body, edits)
    }

    /// Upload a table as a secret gist, returning its page URL
    ///
    /// Returns `None` when no GitHub token is configured or the upload
    /// fails; the caller falls back to a plain code block.
    async fn rehost_table(&self, table: &str, post: &Post, dry_run: bool) -> Option<String> {
        let token = self.credentials.github_token.as_deref()?;

        if dry_run {
            return Some(GIST_DRY_RUN_URL.to_string());
        }

        let payload = json!({
            "description": format!("Table from \"{}\"", post.title),
            "public": false,
            "files": {
                "table.md": { "content": table },
            },
        });

        let response = self
            .client
            .post(GITHUB_GISTS_URL)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "mdcast")
            .json(&payload)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to create gist for table: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Gist creation returned {}", response.status());
            return None;
        }

        let parsed: serde_json::Value = response.json().await.ok()?;
        parsed["html_url"].as_str().map(str::to_string)
    }

    /// Look up the author id, and the publication id when a
    /// publication name is configured
    async fn resolve_target(&self) -> Result<String> {
        let me: serde_json::Value = self
            .api_get(&format!("{MEDIUM_API_BASE}/me"))
            .await?;
        let user_id = me["data"]["id"]
            .as_str()
            .ok_or_else(|| PlatformError::Api("Medium /me returned no user id".to_string()))?
            .to_string();

        let Some(name) = self.credentials.publication_name.as_deref() else {
            return Ok(format!("{MEDIUM_API_BASE}/users/{user_id}/posts"));
        };

        let publications: serde_json::Value = self
            .api_get(&format!("{MEDIUM_API_BASE}/users/{user_id}/publications"))
            .await?;
        let publication_id = publications["data"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|p| p["name"].as_str().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .and_then(|p| p["id"].as_str())
            .ok_or_else(|| {
                PlatformError::Api(format!("No Medium publication named '{name}'"))
            })?;

        Ok(format!("{MEDIUM_API_BASE}/publications/{publication_id}/posts"))
    }

    async fn api_get(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.credentials.token))
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "Medium returned {status}: {body}"
            ))
            .into());
        }

        Ok(response
            .json()
            .await
            .map_err(|e| PlatformError::Api(format!("Invalid Medium response: {e}")))?)
    }
}

/// Story header Medium derives the title, subtitle and cover from
fn preamble(post: &Post) -> String {
    let mut parts = vec![format!("# {}", post.title)];
    if let Some(description) = post.description.as_deref() {
        parts.push(description.to_string());
    }
    if let Some(image) = post.image.as_deref() {
        parts.push(format!("![Post thumbnail]({image})"));
    }
    let mut out = parts.join("\r\n\r\n");
    out.push_str("\r\n\r\n");
    out
}

/// Render a fenced block as the HTML form Medium preserves
fn code_block_html(block_text: &str, language: &str) -> String {
    let content = fence_content(block_text);
    let escaped = html_escape::encode_text(content);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>\n")
    } else {
        format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>\n")
    }
}

/// The code between the opening and closing fence lines
fn fence_content(block_text: &str) -> &str {
    let Some(start) = block_text.find('\n') else {
        return "";
    };
    let inner = &block_text[start + 1..];
    let trimmed = inner.trim_end();
    match trimmed.rfind('\n') {
        Some(pos) if is_fence_line(&trimmed[pos + 1..]) => &inner[..pos + 1],
        None if is_fence_line(trimmed) => "",
        _ => inner,
    }
}

fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

#[async_trait]
impl Platform for MediumPlatform {
    fn name(&self) -> &str {
        "medium"
    }

    async fn publish(&self, post: &Post, dry_run: bool) -> Result<PublishedRef> {
        let story = self.prepare_story(post, dry_run).await?;

        if dry_run {
            debug!("Story prepared for Medium: {:?}", story);
            return Ok(PublishedRef {
                platform: self.name().to_string(),
                reference: None,
                dry_run: true,
            });
        }

        let target = self.resolve_target().await?;
        let response = self
            .client
            .post(&target)
            .header("Authorization", format!("Bearer {}", self.credentials.token))
            .json(&story)
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "Medium returned {status}: {body}"
            ))
            .into());
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlatformError::Api(format!("Invalid Medium response: {e}")))?;
        let reference = parsed["data"]["url"]
            .as_str()
            .or_else(|| parsed["data"]["id"].as_str())
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

    fn platform(github_token: Option<&str>) -> MediumPlatform {
        MediumPlatform::new(
            MediumOptions {
                should_publish: true,
                should_notify_followers: false,
                tags_dictionary: vec![
                    "javascript".to_string(),
                    "tailwind-css".to_string(),
                ],
            },
            MediumCredentials {
                token: "token".to_string(),
                publication_name: None,
                github_token: github_token.map(str::to_string),
            },
        )
    }

    fn post() -> Post {
        Post {
            title: "T".to_string(),
            markdown: "Body text.".to_string(),
            description: Some("D".to_string()),
            canonical_url: Some("https://site.com/blog/t".to_string()),
            tags: vec!["Tailwind CSS".to_string()],
            image: Some("https://x.com/a.png".to_string()),
            slug: "t".to_string(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_preamble_prepended() {
        let story = platform(None).prepare_story(&post(), true).await.unwrap();
        assert!(story.content.starts_with(
            "# T\r\n\r\nD\r\n\r\n![Post thumbnail](https://x.com/a.png)\r\n\r\nBody text."
        ));
    }

    #[tokio::test]
    async fn test_preamble_skips_absent_fields() {
        let mut post = post();
        post.description = None;
        post.image = None;
        let story = platform(None).prepare_story(&post, true).await.unwrap();
        assert!(story.content.starts_with("# T\r\n\r\nBody text."));
    }

    #[tokio::test]
    async fn test_tags_resolved_through_dictionary() {
        let story = platform(None).prepare_story(&post(), true).await.unwrap();
        assert_eq!(story.tags, vec!["tailwind-css"]);
    }

    #[tokio::test]
    async fn test_unknown_tag_fails() {
        let mut post = post();
        post.tags = vec!["cobol".to_string()];
        let err = platform(None).prepare_story(&post, true).await.unwrap_err();
        assert!(format!("{}", err).contains("cobol"));
    }

    #[tokio::test]
    async fn test_code_fence_becomes_html() {
        let mut post = post();
        post.markdown = "```rust\nlet x = 1 < 2;\n```\n".to_string();
        let story = platform(None).prepare_story(&post, true).await.unwrap();
        assert!(story
            .content
            .contains("<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>"));
        assert!(!story.content.contains("```"));
    }

    #[tokio::test]
    async fn test_bare_fence_becomes_plain_html() {
        let mut post = post();
        post.markdown = "```\nplain\n```\n".to_string();
        let story = platform(None).prepare_story(&post, true).await.unwrap();
        assert!(story.content.contains("<pre><code>plain\n</code></pre>"));
    }

    #[tokio::test]
    async fn test_table_wrapped_without_github_token() {
        let mut post = post();
        post.markdown = "| a | b |\n| - | - |\n| 1 | 2 |\n".to_string();
        let story = platform(None).prepare_story(&post, true).await.unwrap();
        assert!(story.content.contains("```\n| a | b |"));
        assert!(story.content.contains("| 1 | 2 |\n```"));
    }

    #[tokio::test]
    async fn test_table_rehosted_as_gist_in_dry_run() {
        let mut post = post();
        post.markdown = "Before\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\nAfter\n".to_string();
        let story = platform(Some("gh-token"))
            .prepare_story(&post, true)
            .await
            .unwrap();
        assert!(story.content.contains(GIST_DRY_RUN_URL));
        assert!(!story.content.contains("| a | b |"));
        assert!(story.content.contains("Before"));
        assert!(story.content.contains("After"));
    }

    #[tokio::test]
    async fn test_payload_field_names_and_status() {
        let story = platform(None).prepare_story(&post(), true).await.unwrap();
        let value = serde_json::to_value(&story).unwrap();
        assert_eq!(value["contentFormat"], "markdown");
        assert_eq!(value["publishStatus"], "public");
        assert_eq!(value["notifyFollowers"], false);
        assert_eq!(value["canonicalUrl"], "https://site.com/blog/t");
    }

    #[tokio::test]
    async fn test_draft_status_when_publish_disabled() {
        let mut platform = platform(None);
        platform.options.should_publish = false;
        let story = platform.prepare_story(&post(), true).await.unwrap();
        assert_eq!(story.publish_status, "draft");
    }

    #[tokio::test]
    async fn test_dry_run_publish_issues_no_call() {
        let result = platform(Some("gh-token")).publish(&post(), true).await.unwrap();
        assert!(result.dry_run);
        assert_eq!(result.platform, "medium");
        assert!(result.reference.is_none());
    }

    #[test]
    fn test_fence_content_extraction() {
        assert_eq!(fence_content("```rust\nfn f() {}\n```"), "fn f() {}\n");
        assert_eq!(fence_content("```rust\nfn f() {}\n```\n"), "fn f() {}\n");
        assert_eq!(fence_content("```\n```"), "");
    }
}
