//! Hashnode platform adapter
//!
//! Hashnode's API is GraphQL; publishing is a single `publishPost`
//! mutation. Tags must be submitted as `{id, slug, name}` triples,
//! which cannot be derived from a tag string alone, so every input tag
//! is resolved against the statically configured dictionary. A tag
//! with no entry fails this adapter's publish outright.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::HashnodeOptions;
use crate::credentials::HashnodeCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::{Platform, PublishedRef};
use crate::post::Post;
use crate::tags::{HashnodeTag, TagDictionary};

const HASHNODE_API_URL: &str = "https://gql.hashnode.com";

const PUBLISH_POST_MUTATION: &str = "\
mutation PublishPost($input: PublishPostInput!) {
  publishPost(input: $input) {
    post {
      slug
      url
    }
  }
}";

/// Variables for the `publishPost` mutation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPostInput {
    pub title: String,
    pub content_markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "originalArticleURL", skip_serializing_if = "Option::is_none")]
    pub original_article_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_options: Option<CoverImageOptions>,
    pub tags: Vec<HashnodeTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImageOptions {
    #[serde(rename = "coverImageURL")]
    pub cover_image_url: String,
}

pub struct HashnodePlatform {
    credentials: HashnodeCredentials,
    dictionary: TagDictionary<HashnodeTag>,
    client: reqwest::Client,
}

impl HashnodePlatform {
    pub fn new(options: HashnodeOptions, credentials: HashnodeCredentials) -> Self {
        Self {
            credentials,
            dictionary: TagDictionary::from_hashnode(&options.tags_dictionary),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve tags and build the mutation input
    pub fn build_input(&self, post: &Post) -> Result<PublishPostInput> {
        let tags = self
            .dictionary
            .resolve_all(post.tags.iter().map(String::as_str))?
            .into_iter()
            .cloned()
            .collect();

        Ok(PublishPostInput {
            title: post.title.clone(),
            content_markdown: post.markdown.clone(),
            subtitle: post.description.clone(),
            original_article_url: post.canonical_url.clone(),
            cover_image_options: post.image.clone().map(|url| CoverImageOptions {
                cover_image_url: url,
            }),
            tags,
            publication_id: self.credentials.publication_id.clone(),
        })
    }
}

#[async_trait]
impl Platform for HashnodePlatform {
    fn name(&self) -> &str {
        "hashnode"
    }

    async fn publish(&self, post: &Post, dry_run: bool) -> Result<PublishedRef> {
        let input = self.build_input(post)?;

        if dry_run {
            debug!("Mutation input prepared for Hashnode: {:?}", input);
            return Ok(PublishedRef {
                platform: self.name().to_string(),
                reference: None,
                dry_run: true,
            });
        }

        let request = json!({
            "query": PUBLISH_POST_MUTATION,
            "variables": { "input": input },
        });

        let response = self
            .client
            .post(HASHNODE_API_URL)
            .header("authorization", &self.credentials.token)
            .json(&request)
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "Hashnode returned {status}: {body}"
            ))
            .into());
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlatformError::Api(format!("Invalid Hashnode response: {e}")))?;

        // GraphQL transports errors in a 200 response
        if let Some(errors) = parsed.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e["message"].as_str())
                .collect();
            return Err(PlatformError::Api(format!(
                "Hashnode rejected the post: {}",
                messages.join("; ")
            ))
            .into());
        }

        let reference = parsed["data"]["publishPost"]["post"]["url"]
            .as_str()
            .or_else(|| parsed["data"]["publishPost"]["post"]["slug"].as_str())
            .map(str::to_string);

        Ok(PublishedRef {
            platform: self.name().to_string(),
            reference,
            dry_run: false,
        })
    }
}
