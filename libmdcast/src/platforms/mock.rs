//! Mock platform implementation for testing
//!
//! A configurable mock adapter that can simulate successes, failures,
//! and delays. It lets the fan-out logic be tested without platform
//! credentials or network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{PlatformError, Result};
use crate::platforms::{Platform, PublishedRef};
use crate::post::Post;

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform name (e.g., "mock-devto")
    pub name: String,

    /// Whether publishing should succeed
    pub publish_succeeds: bool,

    /// Error to return on publish failure
    pub publish_error: Option<String>,

    /// Delay before completing (simulates network latency)
    pub delay: Duration,

    /// Number of times publish has been called
    pub publish_call_count: Arc<Mutex<usize>>,

    /// Titles of posts that were published (for verification)
    pub published_titles: Arc<Mutex<Vec<String>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            publish_succeeds: true,
            publish_error: None,
            delay: Duration::from_millis(0),
            publish_call_count: Arc::new(Mutex::new(0)),
            published_titles: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock platform for testing
pub struct MockPlatform {
    config: MockConfig,
}

impl MockPlatform {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock platform that always succeeds
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Create a mock platform that fails publishing
    pub fn publish_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            publish_succeeds: false,
            publish_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock platform with a delay
    pub fn with_delay(name: &str, delay: Duration) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            delay,
            ..Default::default()
        })
    }

    /// Get the number of times publish was called
    pub fn publish_call_count(&self) -> usize {
        *self.config.publish_call_count.lock().unwrap()
    }

    /// Get the titles of every published post
    pub fn published_titles(&self) -> Vec<String> {
        self.config.published_titles.lock().unwrap().clone()
    }

    /// Handles that stay readable after the platform is boxed
    pub fn counters(&self) -> (Arc<Mutex<usize>>, Arc<Mutex<Vec<String>>>) {
        (
            Arc::clone(&self.config.publish_call_count),
            Arc::clone(&self.config.published_titles),
        )
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn publish(&self, post: &Post, dry_run: bool) -> Result<PublishedRef> {
        *self.config.publish_call_count.lock().unwrap() += 1;

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        if !self.config.publish_succeeds {
            let message = self
                .config
                .publish_error
                .clone()
                .unwrap_or_else(|| "Mock publishing failed".to_string());
            return Err(PlatformError::Api(message).into());
        }

        if dry_run {
            return Ok(PublishedRef {
                platform: self.config.name.clone(),
                reference: None,
                dry_run: true,
            });
        }

        self.config
            .published_titles
            .lock()
            .unwrap()
            .push(post.title.clone());

        Ok(PublishedRef {
            platform: self.config.name.clone(),
            reference: Some(format!("https://example.com/{}/{}", self.config.name, post.slug)),
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            title: "Test".to_string(),
            markdown: "Body".to_string(),
            description: None,
            canonical_url: None,
            tags: vec![],
            image: None,
            slug: "test".to_string(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_mock_success() {
        let platform = MockPlatform::success("test");

        assert_eq!(platform.name(), "test");

        let published = platform.publish(&post(), false).await.unwrap();
        assert_eq!(published.platform, "test");
        assert_eq!(
            published.reference.as_deref(),
            Some("https://example.com/test/test")
        );
        assert_eq!(platform.publish_call_count(), 1);
        assert_eq!(platform.published_titles(), vec!["Test"]);
    }

    #[tokio::test]
    async fn test_mock_publish_failure() {
        let platform = MockPlatform::publish_failure("test", "Upstream rejected");

        let result = platform.publish(&post(), false).await;
        assert!(result.is_err());
        assert_eq!(platform.publish_call_count(), 1);
        assert!(result.unwrap_err().to_string().contains("Upstream rejected"));
    }

    #[tokio::test]
    async fn test_mock_dry_run_records_no_publish() {
        let platform = MockPlatform::success("test");

        let published = platform.publish(&post(), true).await.unwrap();
        assert!(published.dry_run);
        assert!(published.reference.is_none());
        assert!(platform.published_titles().is_empty());
    }

    #[tokio::test]
    async fn test_mock_with_delay() {
        let platform = MockPlatform::with_delay("test", Duration::from_millis(50));

        let start = std::time::Instant::now();
        platform.publish(&post(), false).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
