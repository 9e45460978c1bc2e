//! Multi-platform publishing orchestration
//!
//! One post fans out to every selected platform concurrently. Each
//! platform's outcome is collected independently, so a failure on one
//! never aborts or delays the others, and the caller gets the full
//! per-platform picture in one pass.

use futures::future::join_all;
use tracing::{info, warn};

use crate::platforms::Platform;
use crate::post::Post;

/// Result of publishing to a single platform
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Platform name (e.g., "devto", "hashnode", "medium")
    pub platform: String,
    /// Whether the publish succeeded
    pub success: bool,
    /// Platform-assigned URL or id (if successful and not a dry run)
    pub reference: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Fans one post out to a fixed set of platforms
pub struct Publisher {
    platforms: Vec<Box<dyn Platform>>,
}

impl Publisher {
    pub fn new(platforms: Vec<Box<dyn Platform>>) -> Self {
        Self { platforms }
    }

    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms.iter().map(|p| p.name()).collect()
    }

    /// Publish to all platforms concurrently
    ///
    /// Always returns one outcome per platform, in the order the
    /// platforms were supplied. Upstream rejections and transport
    /// failures are captured in the outcome rather than propagated, so
    /// the remaining platforms still complete.
    pub async fn publish_all(&self, post: &Post, dry_run: bool) -> Vec<PublishOutcome> {
        if dry_run {
            info!("Dry run: no network calls will be made to any platform");
        }

        let futures = self
            .platforms
            .iter()
            .map(|platform| async move {
                let name = platform.name().to_string();
                match platform.publish(post, dry_run).await {
                    Ok(published) => {
                        info!(
                            "Published to {}{}",
                            name,
                            published
                                .reference
                                .as_deref()
                                .map(|r| format!(": {r}"))
                                .unwrap_or_default()
                        );
                        PublishOutcome {
                            platform: name,
                            success: true,
                            reference: published.reference,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to publish to {}: {}", name, e);
                        PublishOutcome {
                            platform: name,
                            success: false,
                            reference: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect::<Vec<_>>();

        join_all(futures).await
    }
}
