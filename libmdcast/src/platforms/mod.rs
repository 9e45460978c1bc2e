//! Platform adapters
//!
//! One adapter per publishing target, all behind a single trait.
//! Every adapter maps the shared [`Post`] into its platform's payload,
//! performs its platform-specific content adaptation, and issues one
//! network call. With `dry_run` set, an adapter runs every
//! transformation step and skips only the final call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::Config;
use crate::credentials::{DevtoCredentials, HashnodeCredentials, MediumCredentials};
use crate::error::Result;
use crate::post::Post;

pub mod devto;
pub mod hashnode;
pub mod medium;

// Mock platform is available for all builds (not just tests) to
// support integration tests
pub mod mock;

/// Unified adapter interface: `publish(post, dry_run) -> PublishedRef`
///
/// Adapters own their HTTP clients and hold their connection settings
/// and options from construction; nothing is shared between them.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Lowercase platform identifier (e.g. "devto")
    fn name(&self) -> &str;

    /// Adapt the post and publish it
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::TagNotFound` when a tag has no
    /// dictionary entry, `PlatformError::Api` when the upstream API
    /// rejects the post, and `PlatformError::Network` on transport
    /// failures.
    async fn publish(&self, post: &Post, dry_run: bool) -> Result<PublishedRef>;
}

/// What a successful publish produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedRef {
    pub platform: String,
    /// Platform-assigned URL or id; `None` for dry runs
    pub reference: Option<String>,
    pub dry_run: bool,
}

/// The platforms this tool can publish to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Devto,
    Hashnode,
    Medium,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 3] =
        [PlatformKind::Devto, PlatformKind::Hashnode, PlatformKind::Medium];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Devto => "devto",
            PlatformKind::Hashnode => "hashnode",
            PlatformKind::Medium => "medium",
        }
    }
}

impl FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devto" | "dev.to" => Ok(PlatformKind::Devto),
            "hashnode" => Ok(PlatformKind::Hashnode),
            "medium" => Ok(PlatformKind::Medium),
            _ => Err(format!(
                "Unknown platform: '{}'. Valid options: devto, hashnode, medium",
                s
            )),
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create adapters for the requested platforms
///
/// Resolves each platform's environment credentials up front so a
/// missing variable fails the run before any network call.
pub fn create_platforms(
    config: &Config,
    requested: &[PlatformKind],
) -> Result<Vec<Box<dyn Platform>>> {
    let mut platforms: Vec<Box<dyn Platform>> = Vec::with_capacity(requested.len());

    for kind in requested {
        match kind {
            PlatformKind::Devto => {
                let credentials = DevtoCredentials::from_env()?;
                platforms.push(Box::new(devto::DevtoPlatform::new(
                    config.devto.clone(),
                    credentials,
                )));
            }
            PlatformKind::Hashnode => {
                let credentials = HashnodeCredentials::from_env()?;
                platforms.push(Box::new(hashnode::HashnodePlatform::new(
                    config.hashnode.clone(),
                    credentials,
                )));
            }
            PlatformKind::Medium => {
                let credentials = MediumCredentials::from_env()?;
                platforms.push(Box::new(medium::MediumPlatform::new(
                    config.medium.clone(),
                    credentials,
                )));
            }
        }
    }

    Ok(platforms)
}
