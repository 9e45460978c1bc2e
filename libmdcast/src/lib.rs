//! mdcast - publish one markdown article everywhere
//!
//! This library provides the core functionality for adapting a local
//! markdown article to the conventions of several blogging platforms
//! and publishing it to all of them in one run.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod platforms;
pub mod post;
pub mod poster;
pub mod tags;

// Re-export commonly used types
pub use config::Config;
pub use error::{MdcastError, Result};
pub use markdown::MarkdownSource;
pub use platforms::{create_platforms, Platform, PlatformKind, PublishedRef};
pub use post::Post;
pub use poster::{PublishOutcome, Publisher};
