//! Platform credentials, read from the environment
//!
//! Credentials are consumed at publish time and never written back.
//! Each platform has its own lookup so a missing variable is reported
//! before any network call, naming the exact variable to set.

use crate::error::{PlatformError, Result};

/// dev.to API credentials
#[derive(Debug, Clone)]
pub struct DevtoCredentials {
    pub api_key: String,
    pub organization_id: Option<String>,
    /// Enables GIF re-hosting through Giphy when set
    pub giphy_api_key: Option<String>,
}

impl DevtoCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require_env("DEVTO_API_KEY")?,
            organization_id: optional_env("DEVTO_ORG_ID"),
            giphy_api_key: optional_env("GIPHY_API_KEY"),
        })
    }
}

/// Hashnode API credentials
#[derive(Debug, Clone)]
pub struct HashnodeCredentials {
    pub token: String,
    pub publication_id: Option<String>,
}

impl HashnodeCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require_env("HASHNODE_TOKEN")?,
            publication_id: optional_env("HASHNODE_PUBLICATION_ID"),
        })
    }
}

/// Medium API credentials
#[derive(Debug, Clone)]
pub struct MediumCredentials {
    pub token: String,
    pub publication_name: Option<String>,
    /// Enables table-to-gist uploads when set
    pub github_token: Option<String>,
}

impl MediumCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require_env("MEDIUM_TOKEN")?,
            publication_name: optional_env("MEDIUM_PUBLICATION_NAME"),
            github_token: optional_env("GITHUB_TOKEN"),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match optional_env(name) {
        Some(value) => Ok(value),
        None => Err(PlatformError::MissingCredential(name.to_string()).into()),
    }
}

/// Returns `None` for unset or empty variables
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdcastError;
    use serial_test::serial;

    fn clear(names: &[&str]) {
        for name in names {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_devto_from_env() {
        clear(&["DEVTO_API_KEY", "DEVTO_ORG_ID", "GIPHY_API_KEY"]);
        std::env::set_var("DEVTO_API_KEY", "key123");
        std::env::set_var("DEVTO_ORG_ID", "org42");

        let creds = DevtoCredentials::from_env().unwrap();
        assert_eq!(creds.api_key, "key123");
        assert_eq!(creds.organization_id.as_deref(), Some("org42"));
        assert!(creds.giphy_api_key.is_none());

        clear(&["DEVTO_API_KEY", "DEVTO_ORG_ID"]);
    }

    #[test]
    #[serial]
    fn test_devto_missing_api_key() {
        clear(&["DEVTO_API_KEY"]);
        let err = DevtoCredentials::from_env().unwrap_err();
        assert!(matches!(
            err,
            MdcastError::Platform(PlatformError::MissingCredential(ref name))
                if name == "DEVTO_API_KEY"
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    #[serial]
    fn test_empty_variable_counts_as_missing() {
        std::env::set_var("HASHNODE_TOKEN", "  ");
        let err = HashnodeCredentials::from_env().unwrap_err();
        assert!(format!("{}", err).contains("HASHNODE_TOKEN"));
        clear(&["HASHNODE_TOKEN"]);
    }

    #[test]
    #[serial]
    fn test_medium_optional_fields() {
        clear(&["MEDIUM_PUBLICATION_NAME", "GITHUB_TOKEN"]);
        std::env::set_var("MEDIUM_TOKEN", "tok");

        let creds = MediumCredentials::from_env().unwrap();
        assert_eq!(creds.token, "tok");
        assert!(creds.publication_name.is_none());
        assert!(creds.github_token.is_none());

        clear(&["MEDIUM_TOKEN"]);
    }
}
