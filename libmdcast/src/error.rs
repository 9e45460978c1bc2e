//! Error types for mdcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MdcastError>;

#[derive(Error, Debug)]
pub enum MdcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MdcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MdcastError::InvalidInput(_) => 3,
            MdcastError::Platform(PlatformError::MissingCredential(_)) => 2,
            MdcastError::Platform(_) => 1,
            MdcastError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to parse config: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("No mdcast configuration found in {0}. Run `mdcast init` to create one.")]
    NotFound(String),

    #[error("Option `markdown.{option}` is required to rewrite the relative reference `{path}` but is not set")]
    MissingBaseUrl { option: String, path: String },
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Tag not found in dictionary: {0}")]
    TagNotFound(String),

    #[error("Publishing failed: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(error: reqwest::Error) -> Self {
        PlatformError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = MdcastError::InvalidInput("bad extension".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_missing_credential() {
        let error = MdcastError::Platform(PlatformError::MissingCredential(
            "DEVTO_API_KEY".to_string(),
        ));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_other_platform_errors() {
        let api = MdcastError::Platform(PlatformError::Api("500 from dev.to".to_string()));
        assert_eq!(api.exit_code(), 1);

        let network = MdcastError::Platform(PlatformError::Network("timeout".to_string()));
        assert_eq!(network.exit_code(), 1);

        let tag = MdcastError::Platform(PlatformError::TagNotFound("shadcn-ui".to_string()));
        assert_eq!(tag.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = MdcastError::Config(ConfigError::NotFound("/tmp/project".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_config_not_found_mentions_init() {
        let error = ConfigError::NotFound("/tmp/project".to_string());
        let message = format!("{}", error);
        assert!(message.contains("mdcast init"));
        assert!(message.contains("/tmp/project"));
    }

    #[test]
    fn test_missing_base_url_names_offending_path() {
        let error = ConfigError::MissingBaseUrl {
            option: "image_url_base".to_string(),
            path: "/img/x.png".to_string(),
        };
        let message = format!("{}", error);
        assert!(message.contains("markdown.image_url_base"));
        assert!(message.contains("/img/x.png"));
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let error = PlatformError::MissingCredential("HASHNODE_TOKEN".to_string());
        assert_eq!(
            format!("{}", error),
            "Missing credential: environment variable HASHNODE_TOKEN is not set"
        );
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::NotFound("/tmp".to_string());
        let error: MdcastError = config_error.into();
        assert!(matches!(error, MdcastError::Config(_)));
    }

    #[test]
    fn test_error_conversion_from_platform_error() {
        let platform_error = PlatformError::Api("rejected".to_string());
        let error: MdcastError = platform_error.into();
        assert!(matches!(error, MdcastError::Platform(_)));
    }

    #[test]
    fn test_platform_error_clone() {
        let original = PlatformError::Network("connection refused".to_string());
        let cloned = original.clone();
        assert_eq!(format!("{}", original), format!("{}", cloned));
    }
}
