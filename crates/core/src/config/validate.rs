use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Provider base URL is an http(s) URL
/// - Request timeout is not 0
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = Url::parse(&config.provider.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "provider.base_url '{}' is not a valid URL: {}",
            config.provider.base_url, e
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "provider.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
