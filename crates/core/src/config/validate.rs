use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Cache TTL, when set, is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.cache.ttl_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs cannot be 0 (omit it to disable expiry)".to_string(),
        ));
    }

    Ok(())
}
