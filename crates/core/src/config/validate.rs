use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Monitor interval and download concurrency are at least 1
/// - Dedup cache capacity is at least 1
/// - Plex URL is set when Plex trailers are respected
/// - Profile ids are unique
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.monitor.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.interval_secs must be at least 1".to_string(),
        ));
    }

    if config.monitor.max_concurrent_downloads == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.max_concurrent_downloads must be at least 1".to_string(),
        ));
    }

    if config.plex.cache_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "plex.cache_capacity must be at least 1".to_string(),
        ));
    }

    if config.plex.respect_trailers && config.plex.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "plex.url is required when plex.respect_trailers is enabled".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for profile in &config.profiles {
        if !seen.insert(profile.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate profile id {}",
                profile.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_from_str, ServerConfig};

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = Config::default();
        config.monitor.max_concurrent_downloads = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_concurrent_downloads"));
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = Config::default();
        config.monitor.interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_cache_capacity_fails() {
        let mut config = Config::default();
        config.plex.cache_capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_respect_trailers_requires_url() {
        let mut config = Config::default();
        config.plex.respect_trailers = true;
        config.plex.url = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("plex.url"));

        // Without the flag an empty URL is fine.
        config.plex.respect_trailers = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_profile_ids() {
        let config = load_config_from_str(
            r#"
[[profiles]]
id = 1
name = "a"

[[profiles]]
id = 1
name = "b"
"#,
        )
        .unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate profile id 1"));
    }
}
