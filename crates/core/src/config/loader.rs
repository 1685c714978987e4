use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Unprefixed variables honoured for compatibility with older deployments.
const LEGACY_ENV_KEYS: [&str; 3] = ["RESPECT_PLEX_PASS_TRAILERS", "PLEX_URL", "PLEX_TOKEN"];

/// Load configuration from file with environment variable overrides.
///
/// Precedence, lowest first: the TOML file, the legacy `PLEX_*` variables,
/// then `TRAILARR_` variables using `__` between nested keys
/// (`TRAILARR_MONITOR__INTERVAL_SECS=60`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(legacy_env())
        .merge(Env::prefixed("TRAILARR_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn legacy_env() -> Env {
    Env::raw()
        .only(&LEGACY_ENV_KEYS)
        .map(|key| match key.as_str().to_ascii_uppercase().as_str() {
            "RESPECT_PLEX_PASS_TRAILERS" => "plex.respect_trailers".into(),
            "PLEX_URL" => "plex.url".into(),
            "PLEX_TOKEN" => "plex.token".into(),
            _ => key.as_str().to_string().into(),
        })
}
