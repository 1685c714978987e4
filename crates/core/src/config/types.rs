use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::fetcher::FetcherConfig;
use crate::library::PlexConfig;
use crate::profile::ProfileConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub plex: PlexConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    7889
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("trailarr.db")
}

/// Periodic trailer monitoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Master switch. When off, scheduled and manual runs exit immediately.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between scheduled runs.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Only download once the media folder contains a video file.
    #[serde(default)]
    pub wait_for_media: bool,
    /// Concurrent downloads within one profile group.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval(),
            wait_for_media: false,
            max_concurrent_downloads: default_max_concurrent(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    3600
}

fn default_max_concurrent() -> usize {
    2
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub monitor: MonitorConfig,
    pub plex: SanitizedPlexConfig,
    pub fetcher: FetcherConfig,
    pub profiles: Vec<ProfileConfig>,
}

/// Sanitized Plex config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPlexConfig {
    pub respect_trailers: bool,
    pub url: String,
    pub token_configured: bool,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
    pub movie_section: String,
    pub show_section: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            monitor: config.monitor.clone(),
            plex: SanitizedPlexConfig {
                respect_trailers: config.plex.respect_trailers,
                url: config.plex.url.clone(),
                token_configured: !config.plex.token.is_empty(),
                timeout_secs: config.plex.timeout_secs,
                cache_capacity: config.plex.cache_capacity,
                movie_section: config.plex.movie_section.clone(),
                show_section: config.plex.show_section.clone(),
            },
            fetcher: config.fetcher.clone(),
            profiles: config.profiles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7889);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("trailarr.db"));
        assert!(config.monitor.enabled);
        assert_eq!(config.monitor.interval_secs, 3600);
        assert!(!config.monitor.wait_for_media);
        assert_eq!(config.monitor.max_concurrent_downloads, 2);
        assert!(!config.plex.respect_trailers);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[monitor]
enabled = false
interval_secs = 600
wait_for_media = true
max_concurrent_downloads = 4

[plex]
respect_trailers = true
url = "http://192.168.1.10:32400"
token = "abc"

[[profiles]]
id = 1
name = "Movies"
priority = 10
file_format = "mp4"

[[profiles.filters]]
field = "is_movie"
condition = "equals"
value = "true"

[[profiles]]
id = 2
name = "Everything"
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(!config.monitor.enabled);
        assert_eq!(config.monitor.interval_secs, 600);
        assert!(config.monitor.wait_for_media);
        assert_eq!(config.monitor.max_concurrent_downloads, 4);
        assert!(config.plex.respect_trailers);
        assert_eq!(config.plex.token, "abc");

        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profiles[0].priority, 10);
        assert_eq!(config.profiles[0].options.file_format, "mp4");
        assert_eq!(config.profiles[0].filters.conditions().len(), 1);
        assert!(!config.profiles[1].enabled);
        assert_eq!(config.profiles[1].priority, 0);
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let mut config = Config::default();
        config.plex.token = "super-secret".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.plex.token_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_sanitized_config_without_token() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.plex.token_configured);
    }
}
