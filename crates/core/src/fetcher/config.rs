use serde::{Deserialize, Serialize};

/// External downloader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Program to run for each download.
    #[serde(default = "default_program")]
    pub program: String,

    /// Argument template. Placeholders: `{id}`, `{title}`, `{year}`,
    /// `{txdb_id}`, `{media_type}`, `{folder}`, `{format}`, `{profile}`,
    /// `{remove_silence}`, `{always_search}`.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Timeout for a single download in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_program() -> String {
    "trailer-dl".to_string()
}

fn default_args() -> Vec<String> {
    [
        "--title",
        "{title}",
        "--year",
        "{year}",
        "--{media_type}",
        "{txdb_id}",
        "--output-dir",
        "{folder}",
        "--format",
        "{format}",
        "--remove-silence={remove_silence}",
        "--always-search={always_search}",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_timeout() -> u64 {
    900
}
