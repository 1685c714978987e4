use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use crate::media::{MediaAsset, MediaStore};
use crate::profile::DownloadProfile;

use super::{FetchError, FetcherConfig, TrailerFetcher};

/// Longest stderr tail kept in a failure message.
const STDERR_TAIL: usize = 500;

/// Runs an external downloader program per trailer.
///
/// On success the item's `trailer_exists` flag is set in the media store.
pub struct CommandFetcher {
    config: FetcherConfig,
    media_store: Arc<dyn MediaStore>,
}

impl CommandFetcher {
    pub fn new(config: FetcherConfig, media_store: Arc<dyn MediaStore>) -> Self {
        Self {
            config,
            media_store,
        }
    }

    /// Expand the argument template for one download.
    pub fn build_args(&self, media: &MediaAsset, profile: &DownloadProfile) -> Vec<String> {
        let id = media.id.to_string();
        let year = media.year.map(|y| y.to_string()).unwrap_or_default();
        let folder = media
            .folder_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let remove_silence = profile.options.remove_silence.to_string();
        let always_search = profile.options.always_search.to_string();

        let values: [(&str, &str); 10] = [
            ("id", &id),
            ("title", &media.title),
            ("year", &year),
            ("txdb_id", &media.txdb_id),
            ("media_type", media.media_type()),
            ("folder", &folder),
            ("format", &profile.options.file_format),
            ("profile", &profile.name),
            ("remove_silence", &remove_silence),
            ("always_search", &always_search),
        ];

        self.config
            .args
            .iter()
            .map(|arg| expand_template(arg, &values))
            .collect()
    }
}

/// Substitute `{name}` placeholders in one left-to-right pass.
///
/// Substituted text is never rescanned, so a title containing `{folder}`
/// stays literal. Unknown or unterminated placeholders are kept as written.
fn expand_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// The last [`STDERR_TAIL`] characters of `stderr`.
fn stderr_tail(stderr: &str) -> &str {
    let start = stderr
        .char_indices()
        .rev()
        .nth(STDERR_TAIL - 1)
        .map_or(0, |(i, _)| i);
    &stderr[start..]
}

#[async_trait]
impl TrailerFetcher for CommandFetcher {
    async fn fetch(&self, media: &MediaAsset, profile: &DownloadProfile) -> Result<(), FetchError> {
        let args = self.build_args(media, profile);
        debug!("Running {} {:?}", self.config.program, args);

        let child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::ProgramNotFound {
                        program: self.config.program.clone(),
                    }
                } else {
                    FetchError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(output) => output?,
            // Dropping the child kills it.
            Err(_) => {
                return Err(FetchError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Failed(format!(
                "{} exited with code {:?}: {}",
                self.config.program,
                output.status.code(),
                stderr_tail(stderr.trim())
            )));
        }

        self.media_store.set_trailer_exists(media.id, true)?;
        info!(
            "Trailer downloaded for '{}' with profile '{}'",
            media.title, profile.name
        );
        Ok(())
    }
}
