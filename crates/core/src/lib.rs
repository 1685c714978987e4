pub mod config;
pub mod dedup;
pub mod fetcher;
pub mod filter;
pub mod gate;
pub mod library;
pub mod media;
pub mod metrics;
pub mod pipeline;
pub mod profile;
pub mod scheduler;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, MonitorConfig,
    SanitizedConfig,
};
pub use dedup::{CacheStats, TrailerDedupCache};
pub use fetcher::{CommandFetcher, FetchError, FetcherConfig, TrailerFetcher};
pub use filter::{FilterCondition, FilterField, FilterOp, FilterSet, MediaFilter};
pub use gate::{FilesystemProbe, LocalFilesystem, ValidityGate};
pub use library::{LibraryError, PlexClient, PlexConfig, RemoteLibrary};
pub use media::{MediaAsset, MediaId, MediaStore, MediaStoreError, SqliteMediaStore};
pub use pipeline::{
    PipelineError, RunOutcome, RunPermit, RunReport, SingleDownloadOutcome, SkipReason,
    TrailerPipeline,
};
pub use profile::{
    ConfigProfileStore, DownloadProfile, ProfileConfig, ProfileId, ProfileMatcher, ProfileStore,
};
pub use scheduler::MonitorScheduler;
