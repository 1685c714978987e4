//! Trailer acquisition pipeline.
//!
//! A run reads the media library and the download profiles, sorts monitored
//! media into per-profile groups (skipping items the remote library already
//! covers, items no profile matches, and items that are not ready on disk),
//! then downloads the groups in profile priority order.

mod batch;
mod driver;
mod grouping;
mod skip;
mod types;

pub use batch::{BatchOrchestrator, BatchReport, DownloadFailure};
pub use driver::{RunPermit, TrailerPipeline};
pub use grouping::{Grouping, GroupingCounts, GroupingPass, ProfileGroup, ProfileGroups};
pub use skip::{SkipLedger, SkipReason, SkipSummary};
pub use types::{PipelineError, RunOutcome, RunReport, SingleDownloadOutcome};
