//! Media library model and storage.
//!
//! The media store is the library snapshot the pipeline reconciles against.
//! The pipeline only reads from it; the trailer fetcher flips the
//! `trailer_exists` flag after a successful download.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteMediaStore;
pub use store::{MediaStore, MediaStoreError};
pub use types::{MediaAsset, MediaId};
