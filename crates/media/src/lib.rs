//! Media pipeline: stage request payloads to disk, sniff MIME types, reclaim
//! orphaned artifacts on a timer.

pub mod janitor;
pub mod mime;
pub mod staging;

pub use staging::{StagedArtifact, StagingError, StagingStore};
