//! Video lifecycle orchestration.
//!
//! Coordinates artifact generation, persistence, artifact cleanup, and
//! federation notification for the create / mirror / update / destroy
//! paths. Creation is all-or-nothing; destruction is best-effort with a
//! per-artifact failure report.

pub mod artifacts;
pub mod error;
pub mod lifecycle;
pub mod represent;

pub use error::{CleanupFailure, CleanupReport, PipelineError};
pub use lifecycle::{NewOwnedVideo, VideoLifecycle};
pub use represent::PublicVideo;
