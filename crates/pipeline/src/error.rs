//! Pipeline error taxonomy.
//!
//! Creation-path errors abort and surface to the caller; destroy-path
//! cleanup failures are aggregated into a [`CleanupReport`] and never
//! block sibling cleanups or the row deletion.

use vidpod_core::error::CoreError;

/// Error type for lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A domain-level failure (validation, missing entity).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An I/O failure outside the generation tasks (e.g. persisting the
    /// uploaded raw file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the artifact generation tasks failed. Fatal to creation;
    /// no retry happens inside the pipeline.
    #[error("{artifact} generation failed: {source}")]
    ArtifactGeneration {
        artifact: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PipelineError {
    /// Wrap a task failure with the artifact it was producing.
    pub fn artifact(
        artifact: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ArtifactGeneration {
            artifact,
            source: Box::new(source),
        }
    }
}

/// A single failed destroy-time removal.
#[derive(Debug)]
pub struct CleanupFailure {
    pub artifact: &'static str,
    pub error: std::io::Error,
}

/// Aggregated, non-fatal outcome of the destroy-time cleanup tasks.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_error_names_the_artifact() {
        let err = PipelineError::artifact(
            "torrent",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert!(err.to_string().contains("torrent"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn empty_report_is_clean() {
        assert!(CleanupReport::default().is_clean());
        let report = CleanupReport {
            failures: vec![CleanupFailure {
                artifact: "thumbnail",
                error: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            }],
        };
        assert!(!report.is_clean());
    }
}
