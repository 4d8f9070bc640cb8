//! Error types for the pipeline module.

use thiserror::Error;

use crate::stager::StagerError;

/// Failures that abort a pipeline run.
///
/// Tool failures are not among them: they are logged and the observation
/// still gets cleaned up.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The raw recording could not be moved into the working directory.
    #[error("Staging failed: {0}")]
    Staging(#[source] StagerError),

    /// Observation files could not be archived or deleted.
    #[error("Cleanup failed: {0}")]
    Cleanup(#[source] StagerError),
}
