//! Types for the pipeline module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::satellite::NoradId;
use crate::stager::Retention;

/// What happened to one observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationReport {
    /// Observation id from the scheduler.
    pub observation_id: u64,
    /// Satellite the observation belongs to.
    pub norad_id: NoradId,
    /// Raw recording after staging.
    pub staged: PathBuf,
    /// Symbol file, if the demodulator produced one.
    pub symbol_file: Option<PathBuf>,
    /// Decoder exit code, if the decoder ran to completion.
    pub decoder_exit_code: Option<i32>,
    /// Images placed in the destination directory.
    pub images: Vec<PathBuf>,
    /// What was done with the remaining observation files.
    pub retention: Retention,
    /// Archived or deleted observation files.
    pub finalized: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ObservationReport {
    pub(crate) fn new(
        observation_id: u64,
        norad_id: NoradId,
        staged: PathBuf,
        retention: Retention,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            observation_id,
            norad_id,
            staged,
            symbol_file: None,
            decoder_exit_code: None,
            images: Vec::new(),
            retention,
            finalized: Vec::new(),
            started_at,
            finished_at: None,
        }
    }

    /// Whether at least one image reached the destination directory.
    pub fn produced_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunReport {
    /// The satellite has no profile; nothing was touched.
    Skipped { norad_id: NoradId },
    /// The drop slot was checked; one report per recording found.
    Processed { observations: Vec<ObservationReport> },
}

impl RunReport {
    pub fn observations(&self) -> &[ObservationReport] {
        match self {
            RunReport::Skipped { .. } => &[],
            RunReport::Processed { observations } => observations,
        }
    }
}
