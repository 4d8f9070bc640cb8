//! Types for the stager module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved locations the stager moves files between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryLayout {
    /// Single-slot location the capture flowgraph writes IQ data to.
    pub drop_file: PathBuf,
    /// Working directory for per-observation files.
    pub intermediate_dir: PathBuf,
    /// Archive for finished observation files.
    pub complete_dir: PathBuf,
    /// Where produced images are picked up for upload.
    pub destination_dir: PathBuf,
}

impl DirectoryLayout {
    /// Layout with every location inside one root, following the
    /// `new_iq/`, `intermediate/`, `complete/`, `images/` convention.
    pub fn under(root: &Path) -> Self {
        Self {
            drop_file: root.join("new_iq").join("last_obs.iq"),
            intermediate_dir: root.join("intermediate"),
            complete_dir: root.join("complete"),
            destination_dir: root.join("images"),
        }
    }
}

/// What happens to observation files once processing is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Remove every file of the observation.
    Delete,
    /// Move every file of the observation into the completion archive.
    Archive,
}

impl Retention {
    pub fn from_delete_flag(delete_complete_files: bool) -> Self {
        if delete_complete_files {
            Retention::Delete
        } else {
            Retention::Archive
        }
    }
}

/// A single observation's file-name base inside the working directory.
///
/// Every file belonging to the observation starts with `data_<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    id: u64,
    base: PathBuf,
}

impl Observation {
    pub fn new(id: u64, intermediate_dir: &Path) -> Self {
        Self {
            id,
            base: intermediate_dir.join(format!("data_{}", id)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Full path of the base, without extension.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File name prefix shared by all of the observation's files.
    pub fn base_name(&self) -> String {
        format!("data_{}", self.id)
    }

    /// Where the raw IQ recording is staged.
    pub fn raw_path(&self) -> PathBuf {
        self.base.with_extension("iq")
    }
}

/// Result of moving or deleting an observation's files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeReport {
    /// What was done with the files.
    pub retention: Retention,
    /// Archived locations, or the paths that were deleted.
    pub files: Vec<PathBuf>,
}
