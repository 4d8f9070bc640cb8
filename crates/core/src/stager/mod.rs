//! Stager module for observation file lifecycle.
//!
//! Observation files live in three places over their lifetime: the
//! single-slot drop location written by the capture flowgraph, a working
//! directory where every file shares the observation's `data_<id>` base
//! name, and finally either the completion archive or nowhere at all.
//! Produced images are moved to the destination directory on their own.
//!
//! # Features
//!
//! - Atomic moves when source and destination are on the same filesystem
//! - Copy + SHA-256 verification + remove fallback across filesystems
//! - Automatic parent directory creation
//! - Prefix based cleanup of every file sharing an observation's base name
//!
//! # Example
//!
//! ```ignore
//! use meteor_core::stager::{DirectoryLayout, FsStager, Retention};
//!
//! let stager = FsStager::with_defaults(DirectoryLayout::under(Path::new("/datadrive/meteor")));
//! let obs = stager.observation(1234);
//! for raw in stager.discover().await {
//!     let staged = stager.stage(&raw, &obs).await?;
//!     // ... process ...
//!     stager.finalize(&obs, Retention::Archive).await?;
//! }
//! ```

mod config;
mod error;
mod fs_stager;
mod types;

pub use config::StagerConfig;
pub use error::StagerError;
pub use fs_stager::FsStager;
pub use types::{DirectoryLayout, FinalizeReport, Observation, Retention};
