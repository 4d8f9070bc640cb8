//! Satellite identification and per-satellite processing parameters.
//!
//! An observation is tied to a satellite either through the TLE passed by
//! the scheduler or through an explicit id override. The resolved id is then
//! looked up in a [`ProfileRegistry`] to decide whether the observation gets
//! processed at all, with which tool arguments, and after how long a wait.
//!
//! # Example
//!
//! ```ignore
//! use meteor_core::satellite::{resolve, ProfileRegistry, Dispatch};
//!
//! let registry = ProfileRegistry::reference();
//! let resolution = resolve(Some(tle), None)?;
//! match registry.dispatch(&resolution, Duration::from_secs(120)) {
//!     Dispatch::Process { profile, wait } => { /* run the pipeline */ }
//!     Dispatch::Unsupported { .. } => { /* nothing to do */ }
//! }
//! ```

mod channels;
mod registry;
mod resolver;
mod types;

pub use channels::{ChannelAssignment, ColorChannel, CompositeMapping};
pub use registry::ProfileRegistry;
pub use resolver::{catalog_number_from_tle, resolve, ResolveError};
pub use types::{Dispatch, NoradId, Resolution, SatelliteProfile, WaitPolicy};
