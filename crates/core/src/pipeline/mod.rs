//! Pipeline driver for a single observation.
//!
//! The driver sequences the stager and the three tool invokers:
//!
//! 1. wait (0 s for explicit ids, the deferred wait for TLE ids)
//! 2. look in the drop slot
//! 3. stage the recording as `data_<id>.iq`
//! 4. demodulate; without a symbol file go straight to cleanup
//! 5. decode, composite, move produced images to the destination
//! 6. archive or delete every `data_<id>*` file
//!
//! Tool failures never abort a run. Only filesystem failures while staging
//! or cleaning up surface as [`PipelineError`].

mod driver;
mod error;
mod types;

pub use driver::PipelineDriver;
pub use error::PipelineError;
pub use types::{ObservationReport, RunReport};
