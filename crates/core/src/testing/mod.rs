//! Testing utilities and mock implementations of the external tools.
//!
//! The mocks write (or withhold) the same files the real tools would, so
//! the pipeline can be exercised against a temporary directory without
//! meteor_demod, medet or ImageMagick installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use meteor_core::testing::{MockCompositor, MockDecoder, MockDemodulator};
//!
//! let demod = MockDemodulator::new();
//! demod.set_produce_symbols(false).await;
//!
//! let driver = PipelineDriver::new(stager, demod.clone(), MockDecoder::new(), MockCompositor::new());
//! driver.run(42, &dispatch).await?;
//! assert_eq!(demod.call_count().await, 1);
//! ```

mod mock_compositor;
mod mock_decoder;
mod mock_demodulator;

pub use mock_compositor::MockCompositor;
pub use mock_decoder::{MockDecoder, RecordedDecode};
pub use mock_demodulator::{MockDemodulator, RecordedDemodulation};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::satellite::{Dispatch, SatelliteProfile};
    use std::time::Duration;

    /// Line one and two of a Meteor-M2 2 TLE, joined the way the scheduler
    /// passes them.
    pub const METEOR_M2_2_TLE: &str = "METEOR-M2 2 \
        1 44387U 19038A   19321.52896989  .00000016  00000-0  26307-4 0  9993 \
        2 44387  98.5695 358.4564 0002141 111.7917 248.3490 14.23327622 17546";

    /// Dispatch that processes right away with the given profile.
    pub fn process_now(profile: SatelliteProfile) -> Dispatch {
        Dispatch::Process {
            profile,
            wait: Duration::ZERO,
        }
    }
}
