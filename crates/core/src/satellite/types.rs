//! Types for the satellite module.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// NORAD catalog number.
pub type NoradId = u32;

/// Per-satellite demodulation and decoding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteProfile {
    /// NORAD catalog number.
    pub norad_id: NoradId,

    /// Human readable name, used in logs only.
    #[serde(default)]
    pub name: String,

    /// Extra demodulator arguments appended after the baseline set.
    #[serde(default)]
    pub demodulator_args: Vec<String>,

    /// Extra decoder arguments appended after the baseline set.
    #[serde(default)]
    pub decoder_args: Vec<String>,

    /// Wait before processing when the id came from a TLE.
    /// Falls back to the pipeline default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_secs: Option<u64>,
}

impl SatelliteProfile {
    /// Creates a profile with no extra arguments.
    pub fn new(norad_id: NoradId, name: impl Into<String>) -> Self {
        Self {
            norad_id,
            name: name.into(),
            demodulator_args: Vec::new(),
            decoder_args: Vec::new(),
            wait_secs: None,
        }
    }

    /// Sets the extra demodulator arguments.
    pub fn with_demodulator_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.demodulator_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the extra decoder arguments.
    pub fn with_decoder_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decoder_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The reference profiles: Meteor-M 2 and Meteor-M2 2.
    pub fn reference_profiles() -> Vec<SatelliteProfile> {
        vec![
            SatelliteProfile::new(40069, "METEOR-M 2"),
            SatelliteProfile::new(44387, "METEOR-M2 2")
                .with_demodulator_args(["-m", "oqpsk"])
                .with_decoder_args(["-diff"]),
        ]
    }
}

/// How long to wait before touching the drop slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// The caller named the satellite explicitly; start right away.
    Immediate,
    /// The id came from a TLE; give concurrent post-processing time to finish.
    Deferred,
}

/// Outcome of identifier resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub norad_id: NoradId,
    pub wait: WaitPolicy,
}

/// What the driver should do for a resolved satellite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No profile exists; nothing to do.
    Unsupported { norad_id: NoradId },
    /// Process the drop slot with this profile after waiting.
    Process {
        profile: SatelliteProfile,
        wait: Duration,
    },
}

impl Dispatch {
    pub fn is_supported(&self) -> bool {
        matches!(self, Dispatch::Process { .. })
    }

    pub fn norad_id(&self) -> NoradId {
        match self {
            Dispatch::Unsupported { norad_id } => *norad_id,
            Dispatch::Process { profile, .. } => profile.norad_id,
        }
    }
}
