//! Lookup table of supported satellites.

use std::collections::HashMap;
use std::time::Duration;

use super::types::{Dispatch, NoradId, Resolution, SatelliteProfile, WaitPolicy};

/// Immutable map of supported satellites keyed by NORAD id.
///
/// Built once at startup from configuration.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<NoradId, SatelliteProfile>,
}

impl ProfileRegistry {
    /// Builds a registry from a list of profiles. Later duplicates win;
    /// configuration validation rejects duplicates before this point.
    pub fn new(profiles: impl IntoIterator<Item = SatelliteProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.norad_id, p)).collect(),
        }
    }

    /// Registry with the two reference Meteor profiles.
    pub fn reference() -> Self {
        Self::new(SatelliteProfile::reference_profiles())
    }

    pub fn get(&self, norad_id: NoradId) -> Option<&SatelliteProfile> {
        self.profiles.get(&norad_id)
    }

    pub fn is_supported(&self, norad_id: NoradId) -> bool {
        self.profiles.contains_key(&norad_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Decides whether and when a resolved satellite gets processed.
    pub fn dispatch(&self, resolution: &Resolution, deferred_wait: Duration) -> Dispatch {
        let Some(profile) = self.get(resolution.norad_id) else {
            return Dispatch::Unsupported {
                norad_id: resolution.norad_id,
            };
        };

        let wait = match resolution.wait {
            WaitPolicy::Immediate => Duration::ZERO,
            WaitPolicy::Deferred => profile
                .wait_secs
                .map(Duration::from_secs)
                .unwrap_or(deferred_wait),
        };

        Dispatch::Process {
            profile: profile.clone(),
            wait,
        }
    }
}
