use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::satellite::{ChannelAssignment, ProfileRegistry, SatelliteProfile};
use crate::stager::{DirectoryLayout, Retention, StagerConfig};
use crate::tools::{CompositorConfig, DecoderConfig, DemodulatorConfig, ToolsConfig};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub stager: StagerConfig,
    #[serde(default)]
    pub channels: ChannelAssignment,
    #[serde(default = "default_satellites")]
    pub satellites: Vec<SatelliteProfile>,
}

fn default_satellites() -> Vec<SatelliteProfile> {
    SatelliteProfile::reference_profiles()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            tools: ToolsConfig::default(),
            pipeline: PipelineConfig::default(),
            stager: StagerConfig::default(),
            channels: ChannelAssignment::default(),
            satellites: default_satellites(),
        }
    }
}

impl Config {
    pub fn layout(&self) -> DirectoryLayout {
        self.paths.layout()
    }

    pub fn registry(&self) -> ProfileRegistry {
        ProfileRegistry::new(self.satellites.iter().cloned())
    }

    pub fn demodulator_config(&self) -> DemodulatorConfig {
        self.tools.demodulator_config(&self.paths.data_root)
    }

    pub fn decoder_config(&self) -> DecoderConfig {
        self.tools.decoder_config(&self.paths.data_root, &self.channels)
    }

    pub fn compositor_config(&self) -> CompositorConfig {
        self.tools.compositor_config(&self.channels)
    }
}

/// Filesystem layout. Unset locations are derived from `data_root`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory holding `new_iq/`, `intermediate/`, `complete/` and `bin/`.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    /// Where satnogs-client picks up observation artifacts.
    #[serde(default = "default_destination_dir")]
    pub destination_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            destination_dir: default_destination_dir(),
            drop_file: None,
            intermediate_dir: None,
            complete_dir: None,
        }
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from("/datadrive/meteor")
}

fn default_destination_dir() -> PathBuf {
    PathBuf::from("/tmp/.satnogs/data")
}

impl PathsConfig {
    pub fn layout(&self) -> DirectoryLayout {
        let root = &self.data_root;
        DirectoryLayout {
            drop_file: self
                .drop_file
                .clone()
                .unwrap_or_else(|| root.join("new_iq").join("last_obs.iq")),
            intermediate_dir: self
                .intermediate_dir
                .clone()
                .unwrap_or_else(|| root.join("intermediate")),
            complete_dir: self
                .complete_dir
                .clone()
                .unwrap_or_else(|| root.join("complete")),
            destination_dir: self.destination_dir.clone(),
        }
    }
}

/// Pipeline behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Wait before processing when the satellite came from a TLE, so the
    /// waterfall processing of the same observation can finish first.
    #[serde(default = "default_deferred_wait")]
    pub deferred_wait_secs: u64,
    /// Delete observation files when done instead of archiving them.
    #[serde(default)]
    pub delete_complete_files: bool,
    /// Continue in a background process and return to the scheduler.
    #[serde(default = "default_detach")]
    pub detach: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deferred_wait_secs: default_deferred_wait(),
            delete_complete_files: false,
            detach: default_detach(),
        }
    }
}

fn default_deferred_wait() -> u64 {
    120
}

fn default_detach() -> bool {
    true
}

impl PipelineConfig {
    pub fn deferred_wait(&self) -> Duration {
        Duration::from_secs(self.deferred_wait_secs)
    }

    pub fn retention(&self) -> Retention {
        Retention::from_delete_flag(self.delete_complete_files)
    }
}
