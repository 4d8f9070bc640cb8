//! Configuration for the external tools.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::satellite::ChannelAssignment;

/// Tool locations and baseline arguments, as read from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to meteor_demod. Defaults to `<data_root>/bin/meteor_demod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demodulator: Option<PathBuf>,

    /// Path to medet. Defaults to `<data_root>/bin/medet_arm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<PathBuf>,

    /// Path to ImageMagick's convert.
    #[serde(default = "default_compositor")]
    pub compositor: PathBuf,

    /// Arguments passed to meteor_demod for every satellite.
    #[serde(default = "default_demodulator_args")]
    pub demodulator_args: Vec<String>,
}

fn default_compositor() -> PathBuf {
    PathBuf::from("convert")
}

/// Batch mode, symbol rate 72k, 288k sample rate, 300 kHz filter bandwidth.
fn default_demodulator_args() -> Vec<String> {
    [
        "-B", "-R", "1000", "-f", "24", "-b", "300", "-s", "288000", "-r", "72000", "-d", "1000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            demodulator: None,
            decoder: None,
            compositor: default_compositor(),
            demodulator_args: default_demodulator_args(),
        }
    }
}

impl ToolsConfig {
    /// Resolved demodulator settings.
    pub fn demodulator_config(&self, data_root: &Path) -> DemodulatorConfig {
        DemodulatorConfig {
            binary: self
                .demodulator
                .clone()
                .unwrap_or_else(|| data_root.join("bin").join("meteor_demod")),
            base_args: self.demodulator_args.clone(),
        }
    }

    /// Resolved decoder settings.
    pub fn decoder_config(&self, data_root: &Path, channels: &ChannelAssignment) -> DecoderConfig {
        DecoderConfig {
            binary: self
                .decoder
                .clone()
                .unwrap_or_else(|| data_root.join("bin").join("medet_arm")),
            channels: channels.clone(),
        }
    }

    /// Resolved compositor settings.
    pub fn compositor_config(&self, channels: &ChannelAssignment) -> CompositorConfig {
        CompositorConfig {
            binary: self.compositor.clone(),
            channels: channels.clone(),
        }
    }
}

/// Settings for the meteor_demod invoker.
#[derive(Debug, Clone)]
pub struct DemodulatorConfig {
    pub binary: PathBuf,
    pub base_args: Vec<String>,
}

impl DemodulatorConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            base_args: default_demodulator_args(),
        }
    }
}

/// Settings for the medet invoker.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub binary: PathBuf,
    pub channels: ChannelAssignment,
}

impl DecoderConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            channels: ChannelAssignment::default(),
        }
    }
}

/// Settings for the ImageMagick invoker.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    pub binary: PathBuf,
    pub channels: ChannelAssignment,
}

impl CompositorConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            channels: ChannelAssignment::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_paths_follow_data_root() {
        let tools = ToolsConfig::default();
        let root = Path::new("/datadrive/meteor");
        let channels = ChannelAssignment::default();

        assert_eq!(
            tools.demodulator_config(root).binary,
            PathBuf::from("/datadrive/meteor/bin/meteor_demod")
        );
        assert_eq!(
            tools.decoder_config(root, &channels).binary,
            PathBuf::from("/datadrive/meteor/bin/medet_arm")
        );
        assert_eq!(tools.compositor_config(&channels).binary, PathBuf::from("convert"));
    }

    #[test]
    fn test_explicit_tool_paths() {
        let tools = ToolsConfig {
            demodulator: Some(PathBuf::from("/usr/local/bin/meteor_demod")),
            decoder: Some(PathBuf::from("/usr/local/bin/medet")),
            ..Default::default()
        };
        let root = Path::new("/ignored");
        assert_eq!(
            tools.demodulator_config(root).binary,
            PathBuf::from("/usr/local/bin/meteor_demod")
        );
        assert_eq!(
            tools.decoder_config(root, &ChannelAssignment::default()).binary,
            PathBuf::from("/usr/local/bin/medet")
        );
    }

    #[test]
    fn test_default_demodulator_args() {
        let args = ToolsConfig::default().demodulator_args;
        assert_eq!(args.first().map(String::as_str), Some("-B"));
        assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "288000"));
        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "72000"));
    }
}
