//! Types and file naming conventions shared by the tool invokers.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::satellite::ColorChannel;

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Symbol file written by the demodulator next to the raw recording.
pub fn symbol_path(raw: &Path) -> PathBuf {
    raw.with_extension("s")
}

/// Demodulator stdout log next to the raw recording.
pub fn demod_log_path(raw: &Path) -> PathBuf {
    raw.with_extension("log")
}

/// Per-channel bitmap written by the decoder: `<stem>_<index>.bmp`.
pub fn channel_bitmap(stem: &Path, channel: ColorChannel) -> PathBuf {
    with_suffix(stem, &format!("_{}.bmp", channel.decoder_index()))
}

/// False-color composite: `<stem>_fc.png`.
pub fn false_color_path(stem: &Path) -> PathBuf {
    with_suffix(stem, "_fc.png")
}

/// Infrared image: `<stem>_ir.png`.
pub fn infrared_path(stem: &Path) -> PathBuf {
    with_suffix(stem, "_ir.png")
}

/// Result of a decoder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    /// Raw exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl DecodeOutcome {
    pub fn new(exit_code: Option<i32>) -> Self {
        Self { exit_code }
    }

    /// Zero exit means per-channel bitmaps were written.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Images the compositor actually produced. Each is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeImages {
    pub false_color: Option<PathBuf>,
    pub infrared: Option<PathBuf>,
}

impl CompositeImages {
    /// Produced images, false color first.
    pub fn produced(&self) -> Vec<PathBuf> {
        self.false_color
            .iter()
            .chain(self.infrared.iter())
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.false_color.is_some() as usize + self.infrared.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_naming() {
        let raw = Path::new("/work/data_42.iq");
        assert_eq!(symbol_path(raw), PathBuf::from("/work/data_42.s"));
        assert_eq!(demod_log_path(raw), PathBuf::from("/work/data_42.log"));

        let stem = Path::new("/work/data_42");
        assert_eq!(
            channel_bitmap(stem, ColorChannel::Blue),
            PathBuf::from("/work/data_42_0.bmp")
        );
        assert_eq!(
            channel_bitmap(stem, ColorChannel::Red),
            PathBuf::from("/work/data_42_2.bmp")
        );
        assert_eq!(false_color_path(stem), PathBuf::from("/work/data_42_fc.png"));
        assert_eq!(infrared_path(stem), PathBuf::from("/work/data_42_ir.png"));
    }

    #[test]
    fn test_decode_outcome() {
        assert!(DecodeOutcome::new(Some(0)).succeeded());
        assert!(!DecodeOutcome::new(Some(1)).succeeded());
        assert!(!DecodeOutcome::new(None).succeeded());
    }

    #[test]
    fn test_composite_images() {
        let none = CompositeImages::default();
        assert!(none.is_empty());
        assert!(none.produced().is_empty());

        let only_ir = CompositeImages {
            false_color: None,
            infrared: Some(PathBuf::from("/work/data_1_ir.png")),
        };
        assert_eq!(only_ir.count(), 1);
        assert_eq!(only_ir.produced(), vec![PathBuf::from("/work/data_1_ir.png")]);

        let both = CompositeImages {
            false_color: Some(PathBuf::from("a_fc.png")),
            infrared: Some(PathBuf::from("a_ir.png")),
        };
        assert_eq!(
            both.produced(),
            vec![PathBuf::from("a_fc.png"), PathBuf::from("a_ir.png")]
        );
    }
}
