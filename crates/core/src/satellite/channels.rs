//! Color channel assignment for LRPT image products.

use serde::{Deserialize, Serialize};

/// A logical color channel of the decoder output.
///
/// The decoder writes one bitmap per channel, numbered in BGR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    /// All channels, in the order the decoder is told about them.
    pub const ALL: [ColorChannel; 3] = [ColorChannel::Red, ColorChannel::Green, ColorChannel::Blue];

    /// Index used as the bitmap file suffix by the decoder.
    pub fn decoder_index(self) -> u8 {
        match self {
            ColorChannel::Blue => 0,
            ColorChannel::Green => 1,
            ColorChannel::Red => 2,
        }
    }
}

/// Which decoder channel feeds each slot of the false-color composite.
///
/// Slots may alias the same decoder channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeMapping {
    pub red: ColorChannel,
    pub green: ColorChannel,
    pub blue: ColorChannel,
}

impl Default for CompositeMapping {
    fn default() -> Self {
        Self {
            red: ColorChannel::Green,
            green: ColorChannel::Green,
            blue: ColorChannel::Blue,
        }
    }
}

impl CompositeMapping {
    /// Source channels in red, green, blue slot order.
    pub fn sources(&self) -> [ColorChannel; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Static mapping from color channels to APIDs and composite slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    /// APID extracted into the red decoder channel.
    #[serde(default = "default_red_apid")]
    pub red_apid: u16,

    /// APID extracted into the green decoder channel.
    #[serde(default = "default_green_apid")]
    pub green_apid: u16,

    /// APID extracted into the blue decoder channel.
    #[serde(default = "default_blue_apid")]
    pub blue_apid: u16,

    /// False-color composite slot sources.
    #[serde(default)]
    pub composite: CompositeMapping,

    /// Decoder channel converted into the standalone infrared image.
    #[serde(default = "default_infrared")]
    pub infrared: ColorChannel,
}

fn default_red_apid() -> u16 {
    68
}

fn default_green_apid() -> u16 {
    65
}

fn default_blue_apid() -> u16 {
    64
}

fn default_infrared() -> ColorChannel {
    ColorChannel::Red
}

impl Default for ChannelAssignment {
    fn default() -> Self {
        Self {
            red_apid: default_red_apid(),
            green_apid: default_green_apid(),
            blue_apid: default_blue_apid(),
            composite: CompositeMapping::default(),
            infrared: default_infrared(),
        }
    }
}

impl ChannelAssignment {
    /// APID assigned to a channel.
    pub fn apid(&self, channel: ColorChannel) -> u16 {
        match channel {
            ColorChannel::Red => self.red_apid,
            ColorChannel::Green => self.green_apid,
            ColorChannel::Blue => self.blue_apid,
        }
    }

    /// Whether every channel extracts a different APID.
    pub fn has_distinct_apids(&self) -> bool {
        self.red_apid != self.green_apid
            && self.red_apid != self.blue_apid
            && self.green_apid != self.blue_apid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_index_is_bgr() {
        assert_eq!(ColorChannel::Blue.decoder_index(), 0);
        assert_eq!(ColorChannel::Green.decoder_index(), 1);
        assert_eq!(ColorChannel::Red.decoder_index(), 2);
    }

    #[test]
    fn test_default_assignment() {
        let channels = ChannelAssignment::default();
        assert_eq!(channels.apid(ColorChannel::Red), 68);
        assert_eq!(channels.apid(ColorChannel::Green), 65);
        assert_eq!(channels.apid(ColorChannel::Blue), 64);
        assert_eq!(
            channels.composite.sources(),
            [ColorChannel::Green, ColorChannel::Green, ColorChannel::Blue]
        );
        assert_eq!(channels.infrared, ColorChannel::Red);
        assert!(channels.has_distinct_apids());
    }

    #[test]
    fn test_duplicate_apids_detected() {
        let channels = ChannelAssignment {
            green_apid: 68,
            ..Default::default()
        };
        assert!(!channels.has_distinct_apids());
    }

    #[test]
    fn test_deserialize_partial_assignment() {
        let toml = r#"
red_apid = 66
infrared = "blue"

[composite]
red = "red"
green = "green"
blue = "blue"
"#;
        let channels: ChannelAssignment = toml::from_str(toml).unwrap();
        assert_eq!(channels.red_apid, 66);
        assert_eq!(channels.green_apid, 65);
        assert_eq!(channels.infrared, ColorChannel::Blue);
        assert_eq!(channels.composite.red, ColorChannel::Red);
    }
}
