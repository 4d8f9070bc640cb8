//! Trait definitions for the external tools.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::ToolError;
use super::types::{CompositeImages, DecodeOutcome};
use crate::satellite::SatelliteProfile;

/// Turns a raw IQ recording into a symbol file.
#[async_trait]
pub trait Demodulator: Send + Sync {
    /// Returns the name of this demodulator implementation.
    fn name(&self) -> &str;

    /// Demodulates `raw` with the profile's extra arguments.
    ///
    /// Returns the symbol file only if it exists after the run; the exit
    /// code is not trusted.
    async fn demodulate(
        &self,
        raw: &Path,
        profile: &SatelliteProfile,
    ) -> Result<Option<PathBuf>, ToolError>;

    /// Validates that the demodulator is properly configured and ready.
    async fn validate(&self) -> Result<(), ToolError>;
}

/// Extracts per-channel bitmaps from a symbol file.
#[async_trait]
pub trait Decoder: Send + Sync {
    /// Returns the name of this decoder implementation.
    fn name(&self) -> &str;

    /// Decodes `symbols`, writing `<stem>_<n>.bmp` per channel.
    async fn decode(
        &self,
        symbols: &Path,
        stem: &Path,
        profile: &SatelliteProfile,
    ) -> Result<DecodeOutcome, ToolError>;

    /// Validates that the decoder is properly configured and ready.
    async fn validate(&self) -> Result<(), ToolError>;
}

/// Combines channel bitmaps into the final images.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Returns the name of this compositor implementation.
    fn name(&self) -> &str;

    /// Builds the false-color and infrared images from `<stem>_<n>.bmp`.
    ///
    /// Each image is reported only if it exists afterwards.
    async fn composite(&self, stem: &Path) -> Result<CompositeImages, ToolError>;

    /// Validates that the compositor is properly configured and ready.
    async fn validate(&self) -> Result<(), ToolError>;
}
