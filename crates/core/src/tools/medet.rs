//! medet based decoder.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

use super::config::DecoderConfig;
use super::error::ToolError;
use super::process;
use super::traits::Decoder;
use super::types::DecodeOutcome;
use crate::satellite::SatelliteProfile;

const TOOL: &str = "medet";

/// Runs medet over an s-file, writing one bitmap per color channel.
pub struct Medet {
    config: DecoderConfig,
}

impl Medet {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, symbols: &Path, stem: &Path, profile: &SatelliteProfile) -> Vec<String> {
        let channels = &self.config.channels;
        let mut args = vec![
            symbols.to_string_lossy().to_string(),
            stem.to_string_lossy().to_string(),
            // quiet, one file per channel
            "-q".to_string(),
            "-s".to_string(),
            "-r".to_string(),
            channels.red_apid.to_string(),
            "-g".to_string(),
            channels.green_apid.to_string(),
            "-b".to_string(),
            channels.blue_apid.to_string(),
        ];
        args.extend(profile.decoder_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Decoder for Medet {
    fn name(&self) -> &str {
        TOOL
    }

    async fn decode(
        &self,
        symbols: &Path,
        stem: &Path,
        profile: &SatelliteProfile,
    ) -> Result<DecodeOutcome, ToolError> {
        let args = self.build_args(symbols, stem, profile);
        let exit_code = process::run(TOOL, &self.config.binary, &args, Stdio::inherit()).await?;
        Ok(DecodeOutcome::new(exit_code))
    }

    async fn validate(&self) -> Result<(), ToolError> {
        process::check_binary(TOOL, &self.config.binary)
    }
}
