//! meteor_demod based demodulator.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{info, warn};

use super::config::DemodulatorConfig;
use super::error::ToolError;
use super::process;
use super::traits::Demodulator;
use super::types::{demod_log_path, symbol_path};
use crate::satellite::SatelliteProfile;

const TOOL: &str = "meteor_demod";

/// Runs meteor_demod over an IQ recording to obtain an s-file.
pub struct MeteorDemod {
    config: DemodulatorConfig,
}

impl MeteorDemod {
    pub fn new(config: DemodulatorConfig) -> Self {
        Self { config }
    }

    /// Baseline args, then the profile's, then output and input.
    fn build_args(&self, raw: &Path, symbols: &Path, profile: &SatelliteProfile) -> Vec<String> {
        let mut args = self.config.base_args.clone();
        args.extend(profile.demodulator_args.iter().cloned());
        args.extend([
            "-o".to_string(),
            symbols.to_string_lossy().to_string(),
            raw.to_string_lossy().to_string(),
        ]);
        args
    }
}

#[async_trait]
impl Demodulator for MeteorDemod {
    fn name(&self) -> &str {
        TOOL
    }

    async fn demodulate(
        &self,
        raw: &Path,
        profile: &SatelliteProfile,
    ) -> Result<Option<PathBuf>, ToolError> {
        let symbols = symbol_path(raw);
        let log_path = demod_log_path(raw);
        let args = self.build_args(raw, &symbols, profile);

        let log_file = tokio::fs::File::create(&log_path)
            .await
            .map_err(|e| ToolError::LogFileFailed {
                path: log_path.clone(),
                source: e,
            })?
            .into_std()
            .await;

        process::run(TOOL, &self.config.binary, &args, Stdio::from(log_file)).await?;

        if symbols.is_file() {
            info!("meteor_demod produced {}", symbols.display());
            Ok(Some(symbols))
        } else {
            warn!("meteor_demod did not produce {}", symbols.display());
            Ok(None)
        }
    }

    async fn validate(&self) -> Result<(), ToolError> {
        process::check_binary(TOOL, &self.config.binary)
    }
}
