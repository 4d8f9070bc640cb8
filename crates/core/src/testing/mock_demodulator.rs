//! Mock demodulator for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::satellite::{NoradId, SatelliteProfile};
use crate::tools::{demod_log_path, symbol_path, Demodulator, ToolError};

/// A recorded demodulation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedDemodulation {
    /// Raw recording the demodulator was pointed at.
    pub raw: PathBuf,
    /// Satellite whose profile was used.
    pub norad_id: NoradId,
    /// Extra arguments taken from the profile.
    pub profile_args: Vec<String>,
}

/// Mock implementation of the Demodulator trait.
///
/// Writes the log file next to the recording like meteor_demod does, and
/// the symbol file only when configured to. Use
/// [`set_produce_symbols(false)`](Self::set_produce_symbols) to stand in for
/// a demodulator that exits without output.
#[derive(Debug, Clone)]
pub struct MockDemodulator {
    /// Recorded demodulations.
    calls: Arc<RwLock<Vec<RecordedDemodulation>>>,
    /// Whether a symbol file gets written.
    produce_symbols: Arc<RwLock<bool>>,
    /// If set, the next demodulation will fail with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
}

impl Default for MockDemodulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDemodulator {
    /// Create a new mock demodulator that produces symbol files.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            produce_symbols: Arc::new(RwLock::new(true)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded demodulations.
    pub async fn recorded_calls(&self) -> Vec<RecordedDemodulation> {
        self.calls.read().await.clone()
    }

    /// Get the number of demodulations performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Set whether a symbol file gets written.
    pub async fn set_produce_symbols(&self, produce: bool) {
        *self.produce_symbols.write().await = produce;
    }

    /// Configure the next demodulation to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<ToolError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Demodulator for MockDemodulator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn demodulate(
        &self,
        raw: &Path,
        profile: &SatelliteProfile,
    ) -> Result<Option<PathBuf>, ToolError> {
        self.calls.write().await.push(RecordedDemodulation {
            raw: raw.to_path_buf(),
            norad_id: profile.norad_id,
            profile_args: profile.demodulator_args.clone(),
        });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        tokio::fs::write(demod_log_path(raw), b"mock demodulator log\n").await?;

        if !*self.produce_symbols.read().await {
            return Ok(None);
        }

        let symbols = symbol_path(raw);
        tokio::fs::write(&symbols, b"mock symbols").await?;
        Ok(Some(symbols))
    }

    async fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }
}
