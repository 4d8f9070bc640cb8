//! Mock decoder for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::satellite::{ColorChannel, NoradId, SatelliteProfile};
use crate::tools::{channel_bitmap, DecodeOutcome, Decoder, ToolError};

/// A recorded decode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedDecode {
    pub symbols: PathBuf,
    pub stem: PathBuf,
    pub norad_id: NoradId,
    pub profile_args: Vec<String>,
}

/// Mock implementation of the Decoder trait.
///
/// On a zero exit code it writes `<stem>_<n>.bmp` for each configured
/// channel; on any other exit code it writes nothing.
#[derive(Debug, Clone)]
pub struct MockDecoder {
    /// Recorded decodes.
    calls: Arc<RwLock<Vec<RecordedDecode>>>,
    /// Exit code to report.
    exit_code: Arc<RwLock<Option<i32>>>,
    /// Channels that get a bitmap on success.
    channels: Arc<RwLock<Vec<ColorChannel>>>,
    /// If set, the next decode will fail with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDecoder {
    /// Create a new mock decoder that succeeds and writes all three channels.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            exit_code: Arc::new(RwLock::new(Some(0))),
            channels: Arc::new(RwLock::new(ColorChannel::ALL.to_vec())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded decodes.
    pub async fn recorded_calls(&self) -> Vec<RecordedDecode> {
        self.calls.read().await.clone()
    }

    /// Get the number of decodes performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Set the exit code to report.
    pub async fn set_exit_code(&self, code: Option<i32>) {
        *self.exit_code.write().await = code;
    }

    /// Set which channels get a bitmap on success.
    pub async fn set_channels(&self, channels: Vec<ColorChannel>) {
        *self.channels.write().await = channels;
    }

    /// Configure the next decode to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<ToolError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Decoder for MockDecoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn decode(
        &self,
        symbols: &Path,
        stem: &Path,
        profile: &SatelliteProfile,
    ) -> Result<DecodeOutcome, ToolError> {
        self.calls.write().await.push(RecordedDecode {
            symbols: symbols.to_path_buf(),
            stem: stem.to_path_buf(),
            norad_id: profile.norad_id,
            profile_args: profile.decoder_args.clone(),
        });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let outcome = DecodeOutcome::new(*self.exit_code.read().await);
        if outcome.succeeded() {
            for channel in self.channels.read().await.iter() {
                tokio::fs::write(channel_bitmap(stem, *channel), b"BM").await?;
            }
        }

        Ok(outcome)
    }

    async fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }
}
