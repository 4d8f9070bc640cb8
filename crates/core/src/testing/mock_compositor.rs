//! Mock compositor for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::satellite::ChannelAssignment;
use crate::tools::{
    channel_bitmap, false_color_path, infrared_path, CompositeImages, Compositor, ToolError,
};

/// Mock implementation of the Compositor trait.
///
/// Behaves like `convert` with respect to its inputs: the false-color image
/// is written only when all of its source bitmaps exist, the infrared image
/// only when its source bitmap exists.
#[derive(Debug, Clone)]
pub struct MockCompositor {
    /// Recorded stems.
    calls: Arc<RwLock<Vec<PathBuf>>>,
    /// Channel assignment deciding which bitmaps are read.
    channels: Arc<RwLock<ChannelAssignment>>,
    /// If set, the next composite will fail with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
}

impl Default for MockCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompositor {
    /// Create a new mock compositor with the default channel assignment.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            channels: Arc::new(RwLock::new(ChannelAssignment::default())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded stems.
    pub async fn recorded_calls(&self) -> Vec<PathBuf> {
        self.calls.read().await.clone()
    }

    /// Get the number of composites performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Set the channel assignment.
    pub async fn set_channels(&self, channels: ChannelAssignment) {
        *self.channels.write().await = channels;
    }

    /// Configure the next composite to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<ToolError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Compositor for MockCompositor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn composite(&self, stem: &Path) -> Result<CompositeImages, ToolError> {
        self.calls.write().await.push(stem.to_path_buf());

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let channels = self.channels.read().await.clone();
        let mut images = CompositeImages::default();

        let sources_present = channels
            .composite
            .sources()
            .iter()
            .all(|ch| channel_bitmap(stem, *ch).is_file());
        if sources_present {
            let fc = false_color_path(stem);
            tokio::fs::write(&fc, b"PNG").await?;
            images.false_color = Some(fc);
        }

        if channel_bitmap(stem, channels.infrared).is_file() {
            let ir = infrared_path(stem);
            tokio::fs::write(&ir, b"PNG").await?;
            images.infrared = Some(ir);
        }

        Ok(images)
    }

    async fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }
}
