//! ImageMagick based compositor.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tracing::warn;

use super::config::CompositorConfig;
use super::error::ToolError;
use super::process;
use super::traits::Compositor;
use super::types::{channel_bitmap, false_color_path, infrared_path, CompositeImages};

const TOOL: &str = "convert";

/// Uses ImageMagick's `convert` to combine medet's channel bitmaps.
pub struct ImageMagick {
    config: CompositorConfig,
}

impl ImageMagick {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    fn build_false_color_args(&self, stem: &Path) -> Vec<String> {
        let mut args: Vec<String> = self
            .config
            .channels
            .composite
            .sources()
            .iter()
            .map(|ch| channel_bitmap(stem, *ch).to_string_lossy().to_string())
            .collect();
        args.extend([
            "-channel".to_string(),
            "RGB".to_string(),
            "-combine".to_string(),
            false_color_path(stem).to_string_lossy().to_string(),
        ]);
        args
    }

    fn build_infrared_args(&self, stem: &Path) -> Vec<String> {
        vec![
            channel_bitmap(stem, self.config.channels.infrared)
                .to_string_lossy()
                .to_string(),
            infrared_path(stem).to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Compositor for ImageMagick {
    fn name(&self) -> &str {
        "imagemagick"
    }

    async fn composite(&self, stem: &Path) -> Result<CompositeImages, ToolError> {
        let invocations = [
            ("false color", self.build_false_color_args(stem)),
            ("infrared", self.build_infrared_args(stem)),
        ];

        // One failing invocation must not keep the other from running.
        for (label, args) in &invocations {
            if let Err(e) = process::run(TOOL, &self.config.binary, args, Stdio::inherit()).await {
                warn!("{} composite failed: {}", label, e);
            }
        }

        let false_color = false_color_path(stem);
        let infrared = infrared_path(stem);

        Ok(CompositeImages {
            false_color: false_color.is_file().then_some(false_color),
            infrared: infrared.is_file().then_some(infrared),
        })
    }

    async fn validate(&self) -> Result<(), ToolError> {
        process::check_binary(TOOL, &self.config.binary)
    }
}
