//! Pipeline driver implementation.

use chrono::Utc;
use std::path::Path;
use tracing::{error, info, warn};

use crate::satellite::{Dispatch, SatelliteProfile};
use crate::stager::{FsStager, Observation, Retention};
use crate::tools::{CompositeImages, Compositor, Decoder, Demodulator};

use super::error::PipelineError;
use super::types::{ObservationReport, RunReport};

/// Runs one observation through stage → demodulate → decode → composite →
/// cleanup, strictly in sequence.
pub struct PipelineDriver<D: Demodulator, K: Decoder, C: Compositor> {
    stager: FsStager,
    demodulator: D,
    decoder: K,
    compositor: C,
    retention: Retention,
}

impl<D: Demodulator, K: Decoder, C: Compositor> PipelineDriver<D, K, C> {
    /// Creates a driver that archives finished observations.
    pub fn new(stager: FsStager, demodulator: D, decoder: K, compositor: C) -> Self {
        Self {
            stager,
            demodulator,
            decoder,
            compositor,
            retention: Retention::Archive,
        }
    }

    /// Sets what happens to observation files once processing is over.
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn stager(&self) -> &FsStager {
        &self.stager
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Runs the pipeline for an observation.
    ///
    /// Unsupported satellites return immediately without touching the
    /// filesystem. Otherwise the driver waits, then processes whatever sits
    /// in the drop slot.
    pub async fn run(
        &self,
        observation_id: u64,
        dispatch: &Dispatch,
    ) -> Result<RunReport, PipelineError> {
        let (profile, wait) = match dispatch {
            Dispatch::Unsupported { norad_id } => {
                info!("No processing to be done for sat id {}", norad_id);
                return Ok(RunReport::Skipped {
                    norad_id: *norad_id,
                });
            }
            Dispatch::Process { profile, wait } => (profile, *wait),
        };

        if !wait.is_zero() {
            info!("Waiting for {} seconds before processing", wait.as_secs());
            tokio::time::sleep(wait).await;
        }

        let drop_file = &self.stager.layout().drop_file;
        info!("{}: looking for {}", profile.name, drop_file.display());

        let raw_files = self.stager.discover().await;
        if raw_files.is_empty() {
            info!("No IQ recording found at {}", drop_file.display());
        }

        let mut observations = Vec::with_capacity(raw_files.len());
        for raw in raw_files {
            observations.push(self.process(observation_id, &raw, profile).await?);
        }

        Ok(RunReport::Processed { observations })
    }

    /// Processes a single raw recording.
    pub async fn process(
        &self,
        observation_id: u64,
        raw: &Path,
        profile: &SatelliteProfile,
    ) -> Result<ObservationReport, PipelineError> {
        info!("Processing {}", raw.display());
        let started_at = Utc::now();
        let observation = self.stager.observation(observation_id);

        let staged = self
            .stager
            .stage(raw, &observation)
            .await
            .map_err(PipelineError::Staging)?;

        let mut report = ObservationReport::new(
            observation_id,
            profile.norad_id,
            staged.clone(),
            self.retention,
            started_at,
        );

        match self.demodulator.demodulate(&staged, profile).await {
            Ok(Some(symbols)) => {
                report.symbol_file = Some(symbols.clone());
                self.decode_and_composite(&observation, &symbols, profile, &mut report)
                    .await;
            }
            Ok(None) => {
                warn!(
                    "No symbol file for observation {}, skipping decode",
                    observation_id
                );
            }
            Err(e) => {
                warn!(
                    "{} failed for observation {}: {}",
                    self.demodulator.name(),
                    observation_id,
                    e
                );
            }
        }

        let finalized = self
            .stager
            .finalize(&observation, self.retention)
            .await
            .map_err(PipelineError::Cleanup)?;

        report.finalized = finalized.files;
        report.finished_at = Some(Utc::now());
        Ok(report)
    }

    async fn decode_and_composite(
        &self,
        observation: &Observation,
        symbols: &Path,
        profile: &SatelliteProfile,
        report: &mut ObservationReport,
    ) {
        let stem = symbols.with_extension("");

        let images = match self.decoder.decode(symbols, &stem, profile).await {
            Ok(outcome) => {
                report.decoder_exit_code = outcome.exit_code;
                if outcome.succeeded() {
                    self.composite(&stem).await
                } else {
                    warn!(
                        "{} exited with {:?} for observation {}",
                        self.decoder.name(),
                        outcome.exit_code,
                        observation.id()
                    );
                    CompositeImages::default()
                }
            }
            Err(e) => {
                warn!("{} failed: {}", self.decoder.name(), e);
                CompositeImages::default()
            }
        };

        if images.is_empty() {
            warn!("No images produced for observation {}", observation.id());
            return;
        }

        info!(
            "{} image(s) produced for observation {}",
            images.count(),
            observation.id()
        );

        let destination = &self.stager.layout().destination_dir;
        for image in images.produced() {
            match self.stager.relocate(&image, destination).await {
                Ok(placed) => {
                    info!("Placed {}", placed.display());
                    report.images.push(placed);
                }
                Err(e) => error!("Failed to place {}: {}", image.display(), e),
            }
        }
    }

    async fn composite(&self, stem: &Path) -> CompositeImages {
        match self.compositor.composite(stem).await {
            Ok(images) => images,
            Err(e) => {
                warn!("{} failed: {}", self.compositor.name(), e);
                CompositeImages::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satellite::ProfileRegistry;
    use crate::stager::DirectoryLayout;
    use crate::testing::fixtures::process_now;
    use crate::testing::{MockCompositor, MockDecoder, MockDemodulator};
    use crate::tools::ToolError;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    type MockDriver = PipelineDriver<MockDemodulator, MockDecoder, MockCompositor>;

    fn driver_in(root: &TempDir) -> (MockDriver, MockDemodulator, MockDecoder, MockCompositor) {
        let demod = MockDemodulator::new();
        let decoder = MockDecoder::new();
        let compositor = MockCompositor::new();
        let driver = PipelineDriver::new(
            FsStager::with_defaults(DirectoryLayout::under(root.path())),
            demod.clone(),
            decoder.clone(),
            compositor.clone(),
        );
        (driver, demod, decoder, compositor)
    }

    async fn drop_recording(driver: &MockDriver) {
        let drop_file = &driver.stager().layout().drop_file;
        tokio::fs::create_dir_all(drop_file.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(drop_file, b"iq").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_drop_slot() {
        let root = TempDir::new().unwrap();
        let (driver, demod, _, _) = driver_in(&root);
        let profile = ProfileRegistry::reference().get(40069).cloned().unwrap();

        let report = driver.run(1, &process_now(profile)).await.unwrap();

        assert!(report.observations().is_empty());
        assert_eq!(demod.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_full_run_places_both_images() {
        let root = TempDir::new().unwrap();
        let (driver, demod, decoder, compositor) = driver_in(&root);
        drop_recording(&driver).await;
        let profile = ProfileRegistry::reference().get(44387).cloned().unwrap();

        let report = driver.run(11, &process_now(profile)).await.unwrap();

        let obs = &report.observations()[0];
        assert_eq!(obs.norad_id, 44387);
        assert_eq!(obs.decoder_exit_code, Some(0));
        assert_eq!(obs.images.len(), 2);
        assert_eq!(demod.call_count().await, 1);
        assert_eq!(decoder.call_count().await, 1);
        assert_eq!(compositor.call_count().await, 1);

        let dest = &driver.stager().layout().destination_dir;
        assert!(dest.join("data_11_fc.png").exists());
        assert!(dest.join("data_11_ir.png").exists());
        assert!(obs.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_decoder_failure_skips_composite() {
        let root = TempDir::new().unwrap();
        let (driver, _, decoder, compositor) = driver_in(&root);
        decoder.set_exit_code(Some(2)).await;
        drop_recording(&driver).await;
        let profile = ProfileRegistry::reference().get(40069).cloned().unwrap();

        let report = driver.run(12, &process_now(profile)).await.unwrap();

        let obs = &report.observations()[0];
        assert_eq!(obs.decoder_exit_code, Some(2));
        assert!(!obs.produced_images());
        assert_eq!(compositor.call_count().await, 0);
        assert!(driver
            .stager()
            .layout()
            .complete_dir
            .join("data_12.s")
            .exists());
    }

    #[tokio::test]
    async fn test_demodulator_error_still_cleans_up() {
        let root = TempDir::new().unwrap();
        let (driver, demod, decoder, _) = driver_in(&root);
        demod
            .set_next_error(ToolError::NotFound {
                tool: "meteor_demod".to_string(),
                path: PathBuf::from("/nonexistent/meteor_demod"),
            })
            .await;
        drop_recording(&driver).await;
        let profile = ProfileRegistry::reference().get(40069).cloned().unwrap();

        let report = driver.run(13, &process_now(profile)).await.unwrap();

        let obs = &report.observations()[0];
        assert_eq!(obs.symbol_file, None);
        assert_eq!(decoder.call_count().await, 0);
        assert_eq!(
            obs.finalized,
            vec![driver.stager().layout().complete_dir.join("data_13.iq")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_wait_delays_processing() {
        let root = TempDir::new().unwrap();
        let (driver, demod, _, _) = driver_in(&root);
        drop_recording(&driver).await;
        let dispatch = Dispatch::Process {
            profile: ProfileRegistry::reference().get(44387).cloned().unwrap(),
            wait: Duration::from_secs(120),
        };

        let started = tokio::time::Instant::now();
        let calls_before_wait_ends = async {
            tokio::time::sleep(Duration::from_secs(119)).await;
            demod.call_count().await
        };
        let (report, early_calls) = tokio::join!(driver.run(14, &dispatch), calls_before_wait_ends);

        assert_eq!(early_calls, 0);
        assert!(started.elapsed() >= Duration::from_secs(120));
        assert_eq!(report.unwrap().observations().len(), 1);
        assert_eq!(demod.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_compositor_error_still_cleans_up() {
        let root = TempDir::new().unwrap();
        let (driver, _, _, compositor) = driver_in(&root);
        compositor
            .set_next_error(ToolError::NotFound {
                tool: "convert".to_string(),
                path: PathBuf::from("/nonexistent/convert"),
            })
            .await;
        drop_recording(&driver).await;
        let profile = ProfileRegistry::reference().get(40069).cloned().unwrap();

        let report = driver.run(15, &process_now(profile)).await.unwrap();

        let obs = &report.observations()[0];
        assert_eq!(obs.decoder_exit_code, Some(0));
        assert!(!obs.produced_images());
        assert_eq!(compositor.call_count().await, 1);

        let complete = &driver.stager().layout().complete_dir;
        assert!(complete.join("data_15.iq").exists());
        assert!(complete.join("data_15_0.bmp").exists());
        assert!(!driver.stager().layout().destination_dir.exists());
    }
}
