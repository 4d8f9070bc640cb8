//! File system stager implementation.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

use super::config::StagerConfig;
use super::error::StagerError;
use super::types::{DirectoryLayout, FinalizeReport, Observation, Retention};

/// Moves observation files between the drop slot, the working directory,
/// the image destination and the completion archive.
pub struct FsStager {
    layout: DirectoryLayout,
    config: StagerConfig,
}

impl FsStager {
    /// Creates a new stager for the given layout.
    pub fn new(layout: DirectoryLayout, config: StagerConfig) -> Self {
        Self { layout, config }
    }

    /// Creates a stager with default configuration.
    pub fn with_defaults(layout: DirectoryLayout) -> Self {
        Self::new(layout, StagerConfig::default())
    }

    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }

    /// The observation base for an id inside the working directory.
    pub fn observation(&self, id: u64) -> Observation {
        Observation::new(id, &self.layout.intermediate_dir)
    }

    /// Looks at the drop slot. Yields at most one file.
    pub async fn discover(&self) -> Vec<PathBuf> {
        match fs::metadata(&self.layout.drop_file).await {
            Ok(meta) if meta.is_file() => vec![self.layout.drop_file.clone()],
            _ => Vec::new(),
        }
    }

    /// Moves a raw recording into the working directory under the
    /// observation's base name.
    pub async fn stage(&self, raw: &Path, observation: &Observation) -> Result<PathBuf, StagerError> {
        let destination = observation.raw_path();
        self.move_file(raw, &destination).await?;
        info!(
            "Staged {} as {}",
            raw.display(),
            destination.display()
        );
        Ok(destination)
    }

    /// Moves a file into `dir`, keeping its file name.
    pub async fn relocate(&self, file: &Path, dir: &Path) -> Result<PathBuf, StagerError> {
        let name = file.file_name().ok_or_else(|| StagerError::NoFileName {
            path: file.to_path_buf(),
        })?;
        let destination = dir.join(name);
        self.move_file(file, &destination).await?;
        Ok(destination)
    }

    /// Lists every regular file whose name starts with the observation's
    /// base name, sorted by path.
    pub async fn matching_files(&self, observation: &Observation) -> Result<Vec<PathBuf>, StagerError> {
        let dir = observation
            .base()
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let prefix = observation.base_name();

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StagerError::Io(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Deletes or archives every file of the observation.
    ///
    /// A file that cannot be handled does not stop the others; the first
    /// failure is returned once every file has been tried.
    pub async fn finalize(
        &self,
        observation: &Observation,
        retention: Retention,
    ) -> Result<FinalizeReport, StagerError> {
        let files = self.matching_files(observation).await?;
        let mut handled = Vec::with_capacity(files.len());
        let mut first_error = None;

        for file in files {
            let result = match retention {
                Retention::Delete => fs::remove_file(&file)
                    .await
                    .map(|()| file.clone())
                    .map_err(|e| StagerError::RemoveFailed {
                        path: file.clone(),
                        source: e,
                    }),
                Retention::Archive => self.relocate(&file, &self.layout.complete_dir).await,
            };

            match result {
                Ok(done) => {
                    debug!("Finalized {} ({:?})", done.display(), retention);
                    handled.push(done);
                }
                Err(e) => {
                    warn!("Could not finalize {}: {}", file.display(), e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            "Finalized {} file(s) of {} ({:?})",
            handled.len(),
            observation.base_name(),
            retention
        );

        Ok(FinalizeReport {
            retention,
            files: handled,
        })
    }

    /// Moves a file, falling back to copy + remove across filesystems.
    async fn move_file(&self, source: &Path, destination: &Path) -> Result<(), StagerError> {
        if !source.exists() {
            return Err(StagerError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        if destination.exists() && !self.config.overwrite {
            return Err(StagerError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }

        Self::ensure_parent_dir(destination).await?;

        if Self::try_atomic_move(source, destination)
            .await
            .map_err(|e| StagerError::move_failed(source.to_path_buf(), destination.to_path_buf(), e))?
        {
            return Ok(());
        }

        debug!(
            "{} and {} are on different filesystems, copying",
            source.display(),
            destination.display()
        );
        self.copy_then_remove(source, destination).await
    }

    /// Attempts to move a file atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // EXDEV is 18 on Linux
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn ensure_parent_dir(path: &Path) -> Result<(), StagerError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StagerError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }
        Ok(())
    }

    /// Copies `source` to `destination`, verifies it when configured, then
    /// removes the source.
    async fn copy_then_remove(&self, source: &Path, destination: &Path) -> Result<(), StagerError> {
        let source_hash = self.copy_file(source, destination).await?;

        if self.config.verify_copies {
            let copied_hash = self.sha256_file(destination).await?;
            if copied_hash != source_hash {
                let _ = fs::remove_file(destination).await;
                return Err(StagerError::ChecksumMismatch {
                    path: destination.to_path_buf(),
                    expected: source_hash,
                    actual: copied_hash,
                });
            }
        }

        fs::remove_file(source)
            .await
            .map_err(|e| StagerError::RemoveFailed {
                path: source.to_path_buf(),
                source: e,
            })
    }

    /// Copies a file and returns the SHA-256 of the bytes read.
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<String, StagerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StagerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                StagerError::Io(e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            StagerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                StagerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                StagerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;
        }

        writer.flush().await.map_err(|e| {
            StagerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        Ok(format!("{:x}", hasher.finalize()))
    }

    async fn sha256_file(&self, path: &Path) -> Result<String, StagerError> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stager_in(root: &TempDir) -> FsStager {
        FsStager::with_defaults(DirectoryLayout::under(root.path()))
    }

    async fn touch(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, contents).await.unwrap();
    }

    #[test]
    fn test_discover_empty_slot() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let found = tokio_test::block_on(stager.discover());
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_discover_ignores_directory_in_slot() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        fs::create_dir_all(&stager.layout().drop_file).await.unwrap();
        assert!(stager.discover().await.is_empty());
    }

    #[tokio::test]
    async fn test_stage_moves_raw_file() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        touch(&stager.layout().drop_file, "iq samples").await;

        let found = stager.discover().await;
        assert_eq!(found.len(), 1);

        let obs = stager.observation(7);
        let staged = stager.stage(&found[0], &obs).await.unwrap();

        assert_eq!(staged, root.path().join("intermediate").join("data_7.iq"));
        assert!(!stager.layout().drop_file.exists());
        assert_eq!(fs::read_to_string(&staged).await.unwrap(), "iq samples");
    }

    #[tokio::test]
    async fn test_stage_missing_source() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let obs = stager.observation(1);
        let result = stager.stage(&root.path().join("nope.iq"), &obs).await;
        assert!(matches!(result, Err(StagerError::SourceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_relocate_respects_overwrite_flag() {
        let root = TempDir::new().unwrap();
        let layout = DirectoryLayout::under(root.path());
        let stager = FsStager::new(layout.clone(), StagerConfig::default().with_overwrite(false));

        let image = layout.intermediate_dir.join("data_3_fc.png");
        touch(&image, "new").await;
        touch(&layout.destination_dir.join("data_3_fc.png"), "old").await;

        let result = stager.relocate(&image, &layout.destination_dir).await;
        assert!(matches!(result, Err(StagerError::DestinationExists { .. })));
        assert!(image.exists());
    }

    #[tokio::test]
    async fn test_relocate_overwrites_by_default() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let layout = stager.layout().clone();

        let image = layout.intermediate_dir.join("data_3_ir.png");
        touch(&image, "new").await;
        touch(&layout.destination_dir.join("data_3_ir.png"), "old").await;

        let placed = stager.relocate(&image, &layout.destination_dir).await.unwrap();
        assert_eq!(fs::read_to_string(&placed).await.unwrap(), "new");
        assert!(!image.exists());
    }

    #[tokio::test]
    async fn test_matching_files_uses_base_prefix() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let dir = stager.layout().intermediate_dir.clone();

        for name in ["data_42.iq", "data_42.s", "data_42_1.bmp", "data_4.iq", "notes.txt"] {
            touch(&dir.join(name), "x").await;
        }
        fs::create_dir_all(dir.join("data_42_dir")).await.unwrap();

        let files = stager.matching_files(&stager.observation(42)).await.unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["data_42.iq", "data_42.s", "data_42_1.bmp"]);
    }

    #[tokio::test]
    async fn test_matching_files_missing_dir() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let files = stager.matching_files(&stager.observation(1)).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_archive() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let layout = stager.layout().clone();
        touch(&layout.intermediate_dir.join("data_9.iq"), "iq").await;
        touch(&layout.intermediate_dir.join("data_9.log"), "log").await;
        touch(&layout.intermediate_dir.join("data_8.iq"), "other").await;

        let report = stager
            .finalize(&stager.observation(9), Retention::Archive)
            .await
            .unwrap();

        assert_eq!(report.retention, Retention::Archive);
        assert_eq!(report.files.len(), 2);
        assert!(layout.complete_dir.join("data_9.iq").exists());
        assert!(layout.complete_dir.join("data_9.log").exists());
        assert!(!layout.intermediate_dir.join("data_9.iq").exists());
        assert!(layout.intermediate_dir.join("data_8.iq").exists());
    }

    #[tokio::test]
    async fn test_finalize_delete() {
        let root = TempDir::new().unwrap();
        let stager = stager_in(&root);
        let layout = stager.layout().clone();
        touch(&layout.intermediate_dir.join("data_9.iq"), "iq").await;
        touch(&layout.intermediate_dir.join("data_8.iq"), "other").await;

        let report = stager
            .finalize(&stager.observation(9), Retention::Delete)
            .await
            .unwrap();

        assert_eq!(report.files, vec![layout.intermediate_dir.join("data_9.iq")]);
        assert!(!layout.intermediate_dir.join("data_9.iq").exists());
        assert!(!layout.complete_dir.exists());
        assert!(layout.intermediate_dir.join("data_8.iq").exists());
    }

    #[tokio::test]
    async fn test_finalize_continues_past_failed_file() {
        let root = TempDir::new().unwrap();
        let layout = DirectoryLayout::under(root.path());
        let stager = FsStager::new(layout.clone(), StagerConfig::default().with_overwrite(false));
        touch(&layout.intermediate_dir.join("data_5.iq"), "iq").await;
        touch(&layout.intermediate_dir.join("data_5.log"), "log").await;
        touch(&layout.intermediate_dir.join("data_5.s"), "sym").await;
        // data_5.iq sorts first and collides with an archived copy
        touch(&layout.complete_dir.join("data_5.iq"), "old").await;

        let result = stager
            .finalize(&stager.observation(5), Retention::Archive)
            .await;

        assert!(matches!(result, Err(StagerError::DestinationExists { .. })));
        assert!(layout.complete_dir.join("data_5.log").exists());
        assert!(layout.complete_dir.join("data_5.s").exists());
        assert!(!layout.intermediate_dir.join("data_5.log").exists());
        assert!(!layout.intermediate_dir.join("data_5.s").exists());
        assert!(layout.intermediate_dir.join("data_5.iq").exists());
    }

    #[tokio::test]
    async fn test_copy_then_remove_verifies() {
        let root = TempDir::new().unwrap();
        let stager = FsStager::new(
            DirectoryLayout::under(root.path()),
            StagerConfig::default().with_buffer_size(4),
        );
        let source = root.path().join("a.bin");
        let destination = root.path().join("b.bin");
        touch(&source, "more than four bytes").await;

        stager.copy_then_remove(&source, &destination).await.unwrap();

        assert!(!source.exists());
        assert_eq!(
            fs::read_to_string(&destination).await.unwrap(),
            "more than four bytes"
        );
    }
}
