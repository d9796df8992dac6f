use crate::application::ports::PhotoStager;
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Extensions the image pickers hand us. `locate` probes these in order to
/// re-derive a staged path from an entry id alone.
const KNOWN_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "heic", "webp"];

/// Stages captured photos under an app-private directory, named by entry id.
/// Staging runs at capture time, before any network decision, because the
/// picker cache file can be purged at any moment afterwards.
pub struct DiskStager {
    dir: PathBuf,
}

impl DiskStager {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, id: &EntryId, extension: &str) -> PathBuf {
        self.dir.join(format!("{id}.{extension}"))
    }

    fn extension_of(source: &Path) -> String {
        source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string())
    }
}

#[async_trait]
impl PhotoStager for DiskStager {
    async fn stage(&self, source: &Path, id: &EntryId) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).await?;
        let target = self.path_for(id, &Self::extension_of(source));
        fs::copy(source, &target).await.map_err(|err| {
            AppError::Staging(format!(
                "failed to copy {} into staging: {err}",
                source.display()
            ))
        })?;
        Ok(target)
    }

    async fn unstage(&self, id: &EntryId) -> Result<(), AppError> {
        for extension in KNOWN_EXTENSIONS {
            let path = self.path_for(id, extension);
            match fs::remove_file(&path).await {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(AppError::Staging(format!(
                        "failed to remove {}: {err}",
                        path.display()
                    )))
                }
            }
        }
        Ok(())
    }

    async fn locate(&self, id: &EntryId) -> Option<PathBuf> {
        for extension in KNOWN_EXTENSIONS {
            let path = self.path_for(id, extension);
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }
}
