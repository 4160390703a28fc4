use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Every upload is written with this extension, whatever its real format.
const PHOTO_EXTENSION: &str = "jpg";

/// Identifier of a stored ticket photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoId(Uuid);

impl PhotoId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Flat-file storage for uploaded ticket photos.
///
/// No database record accompanies a stored photo yet.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Path a photo with the given id is stored under.
    pub fn file_path(&self, id: PhotoId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, PHOTO_EXTENSION))
    }

    /// Write `bytes` under a freshly generated id, creating the directory if
    /// needed.
    pub async fn save(&self, bytes: &[u8]) -> Result<PhotoId, std::io::Error> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let id = PhotoId::generate();
        let path = self.file_path(id);
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Stored ticket photo");
        Ok(id)
    }
}
