//! Filesystem helpers.

use reelcast_core::{MediaFile, MediaKind};
use reelcast_error::{ReelcastResult, StorageError, StorageErrorKind};
use std::path::Path;

/// Write to a temp file next to `path`, then rename into place.
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> ReelcastResult<()> {
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;
    Ok(())
}

/// First non-empty media file in `dir`, searched in [`MediaKind::ALL`] order.
pub(crate) async fn find_media(dir: &Path) -> ReelcastResult<Option<MediaFile>> {
    for kind in MediaKind::ALL {
        let path = dir.join(kind.file_name());
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                return Ok(Some(MediaFile {
                    kind,
                    path,
                    size_bytes: meta.len(),
                }));
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        }
    }
    Ok(None)
}

/// Whether anything exists at `path`.
pub(crate) async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(true)
}
