//! In-flight drafts.

use crate::fs_util::write_atomic;
use reelcast_core::{MediaFile, MediaKind};
use reelcast_error::{ReelcastResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Prefix of staging directory names under the draft root.
pub(crate) const STAGING_PREFIX: &str = ".staging-";

/// A draft being built in a private directory.
///
/// Media is written here first; [`crate::DraftStore::commit`] renames the
/// directory into place once metadata and media are complete.
#[derive(Debug)]
pub struct StagedDraft {
    dir: PathBuf,
}

impl StagedDraft {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory of the staged draft.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Where media of `kind` belongs in this draft.
    pub fn media_path(&self, kind: MediaKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Scratch file path inside the staging directory.
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write a media payload under the file name of `kind`.
    #[tracing::instrument(skip(self, data), fields(dir = %self.dir.display(), size = data.len()))]
    pub async fn write_media(&self, kind: MediaKind, data: &[u8]) -> ReelcastResult<MediaFile> {
        let path = self.media_path(kind);
        write_atomic(&path, data).await?;
        Ok(MediaFile {
            kind,
            path,
            size_bytes: data.len() as u64,
        })
    }

    /// The media file present in the staging directory, if any.
    pub async fn find_media(&self) -> ReelcastResult<Option<MediaFile>> {
        crate::fs_util::find_media(&self.dir).await
    }

    /// Fail unless a media file is present.
    pub(crate) async fn require_media(&self) -> ReelcastResult<MediaFile> {
        self.find_media().await?.ok_or_else(|| {
            StorageError::new(StorageErrorKind::MediaMissing(self.dir.display().to_string()))
                .into()
        })
    }
}
