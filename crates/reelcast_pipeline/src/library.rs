//! Media taken from a local asset library instead of a generation API.

use crate::media::{frame_of, media_file};
use reelcast_config::{AssetMapping, MediaConfig};
use reelcast_core::{AssetType, Draft, MediaFile, MediaKind};
use reelcast_error::{MediaError, MediaErrorKind, ReelcastResult};
use reelcast_interface::{EncodeJob, MediaEncoder};
use reelcast_storage::StagedDraft;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "m4v", "webm"];
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What an asset key resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryAsset {
    /// A ready-made video clip
    Video(PathBuf),
    /// A folder of stills, sorted by file name
    Images(Vec<PathBuf>),
    /// A single still
    Image(PathBuf),
}

/// Resolves asset keys against the library root.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
    mapping: AssetMapping,
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn images_in(dir: &Path) -> ReelcastResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| MediaError::new(MediaErrorKind::Io(format!("{}: {}", dir.display(), e))))?;
    let mut images = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| MediaError::new(MediaErrorKind::Io(format!("{}: {}", dir.display(), e))))?
    {
        let path = entry.path();
        if has_extension(&path, &IMAGE_EXTENSIONS) && is_file(&path).await {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

impl AssetLibrary {
    /// Create a library rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, mapping: AssetMapping) -> Self {
        Self {
            root: root.into(),
            mapping,
        }
    }

    /// Keys the copy generator may pick from.
    pub fn keys(&self) -> Vec<String> {
        self.mapping.keys().into_iter().map(str::to_string).collect()
    }

    /// Resolve an asset key to the media it names.
    ///
    /// Looked up in this order: `<dir>/video.mp4`, `<path>.mp4`, a video
    /// file, `<dir>/images/`, a single image.
    #[instrument(skip(self))]
    pub async fn resolve(&self, key: &str) -> ReelcastResult<LibraryAsset> {
        let relative = self.mapping.get(key).ok_or_else(|| {
            MediaError::new(MediaErrorKind::Asset(format!("unknown asset key '{}'", key)))
        })?;
        let full = self.root.join(relative);

        let candidate = full.join("video.mp4");
        if is_file(&candidate).await {
            return Ok(LibraryAsset::Video(candidate));
        }
        let candidate = full.with_extension("mp4");
        if is_file(&candidate).await {
            return Ok(LibraryAsset::Video(candidate));
        }
        if is_file(&full).await && has_extension(&full, &VIDEO_EXTENSIONS) {
            return Ok(LibraryAsset::Video(full));
        }
        let images_dir = full.join("images");
        if is_dir(&images_dir).await {
            let images = images_in(&images_dir).await?;
            if !images.is_empty() {
                return Ok(LibraryAsset::Images(images));
            }
        }
        if is_file(&full).await && has_extension(&full, &IMAGE_EXTENSIONS) {
            return Ok(LibraryAsset::Image(full));
        }

        Err(MediaError::new(MediaErrorKind::Asset(format!(
            "no video or images found for '{}' under {}",
            key,
            full.display()
        )))
        .into())
    }

    /// Produce the staged media of `draft` from its asset key.
    #[instrument(skip_all, fields(account = %draft.account()))]
    pub async fn build(
        &self,
        draft: &Draft,
        staged: &StagedDraft,
        encoder: &dyn MediaEncoder,
        config: &MediaConfig,
    ) -> ReelcastResult<MediaFile> {
        let key = draft.asset_key().as_deref().ok_or_else(|| {
            MediaError::new(MediaErrorKind::Asset(
                "draft has no asset_key for library media".to_string(),
            ))
        })?;
        let asset = self.resolve(key).await?;
        debug!(?asset, "Resolved library asset");

        match draft.asset_type() {
            AssetType::Video => {
                let output = staged.media_path(MediaKind::Mp4);
                let frame = frame_of(config);
                let job = match asset {
                    LibraryAsset::Video(input) => EncodeJob::Reencode {
                        input,
                        output,
                        frame,
                        max_secs: config.library_max_secs,
                    },
                    LibraryAsset::Images(images) => EncodeJob::Slideshow {
                        images,
                        output,
                        frame,
                        secs_per_image: config.slideshow_secs_per_image,
                    },
                    LibraryAsset::Image(image) => EncodeJob::LoopImage {
                        image,
                        output,
                        frame,
                        secs: config.still_clip_secs,
                    },
                };
                encoder.encode(&job).await?;
                info!(key, "Built video from library asset");
                media_file(MediaKind::Mp4, job.output()).await
            }
            AssetType::Image => {
                let image = match asset {
                    LibraryAsset::Image(image) => image,
                    LibraryAsset::Images(images) => images.into_iter().next().ok_or_else(|| {
                        MediaError::new(MediaErrorKind::Asset(format!("'{}' has no images", key)))
                    })?,
                    LibraryAsset::Video(path) => {
                        return Err(MediaError::new(MediaErrorKind::Asset(format!(
                            "image draft mapped to video asset {}",
                            path.display()
                        )))
                        .into());
                    }
                };
                let data = tokio::fs::read(&image).await.map_err(|e| {
                    MediaError::new(MediaErrorKind::Io(format!("{}: {}", image.display(), e)))
                })?;
                let kind = MediaKind::sniff(&data)
                    .filter(|k| !k.is_video())
                    .ok_or_else(|| {
                        MediaError::new(MediaErrorKind::CorruptPayload(format!(
                            "{} is not a PNG, JPEG or WebP image",
                            image.display()
                        )))
                    })?;
                info!(key, "Copied library image");
                staged.write_media(kind, &data).await
            }
        }
    }
}
