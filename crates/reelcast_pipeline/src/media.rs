//! Video and image production for drafts.

use crate::library::AssetLibrary;
use reelcast_config::{MediaConfig, MediaSource};
use reelcast_core::{AssetSpec, Draft, MediaFile, MediaKind};
use reelcast_error::{MediaError, MediaErrorKind, ReelcastResult};
use reelcast_interface::{
    EncodeJob, FrameSpec, ImageRequestBuilder, MediaEncoder, MediaGenerator, VideoRequestBuilder,
    VideoStatus,
};
use reelcast_storage::StagedDraft;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Scratch name of the downloaded clip before encoding.
const SOURCE_FILE: &str = "source.mp4";

pub(crate) fn frame_of(config: &MediaConfig) -> FrameSpec {
    FrameSpec {
        width: config.output_width,
        height: config.output_height,
    }
}

/// Stat a media file the encoder wrote.
pub(crate) async fn media_file(kind: MediaKind, path: &Path) -> ReelcastResult<MediaFile> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| {
        MediaError::new(MediaErrorKind::Io(format!("{}: {}", path.display(), e)))
    })?;
    if meta.len() == 0 {
        return Err(MediaError::new(MediaErrorKind::EmptyPayload(
            path.display().to_string(),
        ))
        .into());
    }
    Ok(MediaFile {
        kind,
        path: path.to_path_buf(),
        size_bytes: meta.len(),
    })
}

fn io_error(path: &Path, e: std::io::Error) -> MediaError {
    MediaError::new(MediaErrorKind::Io(format!("{}: {}", path.display(), e)))
}

/// Full prompt of a video job: scene, narration and music joined with `". "`.
///
/// # Examples
///
/// ```
/// use reelcast_core::AssetSpec;
/// use reelcast_pipeline::video_prompt;
///
/// let spec = AssetSpec::Video {
///     video_prompt: "Teen unboxing a flip phone".to_string(),
///     voiceover_text: "Remember T9?".to_string(),
///     music_style: "2000s pop".to_string(),
/// };
/// assert_eq!(
///     video_prompt(&spec),
///     "Teen unboxing a flip phone. Narrator voiceover saying: \"Remember T9?\". Background music: 2000s pop"
/// );
/// ```
pub fn video_prompt(spec: &AssetSpec) -> String {
    let mut parts = vec![spec.visual_prompt().trim().to_string()];
    if let Some(voiceover) = spec.voiceover_text().filter(|v| !v.trim().is_empty()) {
        parts.push(format!("Narrator voiceover saying: \"{}\"", voiceover.trim()));
    }
    if let Some(music) = spec.music_style().filter(|m| !m.trim().is_empty()) {
        parts.push(format!("Background music: {}", music.trim()));
    }
    parts.join(". ")
}

/// Produces the media file of a draft inside its staging directory.
pub struct MediaBuilder {
    generator: Arc<dyn MediaGenerator>,
    encoder: Arc<dyn MediaEncoder>,
    config: MediaConfig,
    library: Option<AssetLibrary>,
}

impl MediaBuilder {
    /// Create a builder that generates media through `generator`.
    pub fn new(
        generator: Arc<dyn MediaGenerator>,
        encoder: Arc<dyn MediaEncoder>,
        config: MediaConfig,
    ) -> Self {
        Self {
            generator,
            encoder,
            config,
            library: None,
        }
    }

    /// Attach the asset library used when `media.source = "library"`.
    pub fn with_library(mut self, library: AssetLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Media settings in use.
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Asset keys offered to the copy generator, if media comes from the library.
    pub fn asset_keys(&self) -> Vec<String> {
        match (&self.config.source, &self.library) {
            (MediaSource::Library, Some(library)) => library.keys(),
            _ => Vec::new(),
        }
    }

    /// Build the media of `draft` into `staged`.
    #[instrument(skip_all, fields(account = %draft.account(), asset_type = %draft.asset_type()))]
    pub async fn build(&self, draft: &Draft, staged: &StagedDraft) -> ReelcastResult<MediaFile> {
        match self.config.source {
            MediaSource::Library => {
                let library = self.library.as_ref().ok_or_else(|| {
                    MediaError::new(MediaErrorKind::Asset(
                        "library media source has no asset mapping".to_string(),
                    ))
                })?;
                library
                    .build(draft, staged, self.encoder.as_ref(), &self.config)
                    .await
            }
            MediaSource::Api => match draft.asset() {
                AssetSpec::Video { .. } => self.build_video(draft.asset(), staged).await,
                AssetSpec::Image { video_prompt } => self.build_image(video_prompt, staged).await,
            },
        }
    }

    async fn build_video(&self, spec: &AssetSpec, staged: &StagedDraft) -> ReelcastResult<MediaFile> {
        let request = VideoRequestBuilder::default()
            .prompt(video_prompt(spec))
            .duration(self.config.video_duration_secs)
            .aspect_ratio(self.config.aspect_ratio.clone())
            .resolution(self.config.resolution.clone())
            .build()
            .map_err(|e| MediaError::new(MediaErrorKind::Request(e.to_string())))?;

        let request_id = self.generator.submit_video(&request).await?;
        info!(request_id = %request_id, "Submitted video job");
        let url = self.wait_for_video(&request_id).await?;

        let data = self.generator.download(&url).await?;
        if MediaKind::sniff(&data) != Some(MediaKind::Mp4) {
            return Err(MediaError::new(MediaErrorKind::CorruptPayload(format!(
                "video {} is not an MP4 ({} bytes)",
                request_id,
                data.len()
            )))
            .into());
        }

        let source = staged.scratch_path(SOURCE_FILE);
        tokio::fs::write(&source, &data)
            .await
            .map_err(|e| io_error(&source, e))?;
        let result = self.finalize(spec, &source, staged).await;
        if tokio::fs::metadata(&source).await.is_ok() {
            let _ = tokio::fs::remove_file(&source).await;
        }
        result
    }

    async fn wait_for_video(&self, request_id: &str) -> ReelcastResult<String> {
        let started = Instant::now();
        let deadline = self.config.video_deadline();
        loop {
            match self.generator.poll_video(request_id).await? {
                VideoStatus::Done { url } => {
                    info!(elapsed_secs = started.elapsed().as_secs(), "Video ready");
                    return Ok(url);
                }
                VideoStatus::Expired => {
                    return Err(
                        MediaError::new(MediaErrorKind::Expired(request_id.to_string())).into(),
                    );
                }
                VideoStatus::Failed { reason } => {
                    return Err(MediaError::new(MediaErrorKind::JobFailed(format!(
                        "{}: {}",
                        request_id, reason
                    )))
                    .into());
                }
                VideoStatus::Pending => {}
            }
            if started.elapsed() >= deadline {
                return Err(MediaError::new(MediaErrorKind::Timeout(format!(
                    "video {} not ready after {}s",
                    request_id,
                    deadline.as_secs()
                )))
                .into());
            }
            debug!(request_id, "Video pending");
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    async fn finalize(
        &self,
        spec: &AssetSpec,
        source: &Path,
        staged: &StagedDraft,
    ) -> ReelcastResult<MediaFile> {
        let frame = frame_of(&self.config);
        let probe = self.encoder.probe(source).await?;
        let rescale = probe.width != frame.width || probe.height != frame.height;

        let music = match spec.music_style().and_then(|s| self.config.music_track_for(s)) {
            Some(track) => {
                if tokio::fs::metadata(track).await.is_err() {
                    return Err(MediaError::new(MediaErrorKind::Asset(format!(
                        "music track {} does not exist",
                        track.display()
                    )))
                    .into());
                }
                Some(track.to_path_buf())
            }
            None => None,
        };
        if !probe.has_audio {
            warn!("Generated video has no narration track");
        }

        let output = staged.media_path(MediaKind::Mp4);
        if rescale || music.is_some() {
            let job = EncodeJob::Finalize {
                input: source.to_path_buf(),
                output: output.clone(),
                frame,
                rescale,
                keep_audio: probe.has_audio,
                music,
            };
            debug!(?job, "Encoding video");
            self.encoder.encode(&job).await?;
        } else {
            tokio::fs::rename(source, &output)
                .await
                .map_err(|e| io_error(source, e))?;
        }
        media_file(MediaKind::Mp4, &output).await
    }

    async fn build_image(&self, prompt: &str, staged: &StagedDraft) -> ReelcastResult<MediaFile> {
        let request = ImageRequestBuilder::default()
            .prompt(prompt.trim())
            .aspect_ratio(self.config.aspect_ratio.clone())
            .build()
            .map_err(|e| MediaError::new(MediaErrorKind::Request(e.to_string())))?;
        let url = self.generator.generate_image(&request).await?;
        let data = self.generator.download(&url).await?;
        let kind = MediaKind::sniff(&data)
            .filter(|k| !k.is_video())
            .ok_or_else(|| {
                MediaError::new(MediaErrorKind::CorruptPayload(format!(
                    "image payload is not PNG, JPEG or WebP ({} bytes)",
                    data.len()
                )))
            })?;
        info!(kind = ?kind, size = data.len(), "Image ready");
        staged.write_media(kind, &data).await
    }
}
