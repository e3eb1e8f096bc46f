//! Service mocks shared by the pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reelcast_config::{MediaConfig, PersonaStore, PipelineConfig};
use reelcast_core::{AssetType, Persona, PersonaBuilder, Platform};
use reelcast_error::{GenerationError, GenerationErrorKind, MediaError, MediaErrorKind, ReelcastResult};
use reelcast_interface::{
    EncodeJob, ImageRequest, MediaEncoder, MediaGenerator, TextGenerator, TextRequest,
    TextResponse, VideoProbe, VideoRequest, VideoStatus,
};
use reelcast_pipeline::{BatchOrchestrator, CopyGenerator, MediaBuilder};
use reelcast_storage::DraftStore;
use std::collections::VecDeque;
use std::sync::Arc;

pub const MP4: &[u8] = &[0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0, 0, 0, 1];
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

type Responder = Box<dyn Fn(&TextRequest) -> Result<String, GenerationError> + Send + Sync>;

/// Text generator answering through a closure.
pub struct MockText {
    responder: Responder,
    pub prompts: Mutex<Vec<String>>,
}

impl MockText {
    pub fn new(
        responder: impl Fn(&TextRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Valid drafts for whatever account, platform and asset type the prompt asks for.
    pub fn valid() -> Self {
        Self::new(|req| Ok(draft_json_for(req.user(), true)))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl TextGenerator for MockText {
    async fn generate(&self, req: &TextRequest) -> ReelcastResult<TextResponse> {
        self.prompts.lock().push(req.user().clone());
        let content = (self.responder)(req)?;
        Ok(TextResponse::new(content, "mock-model"))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Value the prompt asks to set for `field`.
pub fn requested(prompt: &str, field: &str) -> String {
    let marker = format!("\"{}\" to \"", field);
    prompt
        .split(&marker)
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_default()
        .to_string()
}

/// A draft JSON answer matching the prompt.
pub fn draft_json_for(prompt: &str, with_music: bool) -> String {
    let account = requested(prompt, "account");
    let platform = requested(prompt, "platform");
    let asset_type = requested(prompt, "asset_type");
    let mut draft = serde_json::json!({
        "account": account,
        "platform": platform,
        "caption": "Nobody talks about the snap of a flip phone closing",
        "hashtags": "#2000s #nostalgia",
        "hook": "Remember this sound?",
        "asset_type": asset_type,
        "video_prompt": "Close-up of a silver flip phone snapping shut",
    });
    if asset_type == "video" {
        draft["voiceover_text"] = "Remember this sound?".into();
        if with_music {
            draft["music_style"] = "upbeat 2000s pop".into();
        }
    }
    format!(
        "Here you go:\n```json\n{}\n```",
        serde_json::json!({ "drafts": [draft] })
    )
}

/// Media generator replaying scripted poll statuses.
pub struct MockMedia {
    pub statuses: Mutex<VecDeque<VideoStatus>>,
    pub video_payload: Vec<u8>,
    pub image_payload: Vec<u8>,
    pub submitted: Mutex<Vec<VideoRequest>>,
    pub images: Mutex<Vec<ImageRequest>>,
}

impl MockMedia {
    pub fn new(statuses: Vec<VideoStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            video_payload: MP4.to_vec(),
            image_payload: PNG.to_vec(),
            submitted: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        }
    }

    /// Finishes on the second poll.
    pub fn ready() -> Self {
        Self::new(vec![
            VideoStatus::Pending,
            VideoStatus::Done {
                url: "https://cdn.test/video.mp4".to_string(),
            },
        ])
    }

    pub fn submissions(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl MediaGenerator for MockMedia {
    async fn submit_video(&self, req: &VideoRequest) -> ReelcastResult<String> {
        let mut submitted = self.submitted.lock();
        submitted.push(req.clone());
        Ok(format!("req-{}", submitted.len()))
    }

    async fn poll_video(&self, _request_id: &str) -> ReelcastResult<VideoStatus> {
        Ok(self
            .statuses
            .lock()
            .pop_front()
            .unwrap_or(VideoStatus::Pending))
    }

    async fn generate_image(&self, req: &ImageRequest) -> ReelcastResult<String> {
        self.images.lock().push(req.clone());
        Ok("https://cdn.test/image.png".to_string())
    }

    async fn download(&self, url: &str) -> ReelcastResult<Bytes> {
        if url.ends_with(".png") {
            Ok(Bytes::from(self.image_payload.clone()))
        } else if url.ends_with(".mp4") {
            Ok(Bytes::from(self.video_payload.clone()))
        } else {
            Err(MediaError::new(MediaErrorKind::Api {
                status_code: 404,
                message: url.to_string(),
            })
            .into())
        }
    }
}

/// Encoder that records jobs and writes a tiny MP4.
pub struct MockEncoder {
    pub probe: VideoProbe,
    pub jobs: Mutex<Vec<EncodeJob>>,
}

impl MockEncoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            probe: VideoProbe {
                width,
                height,
                has_audio: true,
                duration_secs: Some(10.0),
            },
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<EncodeJob> {
        self.jobs.lock().clone()
    }
}

#[async_trait]
impl MediaEncoder for MockEncoder {
    async fn probe(&self, _path: &std::path::Path) -> ReelcastResult<VideoProbe> {
        Ok(self.probe)
    }

    async fn encode(&self, job: &EncodeJob) -> ReelcastResult<()> {
        self.jobs.lock().push(job.clone());
        std::fs::write(job.output(), MP4)
            .map_err(|e| MediaError::new(MediaErrorKind::Io(e.to_string())))?;
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

pub fn persona(account: &str, platforms: Vec<Platform>, asset_type: AssetType) -> Persona {
    PersonaBuilder::default()
        .account(account)
        .tone("wry, a little sentimental")
        .vocabulary(vec!["no cap".to_string()])
        .platforms(platforms)
        .asset_type(asset_type)
        .build()
        .unwrap()
}

pub fn personas() -> PersonaStore {
    [
        persona("genz", vec![Platform::Tiktok, Platform::Instagram], AssetType::Video),
        persona("genx", vec![Platform::Tiktok], AssetType::Video),
        persona("millennial", vec![Platform::Instagram], AssetType::Image),
    ]
    .into_iter()
    .collect()
}

/// Media settings with instant polling.
pub fn media_config() -> MediaConfig {
    MediaConfig {
        poll_interval_secs: 0,
        video_deadline_secs: 60,
        ..MediaConfig::default()
    }
}

pub struct Harness {
    pub text: Arc<MockText>,
    pub media: Arc<MockMedia>,
    pub encoder: Arc<MockEncoder>,
    pub store: Arc<DraftStore>,
    pub orchestrator: BatchOrchestrator,
}

pub fn harness(
    root: &std::path::Path,
    text: MockText,
    media: MockMedia,
    encoder: MockEncoder,
    media_config: MediaConfig,
) -> Harness {
    let text = Arc::new(text);
    let media = Arc::new(media);
    let encoder = Arc::new(encoder);
    let store = Arc::new(DraftStore::new(root).unwrap());
    let builder = MediaBuilder::new(media.clone(), encoder.clone(), media_config);
    let orchestrator = BatchOrchestrator::new(
        personas(),
        CopyGenerator::new(text.clone(), store.clone()),
        builder,
        store.clone(),
        PipelineConfig::default(),
    );
    Harness {
        text,
        media,
        encoder,
        store,
        orchestrator,
    }
}

pub fn generation_error(message: &str) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Request(message.to_string()))
}

/// Names of draft directories under `root`.
pub fn draft_dirs(root: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| !n.starts_with('.') && n != "failed")
        .collect();
    names.sort();
    names
}
