//! Router fixtures with in-process service mocks.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use chrono::NaiveDate;
use parking_lot::Mutex;
use reelcast_config::{AccountMap, MediaConfig, PersonaStore, PipelineConfig};
use reelcast_core::{AssetSpec, AssetType, DraftBuilder, DraftStatus, MediaKind, PersonaBuilder, Platform};
use reelcast_error::{GenerationError, GenerationErrorKind, ReelcastResult};
use reelcast_interface::{
    EncodeJob, ImageRequest, MediaEncoder, MediaGenerator, PostReceipt, PostRequest,
    PresignedUpload, PublishingApi, TextGenerator, TextRequest, TextResponse, VideoProbe,
    VideoRequest, VideoStatus,
};
use reelcast_pipeline::{BatchOrchestrator, CopyGenerator, MediaBuilder};
use reelcast_publish::Publisher;
use reelcast_server::{ApiState, create_router};
use reelcast_storage::DraftStore;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;
use tower::ServiceExt;

pub const MP4: &[u8] = &[0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0, 0, 0, 1];
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

fn requested(prompt: &str, field: &str) -> String {
    let marker = format!("\"{}\" to \"", field);
    prompt
        .split(&marker)
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_default()
        .to_string()
}

/// Answers every prompt with one well-formed draft, or fails when `broken` is set.
#[derive(Default)]
pub struct StubText {
    pub prompts: Mutex<Vec<String>>,
    pub broken: AtomicBool,
}

#[async_trait]
impl TextGenerator for StubText {
    async fn generate(&self, req: &TextRequest) -> ReelcastResult<TextResponse> {
        let prompt = req.user().clone();
        self.prompts.lock().push(prompt.clone());
        if self.broken.load(Ordering::SeqCst) {
            return Err(GenerationError::new(GenerationErrorKind::Request(
                "connection reset".to_string(),
            ))
            .into());
        }
        let asset_type = requested(&prompt, "asset_type");
        let mut draft = serde_json::json!({
            "account": requested(&prompt, "account"),
            "platform": requested(&prompt, "platform"),
            "caption": "The dial-up handshake was a whole song",
            "hashtags": "#90s #internet",
            "hook": "Hear that?",
            "asset_type": asset_type,
            "video_prompt": "Beige modem with blinking lights",
        });
        if asset_type == "video" {
            draft["voiceover_text"] = "Hear that?".into();
            draft["music_style"] = "chiptune".into();
        }
        Ok(TextResponse::new(
            serde_json::json!({ "drafts": [draft] }).to_string(),
            "stub-model",
        ))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// Media API whose videos are ready on the first poll.
pub struct StubMedia;

#[async_trait]
impl MediaGenerator for StubMedia {
    async fn submit_video(&self, _req: &VideoRequest) -> ReelcastResult<String> {
        Ok("req-1".to_string())
    }

    async fn poll_video(&self, _request_id: &str) -> ReelcastResult<VideoStatus> {
        Ok(VideoStatus::Done {
            url: "https://cdn.test/video.mp4".to_string(),
        })
    }

    async fn generate_image(&self, _req: &ImageRequest) -> ReelcastResult<String> {
        Ok("https://cdn.test/image.png".to_string())
    }

    async fn download(&self, url: &str) -> ReelcastResult<Bytes> {
        if url.ends_with(".png") {
            Ok(Bytes::from_static(PNG))
        } else {
            Ok(Bytes::from_static(MP4))
        }
    }
}

/// Encoder reporting output-sized video, so nothing gets re-encoded.
pub struct StubEncoder;

#[async_trait]
impl MediaEncoder for StubEncoder {
    async fn probe(&self, _path: &std::path::Path) -> ReelcastResult<VideoProbe> {
        let config = MediaConfig::default();
        Ok(VideoProbe {
            width: config.output_width,
            height: config.output_height,
            has_audio: true,
            duration_secs: Some(6.0),
        })
    }

    async fn encode(&self, job: &EncodeJob) -> ReelcastResult<()> {
        std::fs::write(job.output(), MP4).map_err(|e| {
            reelcast_error::MediaError::new(reelcast_error::MediaErrorKind::Io(e.to_string()))
        })?;
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Publishing API recording created posts.
#[derive(Default)]
pub struct StubPublishing {
    pub posts: Mutex<Vec<PostRequest>>,
}

#[async_trait]
impl PublishingApi for StubPublishing {
    async fn presign(&self, filename: &str, _content_type: &str) -> ReelcastResult<PresignedUpload> {
        Ok(PresignedUpload {
            upload_url: "https://upload.test/slot".to_string(),
            public_url: format!("https://cdn.test/{}", filename),
        })
    }

    async fn upload(&self, _upload_url: &str, _content_type: &str, _body: Bytes) -> ReelcastResult<()> {
        Ok(())
    }

    async fn create_post(&self, post: &PostRequest) -> ReelcastResult<PostReceipt> {
        self.posts.lock().push(post.clone());
        Ok(PostReceipt {
            post_id: Some("post-42".to_string()),
        })
    }
}

fn personas() -> PersonaStore {
    [
        ("genz", Platform::Tiktok, AssetType::Video),
        ("millennial", Platform::Instagram, AssetType::Image),
    ]
    .into_iter()
    .map(|(account, platform, asset_type)| {
        PersonaBuilder::default()
            .account(account)
            .tone("nostalgic")
            .vocabulary(vec!["lowkey".to_string()])
            .platforms(vec![platform])
            .asset_type(asset_type)
            .build()
            .unwrap()
    })
    .collect()
}

pub struct TestApp {
    pub dir: TempDir,
    pub store: Arc<DraftStore>,
    pub text: Arc<StubText>,
    pub publishing: Arc<StubPublishing>,
    pub state: ApiState,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(DraftStore::new(dir.path()).unwrap());
        let text = Arc::new(StubText::default());
        let publishing = Arc::new(StubPublishing::default());
        let media = MediaBuilder::new(
            Arc::new(StubMedia),
            Arc::new(StubEncoder),
            MediaConfig {
                poll_interval_secs: 0,
                ..MediaConfig::default()
            },
        );
        let orchestrator = BatchOrchestrator::new(
            personas(),
            CopyGenerator::new(text.clone(), store.clone()),
            media,
            store.clone(),
            PipelineConfig {
                default_accounts: vec!["genz".to_string()],
                default_count: 1,
                ..PipelineConfig::default()
            },
        );
        let accounts = AccountMap::parse(
            r#"
[genz]
tiktok_profile_id = "tt-genz"

[millennial]
instagram_profile_id = "ig-millennial"
"#,
        )
        .unwrap();
        let publisher = Publisher::new(
            store.clone(),
            accounts,
            Some(publishing.clone() as Arc<dyn PublishingApi>),
            false,
        );
        let state = ApiState::new(Arc::new(orchestrator), Arc::new(publisher));
        Self {
            dir,
            store,
            text,
            publishing,
            state,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Commit a finished video draft for `genz` on 2024-01-01.
    pub async fn seed_draft(&self, status: DraftStatus) -> String {
        let draft = DraftBuilder::default()
            .account("genz")
            .platform(Platform::Tiktok)
            .caption("Blowing on the cartridge fixed everything")
            .hashtags("#90s #gaming")
            .hook("Did it actually work?")
            .asset(AssetSpec::Video {
                video_prompt: "grey cartridge being blown on".to_string(),
                voiceover_text: "Did it actually work?".to_string(),
                music_style: "chiptune".to_string(),
            })
            .build()
            .unwrap();
        let staged = self.store.stage().await.unwrap();
        staged.write_media(MediaKind::Mp4, MP4).await.unwrap();
        let id = self
            .store
            .commit(staged, &draft, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap()
            .to_string();
        if status != DraftStatus::Generated {
            self.store
                .set_status(&id, DraftStatus::Approved)
                .await
                .unwrap();
        }
        if status == DraftStatus::Published {
            self.store
                .set_status(&id, DraftStatus::Published)
                .await
                .unwrap();
        }
        id
    }
}

pub async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes)
}

pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = send(router, "GET", uri, None).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn post_json(router: Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, "POST", uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Poll a job until it leaves pending/running.
pub async fn wait_for_job(app: &TestApp, job_id: &str) -> Value {
    for _ in 0..200 {
        let (status, job) = get_json(app.router(), &format!("/api/jobs/{}", job_id)).await;
        assert_eq!(status, StatusCode::OK);
        if job["status"] == "done" || job["status"] == "error" {
            return job;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}
