use bytes::Bytes;
use reelcast_config::{HttpConfig, PublishConfig};
use reelcast_core::{MediaKind, Platform};
use reelcast_error::{PublishErrorCategory, PublishErrorKind, ReelcastErrorKind};
use reelcast_interface::{PostMedia, PostRequest, PostTarget, PublishingApi};
use reelcast_publish::LateClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, http: HttpConfig) -> LateClient {
    let config = PublishConfig {
        base_url: server.uri(),
        ..PublishConfig::default()
    };
    LateClient::new("late-key", config, http).unwrap()
}

fn publish_kind(err: &reelcast_error::ReelcastError) -> PublishErrorKind {
    match err.kind() {
        ReelcastErrorKind::Publish(e) => e.kind.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn presign_sends_filename_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/media/presign"))
        .and(header("authorization", "Bearer late-key"))
        .and(body_json(json!({"filename": "video.mp4", "contentType": "video/mp4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": "https://upload.test/slot",
            "publicUrl": "https://cdn.test/video.mp4"
        })))
        .mount(&server)
        .await;

    let upload = client(&server, HttpConfig::default())
        .presign("video.mp4", "video/mp4")
        .await
        .unwrap();

    assert_eq!(upload.upload_url, "https://upload.test/slot");
    assert_eq!(upload.public_url, "https://cdn.test/video.mp4");
}

#[tokio::test]
async fn upload_puts_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/slot"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, HttpConfig::default())
        .upload(
            &format!("{}/slot", server.uri()),
            "image/png",
            Bytes::from_static(b"png"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn create_post_sends_late_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(json!({
            "content": "caption\n\n#tags",
            "platforms": [{"platform": "tiktok", "accountId": "tt-1"}],
            "mediaItems": [{"type": "video", "url": "https://cdn.test/video.mp4"}],
            "publishNow": true,
            "timezone": "UTC"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"post": {"_id": "post-9"}})))
        .mount(&server)
        .await;

    let post = PostRequest {
        content: "caption\n\n#tags".to_string(),
        platforms: vec![PostTarget {
            platform: Platform::Tiktok,
            account_id: "tt-1".to_string(),
        }],
        media_items: vec![PostMedia::new(MediaKind::Mp4, "https://cdn.test/video.mp4")],
        publish_now: true,
        timezone: "UTC".to_string(),
    };
    let receipt = client(&server, HttpConfig::default())
        .create_post(&post)
        .await
        .unwrap();

    assert_eq!(receipt.post_id.as_deref(), Some("post-9"));
}

#[tokio::test]
async fn rejected_post_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid accountId"})),
        )
        .mount(&server)
        .await;

    let post = PostRequest {
        content: "c".to_string(),
        platforms: Vec::new(),
        media_items: Vec::new(),
        publish_now: true,
        timezone: "UTC".to_string(),
    };
    let err = client(&server, HttpConfig::default())
        .create_post(&post)
        .await
        .unwrap_err();

    match err.kind() {
        ReelcastErrorKind::Publish(e) => {
            assert_eq!(e.category(), PublishErrorCategory::Transport);
            assert_eq!(
                e.kind,
                PublishErrorKind::Rejected {
                    status_code: 400,
                    message: "Invalid accountId".to_string()
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn presign_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/media/presign"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/presign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": "https://upload.test/slot",
            "publicUrl": "https://cdn.test/image.png"
        })))
        .mount(&server)
        .await;

    let http = HttpConfig {
        max_retries: 2,
        retry_base_delay_ms: 1,
    };
    let upload = client(&server, http)
        .presign("image.png", "image/png")
        .await
        .unwrap();
    assert_eq!(upload.public_url, "https://cdn.test/image.png");
}

#[tokio::test]
async fn presign_without_urls_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uploadUrl": "", "publicUrl": ""})))
        .mount(&server)
        .await;

    let err = client(&server, HttpConfig::default())
        .presign("video.mp4", "video/mp4")
        .await
        .unwrap_err();
    assert!(matches!(publish_kind(&err), PublishErrorKind::InvalidResponse(_)));
}
