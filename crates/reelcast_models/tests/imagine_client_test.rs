use reelcast_config::{HttpConfig, ImagineConfig};
use reelcast_error::{MediaErrorKind, ReelcastErrorKind};
use reelcast_interface::{ImageRequestBuilder, MediaGenerator, VideoRequestBuilder, VideoStatus};
use reelcast_models::ImagineClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ImagineClient {
    let config = ImagineConfig {
        base_url: server.uri(),
        ..ImagineConfig::default()
    };
    ImagineClient::new("key", config, HttpConfig::default()).unwrap()
}

fn media_kind(err: &reelcast_error::ReelcastError) -> MediaErrorKind {
    match err.kind() {
        ReelcastErrorKind::Media(e) => e.kind.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn submit_sends_vertical_video_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos/generations"))
        .and(body_partial_json(json!({
            "model": "grok-imagine-video",
            "duration": 10,
            "aspect_ratio": "9:16",
            "resolution": "720p"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"request_id": "req-1"})))
        .mount(&server)
        .await;

    let req = VideoRequestBuilder::default().prompt("scene").build().unwrap();
    assert_eq!(client(&server).submit_video(&req).await.unwrap(), "req-1");
}

#[tokio::test]
async fn submit_without_request_id_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let req = VideoRequestBuilder::default().prompt("scene").build().unwrap();
    let err = client(&server).submit_video(&req).await.unwrap_err();
    assert!(matches!(media_kind(&err), MediaErrorKind::MissingRequestId(_)));
}

#[tokio::test]
async fn poll_maps_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "done",
            "video": {"url": "https://cdn/v.mp4", "respect_moderation": true}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "expired"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "error": {"message": "render crashed"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/stopped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Cancelled"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/queued"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.poll_video("pending").await.unwrap(), VideoStatus::Pending);
    assert_eq!(
        client.poll_video("done").await.unwrap(),
        VideoStatus::Done {
            url: "https://cdn/v.mp4".to_string()
        }
    );
    assert_eq!(client.poll_video("old").await.unwrap(), VideoStatus::Expired);
    assert_eq!(
        client.poll_video("broken").await.unwrap(),
        VideoStatus::Failed {
            reason: "failed: render crashed".to_string()
        }
    );
    assert_eq!(
        client.poll_video("stopped").await.unwrap(),
        VideoStatus::Failed {
            reason: "cancelled".to_string()
        }
    );
    assert_eq!(client.poll_video("queued").await.unwrap(), VideoStatus::Pending);
}

#[tokio::test]
async fn moderated_video_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "done",
            "video": {"url": "https://cdn/v.mp4", "respect_moderation": false}
        })))
        .mount(&server)
        .await;

    let err = client(&server).poll_video("r").await.unwrap_err();
    assert!(matches!(media_kind(&err), MediaErrorKind::Moderated(_)));
}

#[tokio::test]
async fn image_url_is_read_from_data_or_top_level() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({"prompt": "a"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": "https://cdn/a.png"}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({"prompt": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn/b.png"})))
        .mount(&server)
        .await;

    let client = client(&server);
    let a = ImageRequestBuilder::default().prompt("a").build().unwrap();
    let b = ImageRequestBuilder::default().prompt("b").build().unwrap();
    assert_eq!(client.generate_image(&a).await.unwrap(), "https://cdn/a.png");
    assert_eq!(client.generate_image(&b).await.unwrap(), "https://cdn/b.png");
}

#[tokio::test]
async fn empty_download_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/empty.mp4"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .download(&format!("{}/files/empty.mp4", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(media_kind(&err), MediaErrorKind::EmptyPayload(_)));

    let err = client
        .download(&format!("{}/files/gone.mp4", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(
        media_kind(&err),
        MediaErrorKind::Api { status_code: 404, .. }
    ));
}
