use reelcast_core::{MediaKind, Platform};
use reelcast_interface::{
    PostMedia, PostRequest, PostTarget, PresignedUpload, VideoRequestBuilder,
};

#[test]
fn post_request_uses_publishing_api_field_names() {
    let post = PostRequest {
        content: "caption\n\n#tags".to_string(),
        platforms: vec![PostTarget {
            platform: Platform::Tiktok,
            account_id: "tt-1".to_string(),
        }],
        media_items: vec![PostMedia::new(MediaKind::Mp4, "https://cdn/x.mp4")],
        publish_now: true,
        timezone: "UTC".to_string(),
    };

    let json = serde_json::to_value(&post).unwrap();
    assert_eq!(json["publishNow"], true);
    assert_eq!(json["platforms"][0]["accountId"], "tt-1");
    assert_eq!(json["platforms"][0]["platform"], "tiktok");
    assert_eq!(json["mediaItems"][0]["type"], "video");
}

#[test]
fn presign_response_parses() {
    let upload: PresignedUpload = serde_json::from_str(
        r#"{"uploadUrl": "https://up/1", "publicUrl": "https://cdn/1", "expiresIn": 3600}"#,
    )
    .unwrap();
    assert_eq!(upload.public_url, "https://cdn/1");
}

#[test]
fn video_request_defaults_to_vertical_clip() {
    let req = VideoRequestBuilder::default()
        .prompt("cozy bedroom")
        .build()
        .unwrap();
    assert_eq!(*req.duration(), 10);
    assert_eq!(req.aspect_ratio(), "9:16");
    assert_eq!(req.resolution(), "720p");
}
