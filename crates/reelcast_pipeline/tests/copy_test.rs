mod test_utils;

use reelcast_core::{AssetSpec, AssetType, Platform};
use reelcast_error::GenerationErrorKind;
use reelcast_pipeline::{CopyRequest, parse_draft, user_prompt};
use test_utils::persona;

fn request<'a>(
    persona: &'a reelcast_core::Persona,
    platform: Platform,
    asset_type: AssetType,
) -> CopyRequest<'a> {
    CopyRequest {
        persona,
        platform,
        asset_type,
        asset_keys: &[],
        previous: None,
        feedback: None,
    }
}

#[test]
fn bare_object_with_tag_list_is_accepted() {
    let genz = persona("genz", vec![Platform::Instagram], AssetType::Image);
    let raw = r##"{"account":"GenZ","platform":"reels","caption":"Webkinz lore",
        "hashtags":["#webkinz","#2000s"],"hook":"Who else?","asset_type":"image",
        "video_prompt":"Plush pet on a desk","voiceover_text":"ignored","music_style":"ignored"}"##;

    let draft = parse_draft(raw, &request(&genz, Platform::Instagram, AssetType::Image)).unwrap();

    assert_eq!(draft.account(), "genz");
    assert_eq!(*draft.platform(), Platform::Instagram);
    assert_eq!(draft.hashtags(), "#webkinz #2000s");
    assert_eq!(
        draft.asset(),
        &AssetSpec::Image {
            video_prompt: "Plush pet on a desk".to_string()
        }
    );
    assert!(draft.created_at().is_some());
}

#[test]
fn every_missing_field_is_named() {
    let genz = persona("genz", vec![Platform::Tiktok], AssetType::Video);
    let raw = r#"{"drafts":[{"account":"genz","platform":"tiktok","caption":"  ",
        "hook":"Hook","asset_type":"video","video_prompt":"scene"}]}"#;

    let err = parse_draft(raw, &request(&genz, Platform::Tiktok, AssetType::Video)).unwrap_err();

    match err.kind {
        GenerationErrorKind::MissingFields(fields) => {
            assert_eq!(fields, "caption, hashtags, voiceover_text, music_style")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mismatched_values_are_rejected() {
    let genz = persona("genz", vec![Platform::Tiktok], AssetType::Video);
    let base = serde_json::json!({
        "account": "genz", "platform": "tiktok", "caption": "c", "hashtags": "#h",
        "hook": "h", "asset_type": "video", "video_prompt": "v",
        "voiceover_text": "o", "music_style": "m"
    });
    let req = request(&genz, Platform::Tiktok, AssetType::Video);

    for (field, value) in [
        ("account", "genx"),
        ("platform", "instagram"),
        ("asset_type", "image"),
    ] {
        let mut doc = base.clone();
        doc[field] = value.into();
        let err = parse_draft(&doc.to_string(), &req).unwrap_err();
        assert!(
            matches!(&err.kind, GenerationErrorKind::Mismatch { field: f, .. } if f == field),
            "{field}: {err}"
        );
    }

    let mut doc = base.clone();
    doc["platform"] = "myspace".into();
    let err = parse_draft(&doc.to_string(), &req).unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::UnsupportedPlatform(_)));

    doc = base;
    doc["asset_type"] = "gif".into();
    let err = parse_draft(&doc.to_string(), &req).unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::UnsupportedAssetType(_)));
}

#[test]
fn prose_without_json_is_no_json() {
    let genz = persona("genz", vec![Platform::Tiktok], AssetType::Video);
    let err = parse_draft(
        "Sorry, I can't help with that.",
        &request(&genz, Platform::Tiktok, AssetType::Video),
    )
    .unwrap_err();
    assert!(matches!(err.kind, GenerationErrorKind::NoJson(_)));
}

#[test]
fn prompt_names_persona_and_asset_keys() {
    let genx = reelcast_core::PersonaBuilder::default()
        .account("genx")
        .tone("dry")
        .description(Some("Latchkey kids".to_string()))
        .build()
        .unwrap();
    let keys = vec!["walkman".to_string(), "pager".to_string()];
    let req = CopyRequest {
        asset_keys: &keys,
        feedback: Some("shorter hook"),
        ..request(&genx, Platform::Tiktok, AssetType::Video)
    };

    let prompt = user_prompt(&req);

    assert!(prompt.contains("Set \"account\" to \"genx\""));
    assert!(prompt.contains("- Tone: dry"));
    assert!(prompt.contains("- Audience: Latchkey kids"));
    assert!(prompt.contains("walkman, pager"));
    assert!(prompt.contains("Reviewer feedback to address: shorter hook"));
    assert!(prompt.contains("music_style"));
}
