mod test_utils;

use reelcast_config::{AssetMapping, MediaConfig, MediaSource, PipelineConfig};
use reelcast_core::{AssetSpec, DraftBuilder, MediaKind, Platform};
use reelcast_error::{MediaErrorKind, ReelcastErrorKind};
use reelcast_interface::EncodeJob;
use reelcast_pipeline::{
    AssetLibrary, BatchOrchestrator, BatchRequestBuilder, CopyGenerator, LibraryAsset,
    LogProgress, MediaBuilder,
};
use reelcast_storage::DraftStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use test_utils::*;

fn library(root: &Path) -> AssetLibrary {
    let mapping = AssetMapping::parse(
        r#"
webkinz = "webkinz"
tamagotchi = "toys/tamagotchi.png"
dialup = "clips/dialup"
empty = "empty"
"#,
    )
    .unwrap();
    AssetLibrary::new(root, mapping)
}

fn seed(root: &Path) {
    std::fs::create_dir_all(root.join("webkinz/images")).unwrap();
    std::fs::write(root.join("webkinz/images/2.png"), PNG).unwrap();
    std::fs::write(root.join("webkinz/images/1.png"), PNG).unwrap();
    std::fs::write(root.join("webkinz/images/notes.txt"), b"ignore me").unwrap();
    std::fs::create_dir_all(root.join("toys")).unwrap();
    std::fs::write(root.join("toys/tamagotchi.png"), PNG).unwrap();
    std::fs::create_dir_all(root.join("clips")).unwrap();
    std::fs::write(root.join("clips/dialup.mp4"), MP4).unwrap();
    std::fs::create_dir_all(root.join("empty")).unwrap();
}

fn video_draft(asset_key: Option<&str>) -> reelcast_core::Draft {
    DraftBuilder::default()
        .account("genz")
        .platform(Platform::Tiktok)
        .caption("caption")
        .hashtags("#y2k")
        .hook("hook")
        .asset(AssetSpec::Video {
            video_prompt: "scene".to_string(),
            voiceover_text: "hook".to_string(),
            music_style: "pop".to_string(),
        })
        .asset_key(asset_key.map(str::to_string))
        .build()
        .unwrap()
}

fn image_draft(asset_key: &str) -> reelcast_core::Draft {
    DraftBuilder::default()
        .account("millennial")
        .platform(Platform::Instagram)
        .caption("caption")
        .hashtags("#y2k")
        .hook("hook")
        .asset(AssetSpec::Image {
            video_prompt: "still".to_string(),
        })
        .asset_key(Some(asset_key.to_string()))
        .build()
        .unwrap()
}

fn asset_kind(err: &reelcast_error::ReelcastError) -> MediaErrorKind {
    match err.kind() {
        ReelcastErrorKind::Media(e) => e.kind.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn keys_resolve_in_lookup_order() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let library = library(dir.path());

    assert_eq!(
        library.resolve("dialup").await.unwrap(),
        LibraryAsset::Video(dir.path().join("clips/dialup.mp4"))
    );
    assert_eq!(
        library.resolve("webkinz").await.unwrap(),
        LibraryAsset::Images(vec![
            dir.path().join("webkinz/images/1.png"),
            dir.path().join("webkinz/images/2.png"),
        ])
    );
    assert_eq!(
        library.resolve("tamagotchi").await.unwrap(),
        LibraryAsset::Image(dir.path().join("toys/tamagotchi.png"))
    );
}

#[tokio::test]
async fn unmapped_and_empty_assets_are_errors() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let library = library(dir.path());

    let err = library.resolve("furby").await.unwrap_err();
    assert!(matches!(asset_kind(&err), MediaErrorKind::Asset(m) if m.contains("furby")));
    let err = library.resolve("empty").await.unwrap_err();
    assert!(matches!(asset_kind(&err), MediaErrorKind::Asset(_)));
}

#[tokio::test]
async fn video_drafts_become_encode_jobs() {
    let assets = TempDir::new().unwrap();
    seed(assets.path());
    let drafts = TempDir::new().unwrap();
    let store = DraftStore::new(drafts.path()).unwrap();
    let encoder = MockEncoder::new(1080, 1920);
    let config = MediaConfig::default();
    let library = library(assets.path());

    for key in ["webkinz", "dialup", "tamagotchi"] {
        let staged = store.stage().await.unwrap();
        let media = library
            .build(&video_draft(Some(key)), &staged, &encoder, &config)
            .await
            .unwrap();
        assert_eq!(media.kind, MediaKind::Mp4);
        store.discard(staged).await;
    }

    let jobs = encoder.jobs();
    assert!(matches!(
        &jobs[0],
        EncodeJob::Slideshow { images, secs_per_image: 3, .. } if images.len() == 2
    ));
    assert!(matches!(&jobs[1], EncodeJob::Reencode { max_secs: 60, .. }));
    assert!(matches!(&jobs[2], EncodeJob::LoopImage { secs: 5, .. }));
}

#[tokio::test]
async fn image_drafts_copy_the_still() {
    let assets = TempDir::new().unwrap();
    seed(assets.path());
    let drafts = TempDir::new().unwrap();
    let store = DraftStore::new(drafts.path()).unwrap();
    let encoder = MockEncoder::new(1080, 1920);
    let library = library(assets.path());

    let staged = store.stage().await.unwrap();
    let media = library
        .build(&image_draft("webkinz"), &staged, &encoder, &MediaConfig::default())
        .await
        .unwrap();
    assert_eq!(media.kind, MediaKind::Png);
    assert_eq!(media.size_bytes, PNG.len() as u64);
    assert!(encoder.jobs().is_empty());

    let err = library
        .build(&image_draft("dialup"), &staged, &encoder, &MediaConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(asset_kind(&err), MediaErrorKind::Asset(_)));
}

#[tokio::test]
async fn draft_without_asset_key_is_an_error() {
    let assets = TempDir::new().unwrap();
    let drafts = TempDir::new().unwrap();
    let store = DraftStore::new(drafts.path()).unwrap();
    let staged = store.stage().await.unwrap();

    let err = library(assets.path())
        .build(
            &video_draft(None),
            &staged,
            &MockEncoder::new(1080, 1920),
            &MediaConfig::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(asset_kind(&err), MediaErrorKind::Asset(m) if m.contains("asset_key")));
}

#[tokio::test]
async fn library_batches_offer_keys_and_skip_the_media_api() {
    let assets = TempDir::new().unwrap();
    seed(assets.path());
    let drafts = TempDir::new().unwrap();
    let text = Arc::new(MockText::new(|req| {
        let json = draft_json_for(req.user(), true);
        Ok(json.replace("\"asset_type\"", "\"asset_key\":\"webkinz\",\"asset_type\""))
    }));
    let media = Arc::new(MockMedia::ready());
    let encoder = Arc::new(MockEncoder::new(1080, 1920));
    let store = Arc::new(DraftStore::new(drafts.path()).unwrap());
    let config = MediaConfig {
        source: MediaSource::Library,
        ..media_config()
    };
    let builder = MediaBuilder::new(media.clone(), encoder.clone(), config)
        .with_library(library(assets.path()));
    let orchestrator = BatchOrchestrator::new(
        personas(),
        CopyGenerator::new(text.clone(), store.clone()),
        builder,
        store.clone(),
        PipelineConfig::default(),
    );

    let request = BatchRequestBuilder::default()
        .accounts(vec!["genz".to_string()])
        .count(Some(1))
        .build()
        .unwrap();
    let report = orchestrator.run(&request, &LogProgress).await.unwrap();

    assert_eq!(report.created().len(), 1);
    assert_eq!(media.submissions(), 0);
    assert!(text.prompts.lock()[0].contains("dialup, empty, tamagotchi, webkinz"));
    assert!(matches!(&encoder.jobs()[0], EncodeJob::Slideshow { .. }));
    let record = store.get(report.created()[0]).await.unwrap();
    assert_eq!(
        record.draft().as_ref().unwrap().asset_key().as_deref(),
        Some("webkinz")
    );
}
