use chrono::NaiveDate;
use reelcast_core::{AssetSpec, Draft, DraftBuilder, DraftStatus, MediaKind, Platform};
use reelcast_error::{ReelcastErrorKind, StorageErrorKind};
use reelcast_storage::{CONTENT_FILE, DraftStore, SUMMARY_FILE};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const MP4: &[u8] = &[0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0, 0];

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn video_draft(account: &str) -> Draft {
    DraftBuilder::default()
        .account(account)
        .platform(Platform::Tiktok)
        .caption("POV: dial-up noises")
        .hashtags("#90s")
        .hook("Hear that?")
        .asset(AssetSpec::Video {
            video_prompt: "beige PC in a den".to_string(),
            voiceover_text: "Hear that?".to_string(),
            music_style: "synthwave".to_string(),
        })
        .build()
        .unwrap()
}

fn storage_kind(err: &reelcast_error::ReelcastError) -> StorageErrorKind {
    match err.kind() {
        ReelcastErrorKind::Storage(e) => e.kind.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

async fn commit_video(store: &DraftStore, account: &str) -> String {
    let staged = store.stage().await.unwrap();
    staged.write_media(MediaKind::Mp4, MP4).await.unwrap();
    store
        .commit(staged, &video_draft(account), date())
        .await
        .unwrap()
        .to_string()
}

fn staging_dirs(root: &Path) -> usize {
    std::fs::read_dir(root)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with(".staging-")
        })
        .count()
}

#[tokio::test]
async fn commit_creates_first_id_of_the_day() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    let id = commit_video(&store, "genz").await;

    assert_eq!(id, "2024-01-01-genz-1");
    let draft_dir = dir.path().join(&id);
    assert!(draft_dir.join(CONTENT_FILE).is_file());
    assert!(draft_dir.join(SUMMARY_FILE).is_file());
    assert!(draft_dir.join("video.mp4").is_file());
    assert_eq!(staging_dirs(dir.path()), 0);
}

#[tokio::test]
async fn same_day_drafts_get_distinct_sequences() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(commit_video(&store, "genz").await);
    }
    ids.push(commit_video(&store, "genx").await);

    assert_eq!(
        ids,
        vec![
            "2024-01-01-genz-1",
            "2024-01-01-genz-2",
            "2024-01-01-genz-3",
            "2024-01-01-genx-1"
        ]
    );
}

#[tokio::test]
async fn existing_directory_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let existing = dir.path().join("2024-01-01-genz-1");
    std::fs::create_dir_all(&existing).unwrap();
    std::fs::write(existing.join("keep.txt"), "mine").unwrap();

    let id = commit_video(&store, "genz").await;

    assert_eq!(id, "2024-01-01-genz-2");
    assert_eq!(std::fs::read_to_string(existing.join("keep.txt")).unwrap(), "mine");
}

#[tokio::test]
async fn commit_without_media_fails_and_leaves_nothing() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    let staged = store.stage().await.unwrap();
    let err = store
        .commit(staged, &video_draft("genz"), date())
        .await
        .unwrap_err();

    assert!(matches!(storage_kind(&err), StorageErrorKind::MediaMissing(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn image_media_does_not_satisfy_a_video_draft() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    let staged = store.stage().await.unwrap();
    staged
        .write_media(MediaKind::Png, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        .await
        .unwrap();
    assert!(store.commit(staged, &video_draft("genz"), date()).await.is_err());
}

#[tokio::test]
async fn metadata_only_drafts_are_listed_as_failed() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    commit_video(&store, "genz").await;
    let staged = store.stage().await.unwrap();
    store
        .commit_without_media(staged, &video_draft("genx"), date())
        .await
        .unwrap();

    let failed = store.list(Some(DraftStatus::Failed)).await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id().to_string(), "2024-01-01-genx-1");

    let generated = store.list(Some(DraftStatus::Generated)).await.unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(store.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn media_removed_after_commit_reads_as_failed() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let id = commit_video(&store, "genz").await;
    std::fs::remove_file(dir.path().join(&id).join("video.mp4")).unwrap();

    let record = store.get(&id).await.unwrap();
    assert_eq!(record.effective_status(), DraftStatus::Failed);
}

#[tokio::test]
async fn listing_skips_non_draft_directories_and_orders_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    commit_video(&store, "genz").await;
    commit_video(&store, "genz").await;
    std::fs::create_dir_all(dir.path().join("notes")).unwrap();
    store.record_failed_output("genz", "not json").await.unwrap();

    let ids: Vec<String> = store
        .list(None)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(ids, vec!["2024-01-01-genz-2", "2024-01-01-genz-1"]);
}

#[tokio::test]
async fn status_follows_review_workflow() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let id = commit_video(&store, "genz").await;

    let err = store.set_status(&id, DraftStatus::Published).await.unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::InvalidTransition(_)));

    let draft = store.set_status(&id, DraftStatus::Approved).await.unwrap();
    assert_eq!(*draft.status(), DraftStatus::Approved);
    let reread = store.get(&id).await.unwrap();
    assert_eq!(reread.effective_status(), DraftStatus::Approved);

    store.set_status(&id, DraftStatus::Published).await.unwrap();
    assert_eq!(
        store.get(&id).await.unwrap().effective_status(),
        DraftStatus::Published
    );
}

#[tokio::test]
async fn incomplete_drafts_cannot_be_approved() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let staged = store.stage().await.unwrap();
    let id = store
        .commit_without_media(staged, &video_draft("genz"), date())
        .await
        .unwrap();

    let err = store
        .set_status(&id.to_string(), DraftStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::MediaMissing(_)));
}

#[tokio::test]
async fn ids_are_validated_before_touching_disk() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    for bad in ["../../etc", "2024-01-01-genz-1/..", "a b", ""] {
        let err = store.get(bad).await.unwrap_err();
        assert!(matches!(storage_kind(&err), StorageErrorKind::InvalidId(_)));
    }
    let err = store.get("2024-01-01-genz-9").await.unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::NotFound(_)));
}

#[tokio::test]
async fn replace_swaps_content_and_keeps_id() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let id = commit_video(&store, "genz").await;

    let mut replacement = video_draft("genz");
    replacement = DraftBuilder::default()
        .account(replacement.account().clone())
        .platform(*replacement.platform())
        .caption("A fresher caption")
        .hashtags(replacement.hashtags().clone())
        .hook(replacement.hook().clone())
        .asset(replacement.asset().clone())
        .build()
        .unwrap();
    let staged = store.stage().await.unwrap();
    staged.write_media(MediaKind::Mp4, MP4).await.unwrap();

    let record = store.replace(&id, staged, &replacement).await.unwrap();
    assert_eq!(record.id().to_string(), id);
    assert_eq!(
        record.draft().as_ref().unwrap().caption(),
        "A fresher caption"
    );
    assert_eq!(staging_dirs(dir.path()), 0);
}

#[tokio::test]
async fn failed_output_is_saved_under_failed() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();

    let first = store.record_failed_output("genz", "garbage").await.unwrap();
    let second = store.record_failed_output("genz", "more").await.unwrap();

    assert_ne!(first, second);
    assert!(first.starts_with(dir.path().join("failed")));
    assert!(first.to_string_lossy().ends_with("-genz.txt"));
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "garbage");
}

#[tokio::test]
async fn media_path_points_into_the_draft_directory() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let id = commit_video(&store, "genz").await;

    let path = store.media_path(&id).await.unwrap();
    assert_eq!(path, dir.path().join(&id).join("video.mp4"));

    std::fs::remove_file(&path).unwrap();
    let err = store.media_path(&id).await.unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::MediaMissing(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_media_is_listed_as_failed() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let broken = commit_video(&store, "genz").await;
    let healthy = commit_video(&store, "genz").await;
    let media = dir.path().join(&broken).join("video.mp4");
    std::fs::remove_file(&media).unwrap();
    // A self-referencing link fails with ELOOP rather than NotFound.
    std::os::unix::fs::symlink(&media, &media).unwrap();

    let records = store.list(None).await.unwrap();

    assert_eq!(records.len(), 2);
    let record = records.iter().find(|r| r.id().to_string() == broken).unwrap();
    assert_eq!(record.effective_status(), DraftStatus::Failed);
    assert!(record.draft().is_some());
    let other = records.iter().find(|r| r.id().to_string() == healthy).unwrap();
    assert_eq!(other.effective_status(), DraftStatus::Generated);
}

#[tokio::test]
async fn held_draft_blocks_status_changes_until_released() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(DraftStore::new(dir.path()).unwrap());
    let id = commit_video(&store, "genz").await;

    let guard = store.lock_draft(&id).await.unwrap();
    let approve = tokio::spawn({
        let store = store.clone();
        let id = id.clone();
        async move { store.set_status(&id, DraftStatus::Approved).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!approve.is_finished());

    store
        .set_status_held(&guard, DraftStatus::Failed)
        .await
        .unwrap();
    drop(guard);

    let err = approve.await.unwrap().unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::InvalidTransition(_)));
}

#[tokio::test]
async fn published_draft_is_never_replaced() {
    let dir = TempDir::new().unwrap();
    let store = DraftStore::new(dir.path()).unwrap();
    let id = commit_video(&store, "genz").await;
    store.set_status(&id, DraftStatus::Approved).await.unwrap();
    store.set_status(&id, DraftStatus::Published).await.unwrap();

    let staged = store.stage().await.unwrap();
    staged.write_media(MediaKind::Mp4, MP4).await.unwrap();
    let err = store
        .replace(&id, staged, &video_draft("genz"))
        .await
        .unwrap_err();

    assert!(matches!(storage_kind(&err), StorageErrorKind::InvalidTransition(_)));
    assert_eq!(staging_dirs(dir.path()), 0);
    let record = store.get(&id).await.unwrap();
    assert_eq!(record.effective_status(), DraftStatus::Published);
}
