//! Human-readable draft summary (`spec.md`).

use reelcast_core::{AssetSpec, Draft};
use std::fmt::Write;

/// Render the reviewer-facing summary of a draft.
pub(crate) fn render(draft: &Draft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} draft for {}", draft.platform(), draft.account());
    let _ = writeln!(out);
    let _ = writeln!(out, "- Asset type: {}", draft.asset_type());
    let _ = writeln!(out, "- Status: {}", draft.status());
    if let Some(key) = draft.asset_key() {
        let _ = writeln!(out, "- Asset key: {}", key);
    }

    let mut section = |title: &str, body: &str| {
        let _ = write!(out, "\n## {}\n\n{}\n", title, body.trim());
    };
    section("Hook", draft.hook());
    section("Caption", draft.caption());
    section("Hashtags", draft.hashtags());
    match draft.asset() {
        AssetSpec::Video {
            video_prompt,
            voiceover_text,
            music_style,
        } => {
            section("Video prompt", video_prompt);
            section("Voiceover", voiceover_text);
            section("Music style", music_style);
        }
        AssetSpec::Image { video_prompt } => section("Image prompt", video_prompt),
    }
    out
}
