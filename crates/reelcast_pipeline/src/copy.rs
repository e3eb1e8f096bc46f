//! Copy generation: prompt, call, extract, validate.

use crate::extraction::extract_json;
use crate::prompt::{CopyRequest, build_request};
use chrono::Utc;
use reelcast_core::{AssetSpec, AssetType, Draft, DraftBuilder, Platform};
use reelcast_error::{GenerationError, GenerationErrorKind, ReelcastResult};
use reelcast_interface::TextGenerator;
use reelcast_storage::DraftStore;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A draft object as the generator returns it, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawDraft {
    #[serde(default)]
    account: Option<Value>,
    #[serde(default)]
    platform: Option<Value>,
    #[serde(default)]
    caption: Option<Value>,
    #[serde(default)]
    hashtags: Option<Value>,
    #[serde(default)]
    hook: Option<Value>,
    #[serde(default)]
    asset_type: Option<Value>,
    #[serde(default)]
    video_prompt: Option<Value>,
    #[serde(default)]
    voiceover_text: Option<Value>,
    #[serde(default)]
    music_style: Option<Value>,
    #[serde(default)]
    asset_key: Option<Value>,
}

/// Non-empty trimmed string value of a field.
fn text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Hashtags may come as one string or a list of tags.
fn hashtags(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::Array(tags)) => {
            let joined = tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        }
        other => text(other),
    }
}

/// Parse and validate generator output against what was requested.
///
/// Accepts `{"drafts": [ {...} ]}` (first element) or a bare draft object.
/// Every field mandated by the asset type must be present and non-empty, and
/// `account`, `platform` and `asset_type` must match the request. Image
/// drafts lose any narration or music fields the generator added.
///
/// # Errors
///
/// [`GenerationErrorKind::NoJson`] / [`GenerationErrorKind::InvalidJson`] when
/// nothing parseable is found; [`GenerationErrorKind::MissingFields`],
/// [`GenerationErrorKind::Mismatch`] and friends when the object is invalid.
pub fn parse_draft(raw: &str, req: &CopyRequest<'_>) -> Result<Draft, GenerationError> {
    let json = extract_json(raw)?;
    let value: Value = serde_json::from_str(&json)
        .map_err(|e| GenerationError::new(GenerationErrorKind::InvalidJson(e.to_string())))?;

    let object = match value.get("drafts") {
        Some(Value::Array(drafts)) => drafts.first().cloned().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::MissingFields("drafts".to_string()))
        })?,
        Some(_) => {
            return Err(GenerationError::new(GenerationErrorKind::InvalidJson(
                "\"drafts\" is not a list".to_string(),
            )));
        }
        None => value,
    };
    if !object.is_object() {
        return Err(GenerationError::new(GenerationErrorKind::InvalidJson(
            "draft is not a JSON object".to_string(),
        )));
    }
    let raw: RawDraft = serde_json::from_value(object)
        .map_err(|e| GenerationError::new(GenerationErrorKind::InvalidJson(e.to_string())))?;

    let account = text(&raw.account);
    let platform = text(&raw.platform);
    let caption = text(&raw.caption);
    let tags = hashtags(&raw.hashtags);
    let hook = text(&raw.hook);
    let asset_type = text(&raw.asset_type);
    let video_prompt = text(&raw.video_prompt);
    let voiceover_text = text(&raw.voiceover_text);
    let music_style = text(&raw.music_style);

    let mut missing = Vec::new();
    for (name, field) in [
        ("account", &account),
        ("platform", &platform),
        ("caption", &caption),
        ("hashtags", &tags),
        ("hook", &hook),
        ("asset_type", &asset_type),
        ("video_prompt", &video_prompt),
    ] {
        if field.is_none() {
            missing.push(name);
        }
    }

    let parsed_type = asset_type
        .as_deref()
        .map(|s| {
            s.parse::<AssetType>().map_err(|_| {
                GenerationError::new(GenerationErrorKind::UnsupportedAssetType(s.to_string()))
            })
        })
        .transpose()?;
    if parsed_type == Some(AssetType::Video) {
        if voiceover_text.is_none() {
            missing.push("voiceover_text");
        }
        if music_style.is_none() {
            missing.push("music_style");
        }
    }
    if !missing.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::MissingFields(
            missing.join(", "),
        )));
    }

    // All present past this point.
    let (
        Some(account),
        Some(platform),
        Some(caption),
        Some(tags),
        Some(hook),
        Some(asset_type),
        Some(video_prompt),
    ) = (account, platform, caption, tags, hook, parsed_type, video_prompt)
    else {
        return Err(GenerationError::new(GenerationErrorKind::MissingFields(
            "draft".to_string(),
        )));
    };

    if asset_type != req.asset_type {
        return Err(mismatch("asset_type", req.asset_type.as_str(), asset_type.as_str()));
    }
    let expected_account = req.persona.account();
    if !account.eq_ignore_ascii_case(expected_account) {
        return Err(mismatch("account", expected_account, &account));
    }
    let parsed_platform: Platform = platform
        .parse()
        .map_err(|_| GenerationError::new(GenerationErrorKind::UnsupportedPlatform(platform.clone())))?;
    if parsed_platform != req.platform {
        return Err(mismatch("platform", req.platform.as_ref(), parsed_platform.as_ref()));
    }

    let asset = match (asset_type, voiceover_text, music_style) {
        (AssetType::Video, Some(voiceover_text), Some(music_style)) => AssetSpec::Video {
            video_prompt,
            voiceover_text,
            music_style,
        },
        (AssetType::Image, _, _) => AssetSpec::Image { video_prompt },
        _ => {
            return Err(GenerationError::new(GenerationErrorKind::MissingFields(
                "voiceover_text, music_style".to_string(),
            )));
        }
    };

    DraftBuilder::default()
        .account(expected_account.clone())
        .platform(req.platform)
        .caption(caption)
        .hashtags(tags)
        .hook(hook)
        .asset(asset)
        .asset_key(text(&raw.asset_key))
        .created_at(Some(Utc::now()))
        .build()
        .map_err(|e| GenerationError::new(GenerationErrorKind::MissingFields(e.to_string())))
}

fn mismatch(field: &str, expected: &str, actual: &str) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Mismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

/// Turns a persona into a validated draft through a text generator.
///
/// Output that cannot be parsed is saved under the store's `failed/`
/// directory and the error names the saved file.
#[derive(Clone)]
pub struct CopyGenerator {
    generator: Arc<dyn TextGenerator>,
    store: Arc<DraftStore>,
}

impl CopyGenerator {
    /// Create a copy generator.
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<DraftStore>) -> Self {
        Self { generator, store }
    }

    /// Generate one draft.
    #[instrument(
        skip(self, req),
        fields(
            account = %req.persona.account(),
            platform = %req.platform,
            asset_type = %req.asset_type,
            model = %self.generator.model_name()
        )
    )]
    pub async fn generate(&self, req: &CopyRequest<'_>) -> ReelcastResult<Draft> {
        let request = build_request(req)?;
        let response = self.generator.generate(&request).await?;
        debug!(model = %response.model(), chars = response.content().len(), "Received copy");

        match parse_draft(response.content(), req) {
            Ok(draft) => {
                info!(hook = %draft.hook(), "Copy generated");
                Ok(draft)
            }
            Err(e) if matches!(
                e.kind,
                GenerationErrorKind::NoJson(_) | GenerationErrorKind::InvalidJson(_)
            ) =>
            {
                let path = self
                    .store
                    .record_failed_output(req.persona.account(), response.content())
                    .await?;
                warn!(path = %path.display(), error = %e, "Copy output was not parseable");
                let note = format!("raw output saved to {}", path.display());
                let kind = match e.kind {
                    GenerationErrorKind::NoJson(detail) => {
                        GenerationErrorKind::NoJson(format!("{}; {}", detail, note))
                    }
                    GenerationErrorKind::InvalidJson(detail) => {
                        GenerationErrorKind::InvalidJson(format!("{}; {}", detail, note))
                    }
                    other => other,
                };
                Err(GenerationError::new(kind).into())
            }
            Err(e) => {
                warn!(error = %e, "Generated copy rejected");
                Err(e.into())
            }
        }
    }
}
