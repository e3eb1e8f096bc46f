//! Prompt construction for copy generation.

use reelcast_core::{AssetType, Draft, Persona, Platform};
use reelcast_interface::{TextRequest, TextRequestBuilder};
use reelcast_error::{GenerationError, GenerationErrorKind};

/// Instructions fixing the JSON shape of a draft.
const SYSTEM_PROMPT: &str = "You generate nostalgia content drafts for TikTok and Instagram Reels. \
Always respond with ONLY a JSON object in this exact format, no other text:\n\
{\"drafts\": [{\"account\":\"...\",\"platform\":\"tiktok\",\"caption\":\"...\",\"hashtags\":\"#...\",\"hook\":\"...\",\
\"asset_type\":\"video\",\"video_prompt\":\"...\",\"voiceover_text\":\"...\",\"music_style\":\"...\"}]}\n\
video_prompt: visual scene description for AI media generation (e.g. cozy 2000s bedroom, Webkinz on shelf). \
voiceover_text: text for the narrator to say (often the hook). \
music_style: background music style (e.g. upbeat 2000s pop, nostalgic). \
For asset_type image, omit voiceover_text and music_style.";

/// Everything the prompt for one draft depends on.
#[derive(Debug, Clone)]
pub struct CopyRequest<'a> {
    /// Audience persona
    pub persona: &'a Persona,
    /// Target platform
    pub platform: Platform,
    /// Required asset type
    pub asset_type: AssetType,
    /// Asset keys the generator may pick from (asset-library mode)
    pub asset_keys: &'a [String],
    /// Draft being replaced, when regenerating
    pub previous: Option<&'a Draft>,
    /// Reviewer feedback, when regenerating
    pub feedback: Option<&'a str>,
}

/// Render the user prompt for a request.
pub fn user_prompt(req: &CopyRequest<'_>) -> String {
    let persona = req.persona;
    let mut prompt = format!(
        "Generate 1 nostalgia content draft for the {account} account.\n\
         Platform: {platform}\n\
         Asset type: {asset_type}\n\
         Set \"account\" to \"{account}\", \"platform\" to \"{platform}\" and \"asset_type\" to \"{asset_type}\".\n",
        account = persona.account(),
        platform = req.platform,
        asset_type = req.asset_type,
    );

    match req.asset_type {
        AssetType::Video => prompt.push_str(
            "Include video_prompt (visual scene), voiceover_text (narrator says the hook) \
             and music_style (background music).\n",
        ),
        AssetType::Image => prompt.push_str(
            "Include video_prompt (the still image to generate). \
             Do not include voiceover_text or music_style.\n",
        ),
    }

    prompt.push_str("\nPersona:\n");
    prompt.push_str(&format!("- Tone: {}\n", persona.tone()));
    if !persona.vocabulary().is_empty() {
        prompt.push_str(&format!("- Vocabulary: {}\n", persona.vocabulary().join(", ")));
    }
    if let Some(description) = persona.description() {
        prompt.push_str(&format!("- Audience: {}\n", description.trim()));
    }

    if !req.asset_keys.is_empty() {
        prompt.push_str(&format!(
            "\nAlso set \"asset_key\" to one of these library assets: {}\n",
            req.asset_keys.join(", ")
        ));
    }

    if let Some(previous) = req.previous {
        prompt.push_str(&format!(
            "\nThis replaces a rejected draft. Write something different from:\n\
             - Hook: {}\n- Caption: {}\n",
            previous.hook(),
            previous.caption()
        ));
    }
    if let Some(feedback) = req.feedback.map(str::trim).filter(|f| !f.is_empty()) {
        prompt.push_str(&format!("\nReviewer feedback to address: {}\n", feedback));
    }

    prompt
}

/// Build the text generator request for one draft.
pub fn build_request(req: &CopyRequest<'_>) -> Result<TextRequest, GenerationError> {
    TextRequestBuilder::default()
        .system(SYSTEM_PROMPT)
        .user(user_prompt(req))
        .build()
        .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))
}
