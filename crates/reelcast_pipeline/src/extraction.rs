//! Utilities for extracting JSON from text generator responses.
//!
//! Responses often wrap the JSON in markdown code blocks or surround it with
//! explanatory text.

use reelcast_error::{GenerationError, GenerationErrorKind};

/// Extract the JSON object from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` or ``` ... ```
/// 2. The first balanced `{ ... }` object
///
/// # Errors
///
/// Returns [`GenerationErrorKind::NoJson`] if no object is found.
///
/// # Examples
///
/// ```
/// use reelcast_pipeline::extract_json;
///
/// let response = "Here you go:\n```json\n{\"caption\": \"hi\"}\n```\nEnjoy!";
/// assert_eq!(extract_json(response).unwrap(), "{\"caption\": \"hi\"}");
///
/// let response = "Sure! {\"drafts\": [{\"hook\": \"a {b}\"}]} Anything else?";
/// assert_eq!(extract_json(response).unwrap(), "{\"drafts\": [{\"hook\": \"a {b}\"}]}");
/// ```
pub fn extract_json(response: &str) -> Result<String, GenerationError> {
    if let Some(block) = extract_from_code_block(response) {
        if let Some(json) = extract_balanced(&block, '{', '}') {
            return Ok(json);
        }
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in generator response"
    );
    Err(GenerationError::new(GenerationErrorKind::NoJson(format!(
        "response length {}",
        response.len()
    ))))
}

/// Extract content from the first markdown code block.
///
/// A missing closing fence (truncated response) yields everything after the
/// opening fence.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip the language tag, if any
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    match response[skip_to..].find("```") {
        Some(end) => Some(response[skip_to..skip_to + end].trim().to_string()),
        None => Some(response[skip_to..].trim().to_string()),
    }
}

/// Extract content between balanced delimiters, ignoring delimiters inside strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
