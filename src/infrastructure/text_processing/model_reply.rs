//! Pure transforms over raw model reply text.
//!
//! The model is instructed to return bare JSON without fences or citation
//! markers, but does so inconsistently. These functions pin down the exact
//! cleanup the inference client applies, independent of any network code.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Bilingual reply extracted from the model's JSON output.
#[derive(Debug, Deserialize, PartialEq)]
pub struct BilingualReply {
    pub en: String,
    pub ru: String,
}

/// Unwrap a single fenced code block (with an optional language tag),
/// returning the inner text. Applied exactly once, never recursively;
/// text that is not fenced comes back trimmed and otherwise unchanged.
pub fn unwrap_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // The opening line may carry a language tag such as ```json.
    let inner = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    inner.trim()
}

/// Remove bracketed numeric citation markers (`[1]`, `[23]`) anywhere in the
/// text, then trim. Adjacent whitespace is left as-is: `"Paris [1]."`
/// becomes `"Paris ."`, and a resulting double space is not collapsed.
pub fn strip_citation_markers(text: &str) -> String {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker = MARKER.get_or_init(|| Regex::new(r"\[\d+\]").expect("citation marker regex"));

    marker.replace_all(text, "").trim().to_string()
}

/// Parse a raw model reply into a cleaned bilingual result.
///
/// Tolerates one level of code fencing; any remaining parse failure is
/// returned untouched so the caller can decide how to surface it.
pub fn parse_bilingual_reply(raw: &str) -> Result<BilingualReply, serde_json::Error> {
    let reply: BilingualReply = serde_json::from_str(unwrap_code_fence(raw))?;

    Ok(BilingualReply {
        en: strip_citation_markers(&reply.en),
        ru: strip_citation_markers(&reply.ru),
    })
}
