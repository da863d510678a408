//! Deterministic extraction of an image reference from model reply text
//!
//! Models asked for an image over a plain-text interface answer in one of a
//! few shapes: a markdown image link, a bare URL, or a raw base64 blob.
//! Extraction tries each shape in priority order; the first match wins.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum number of reply characters echoed back in extraction failures
const EXCERPT_CHARS: usize = 50;

/// Replies shorter than this are never treated as a bare base64 payload
const BASE64_MIN_LEN: usize = 100;

/// Why no image reference could be recovered from a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The reply text was empty
    Empty,
    /// The reply had text but none of the extraction rules matched
    NoImage {
        /// Truncated excerpt of the reply, for diagnosis
        excerpt: String,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "model returned no content"),
            Self::NoImage { excerpt } => {
                write!(f, "no image in model reply: {excerpt}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Markdown image syntax `![alt](url)`, non-greedy
fn markdown_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("must be valid regex"))
}

/// Bare URL ending in a known image extension, optional query string
fn image_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)https?://\S+\.(?:png|jpe?g|gif|webp)(?:\?\S*)?").expect("must be valid regex")
    })
}

/// Recover a usable image reference from a model's free-text reply
///
/// Returns an absolute URL or a `data:image/...;base64,...` URI. Rules, in
/// priority order:
///
/// 1. the URL inside the first markdown image link
/// 2. the first bare `http(s)` URL ending in a known image extension
/// 3. the text itself when it is already a `data:image` URI, or wrapped as
///    a PNG data URI when it looks like a bare base64 blob (long, no
///    whitespace)
///
/// Anything else is an error carrying an excerpt of the reply, so callers
/// can show the user why nothing was produced.
pub fn extract_image(content: &str) -> Result<String, ExtractError> {
    if content.is_empty() {
        return Err(ExtractError::Empty);
    }

    if let Some(captures) = markdown_image_re().captures(content) {
        let url = captures.get(1).expect("regex has group 1").as_str();
        // `![alt]()` carries no URL; fall through to the other rules
        if !url.is_empty() {
            return Ok(url.to_owned());
        }
    }

    if let Some(m) = image_url_re().find(content) {
        return Ok(m.as_str().to_owned());
    }

    if content.starts_with("data:image") {
        return Ok(content.to_owned());
    }

    if content.len() > BASE64_MIN_LEN && !content.chars().any(char::is_whitespace) {
        return Ok(format!("data:image/png;base64,{content}"));
    }

    Err(ExtractError::NoImage {
        excerpt: excerpt(content),
    })
}

/// Char-boundary-safe truncation of a reply for error messages
fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}
