//! Fenced code block parser.
//!
//! Contract: given a text and a language tag, find the first occurrence of
//! "```" immediately followed by the tag (case-sensitive). The body runs from
//! the end of the tag up to the next "```" and is returned trimmed. If there
//! is no tagged opening fence, or it is never closed, nothing matches.

/// Language tag the generation endpoint is told to use.
pub const SUPERCOLLIDER_TAG: &str = "supercollider";

const FENCE: &str = "```";

/// Result of a fenced block search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub matched: bool,
    pub code: String,
}

/// Returns the trimmed body of the first fenced block tagged `tag`.
pub fn find_fenced_block<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let opening = format!("{FENCE}{tag}");
    let start = text.find(&opening)? + opening.len();
    let rest = &text[start..];
    let end = rest.find(FENCE)?;
    Some(rest[..end].trim())
}

/// Extracts the first block tagged `tag`, falling back to the whole input
/// trimmed when no block matches.
pub fn extract_code_block(text: &str, tag: &str) -> CodeBlock {
    match find_fenced_block(text, tag) {
        Some(code) => CodeBlock {
            matched: true,
            code: code.to_string(),
        },
        None => CodeBlock {
            matched: false,
            code: text.trim().to_string(),
        },
    }
}
