//! Script domain module.
//!
//! # Module Structure
//!
//! - `code_block`: fenced code block parser
//! - this module: the extracted script, archive naming and the archive trait

mod code_block;

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::PathBuf;

use crate::error::Result;

pub use code_block::{CodeBlock, SUPERCOLLIDER_TAG, extract_code_block, find_fenced_block};

/// Extension of archived SuperCollider documents.
pub const SCRIPT_EXTENSION: &str = "scd";

/// Prefix of archived script file names.
pub const SCRIPT_FILE_PREFIX: &str = "suggestion_";

/// Runnable SuperCollider code derived from a generated response.
///
/// Recomputed from the response text whenever needed; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedScript {
    code: String,
    from_fenced_block: bool,
}

impl ExtractedScript {
    /// Extracts the first `supercollider` block, or the whole text trimmed.
    pub fn from_response(response_text: &str) -> Self {
        let CodeBlock { matched, code } = extract_code_block(response_text, SUPERCOLLIDER_TAG);
        Self {
            code,
            from_fenced_block: matched,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.code.as_bytes()
    }

    pub fn from_fenced_block(&self) -> bool {
        self.from_fenced_block
    }

    pub fn into_string(self) -> String {
        self.code
    }
}

/// Builds `suggestion_<timestamp>.scd` where the timestamp is ISO-8601 UTC with
/// millisecond precision and ':' / '.' replaced by '-'.
///
/// The timestamp has a fixed width so names sort lexically in time order.
pub fn archive_file_name(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{SCRIPT_FILE_PREFIX}{stamp}.{SCRIPT_EXTENSION}")
}

/// A script file written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedScript {
    pub file_name: String,
    pub path: PathBuf,
}

/// Durable storage for sent scripts.
#[async_trait::async_trait]
pub trait ScriptArchive: Send + Sync {
    /// Writes `script` as the entire content of a new file named for `at`.
    ///
    /// Creates the target directory if needed.
    async fn archive(&self, script: &ExtractedScript, at: DateTime<Utc>)
    -> Result<ArchivedScript>;
}
