//! File system archive of sent scripts.

use chrono::{DateTime, Utc};
use lcmuse_core::script::{ArchivedScript, ExtractedScript, ScriptArchive, archive_file_name};
use lcmuse_core::{LcmuseError, Result};
use std::path::{Path, PathBuf};

/// Writes each sent script to `<dir>/suggestion_<timestamp>.scd`.
#[derive(Debug, Clone)]
pub struct FileScriptArchiver {
    dir: PathBuf,
}

impl FileScriptArchiver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl ScriptArchive for FileScriptArchiver {
    async fn archive(
        &self,
        script: &ExtractedScript,
        at: DateTime<Utc>,
    ) -> Result<ArchivedScript> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            LcmuseError::filesystem_write(format!(
                "failed to create {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let file_name = archive_file_name(at);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, script.as_bytes())
            .await
            .map_err(|e| LcmuseError::filesystem_write(e.to_string()))?;

        tracing::info!("[Archive] SC code saved to {}", path.display());
        Ok(ArchivedScript { file_name, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_archive_creates_nested_dir_and_writes_exact_code() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("supercollider_scripts").join("generated");
        let archiver = FileScriptArchiver::new(&dir);
        let script = ExtractedScript::from_response(
            "Here:\n```supercollider\n{ HPF.ar(WhiteNoise.ar(0.1), 3000) }.play;\n```",
        );
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let archived = archiver.archive(&script, at).await.unwrap();

        assert_eq!(archived.file_name, "suggestion_2025-01-02T03-04-05-000Z.scd");
        assert_eq!(archived.path, dir.join(&archived.file_name));
        let written = tokio::fs::read(&archived.path).await.unwrap();
        assert_eq!(written, script.as_bytes());
    }

    #[tokio::test]
    async fn test_archive_into_existing_dir_is_fine() {
        let temp_dir = TempDir::new().unwrap();
        let archiver = FileScriptArchiver::new(temp_dir.path());
        let script = ExtractedScript::from_response("x = 1;");
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let second = first + chrono::Duration::milliseconds(1);

        let a = archiver.archive(&script, first).await.unwrap();
        let b = archiver.archive(&script, second).await.unwrap();

        assert_ne!(a.file_name, b.file_name);
        assert!(a.file_name < b.file_name);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = temp_dir.path().join("generated");
        std::fs::write(&blocker, "not a dir").unwrap();
        let archiver = FileScriptArchiver::new(&blocker);

        let err = archiver
            .archive(&ExtractedScript::from_response("x"), Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, LcmuseError::FilesystemWriteFailed(_)));
        assert!(err.to_string().starts_with("Error saving the SC file:"));
    }
}
