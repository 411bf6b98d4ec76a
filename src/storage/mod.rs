//! Blob storage for uploaded deliverable files.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Stores raw file content and hands back a location reference that is
/// persisted on the deliverable row.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, project_id: &str, original_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Disk-backed store. Files land under `<root>/uploads/<project_id>/`,
/// keyed by timestamp plus the sanitized original name.
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Strip anything that could escape the upload directory or confuse a file
/// system out of a client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn save(&self, project_id: &str, original_name: &str, bytes: &[u8]) -> Result<String> {
        let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
        let file_name = format!("{}-{}", timestamp, sanitize_file_name(original_name));
        let relative = PathBuf::from("uploads").join(project_id).join(&file_name);

        let full_path = self.root.join(&relative);
        let parent = full_path
            .parent()
            .context("upload path has no parent directory")?;
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create upload directory {}", parent.display()))?;

        tokio::fs::write(&full_path, bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", full_path.display()))?;

        Ok(relative.to_string_lossy().replace('\\', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("..\\..\\report.doc"), "report.doc");
        assert_eq!(sanitize_file_name("my file (1).zip"), "my_file__1_.zip");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[tokio::test]
    async fn test_save_writes_bytes_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskBlobStore::new(dir.path());

        let reference = store
            .save("project-1", "result.txt", b"done")
            .await
            .unwrap();

        assert!(reference.starts_with("uploads/project-1/"));
        assert!(reference.ends_with("-result.txt"));

        let written = std::fs::read(dir.path().join(&reference)).unwrap();
        assert_eq!(written, b"done");
    }
}
