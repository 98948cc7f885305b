//! Watermark persistence.
//!
//! The watermark is the original `pubDate` text of the newest article that
//! was delivered. It lives in a small JSON document:
//!
//! ```text
//! .state/
//! └── state.json   {"last_pubdate": "Mon, 15 Dec 2025 09:00:00 +0900"}
//! ```
//!
//! Writes go to a sibling temp file which is fsynced and renamed over the
//! target, so a reader sees either the old record or the new one. Keys other
//! than `last_pubdate` already in the file are carried over.

use crate::error::StateError;
use crate::models::StateRecord;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Load/save access to the single persisted watermark.
pub trait WatermarkStore {
    /// Return the stored watermark text, or `None` on first run.
    async fn load(&self) -> Result<Option<String>, StateError>;

    /// Replace the stored watermark.
    async fn save(&self, last_pubdate: &str) -> Result<(), StateError>;
}

/// [`WatermarkStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, path: &Path, source: std::io::Error) -> StateError {
        StateError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    async fn ensure_parent(&self) -> Result<(), StateError> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(parent, e))?;
        }
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Read the whole record, `None` if the file does not exist.
    async fn read_record(&self) -> Result<Option<StateRecord>, StateError> {
        let body = match fs::read_to_string(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(&self.path, e)),
        };

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| StateError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Flush the directory entry so the rename survives a power loss.
    #[cfg(unix)]
    async fn sync_parent(&self) -> Result<(), StateError> {
        let dir = self.parent_dir().unwrap_or(Path::new("."));
        let handle = fs::File::open(dir)
            .await
            .map_err(|e| self.io_err(dir, e))?;
        handle.sync_all().await.map_err(|e| self.io_err(dir, e))
    }

    #[cfg(not(unix))]
    async fn sync_parent(&self) -> Result<(), StateError> {
        Ok(())
    }
}

impl WatermarkStore for JsonFileStore {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<String>, StateError> {
        self.ensure_parent().await?;

        let Some(record) = self.read_record().await? else {
            info!("No state file; treating as first run");
            return Ok(None);
        };

        let last = record.last_pubdate.filter(|s| !s.is_empty());
        debug!(last_pubdate = ?last, "Loaded watermark");
        Ok(last)
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn save(&self, last_pubdate: &str) -> Result<(), StateError> {
        self.ensure_parent().await?;

        let mut record = self.read_record().await?.unwrap_or_default();
        record.last_pubdate = Some(last_pubdate.to_string());
        let json = serde_json::to_string_pretty(&record).map_err(|source| {
            StateError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        let tmp = self.tmp_path();
        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| self.io_err(&tmp, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| self.io_err(&tmp, e))?;
        file.sync_all().await.map_err(|e| self.io_err(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_err(&self.path, e))?;
        self.sync_parent().await?;

        info!(%last_pubdate, "Saved watermark");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join(".state").join("state.json"))
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none_and_creates_dir() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(dir.path().join(".state").is_dir());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_original_text() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("Mon, 15 Dec 2025 09:00:00 +0900").await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some("Mon, 15 Dec 2025 09:00:00 +0900")
        );
    }

    #[tokio::test]
    async fn test_save_replaces_whole_record_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("Sun, 14 Dec 2025 09:00:00 +0900").await.unwrap();
        store.save("Mon, 15 Dec 2025 09:00:00 +0900").await.unwrap();

        let body = std::fs::read_to_string(store.path()).unwrap();
        let record: StateRecord = serde_json::from_str(&body).unwrap();
        assert_eq!(
            record.last_pubdate.as_deref(),
            Some("Mon, 15 Dec 2025 09:00:00 +0900")
        );
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_save_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"last_pubdate": "Sun, 14 Dec 2025 09:00:00 +0900", "note": "관리자"}"#,
        )
        .unwrap();

        store.save("Mon, 15 Dec 2025 09:00:00 +0900").await.unwrap();

        let body = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["last_pubdate"], "Mon, 15 Dec 2025 09:00:00 +0900");
        assert_eq!(value["note"], "관리자");
    }

    #[tokio::test]
    async fn test_save_with_bare_file_name() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        store.save("Mon, 15 Dec 2025 09:00:00 +0900").await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some("Mon, 15 Dec 2025 09:00:00 +0900")
        );
    }

    #[tokio::test]
    async fn test_load_null_record_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{\n  \"last_pubdate\": null\n}").unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_corrupt_record_is_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{\"last_pubdate\": ").unwrap();
        assert!(matches!(
            store.load().await,
            Err(StateError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_saved_file_is_readable_utf8_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("Mon, 15 Dec 2025 09:00:00 +0900").await.unwrap();
        let body = std::fs::read_to_string(store.path()).unwrap();
        assert!(body.contains("\"last_pubdate\": \"Mon, 15 Dec 2025 09:00:00 +0900\""));
    }
}
