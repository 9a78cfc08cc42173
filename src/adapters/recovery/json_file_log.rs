//! JSON-file recovery log.
//!
//! Entries are kept as one JSON array in a single file. Appends are
//! serialized by a mutex and written through a temporary file plus rename,
//! so a crash mid-write leaves the previous array intact. A file that does
//! not parse is moved aside rather than overwritten.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{RecoveryEntry, RecoveryLog};

#[derive(Debug)]
pub struct JsonFileRecoveryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

fn storage_error(action: &str, path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::StorageError,
        format!("Failed to {} {}: {}", action, path.display(), e),
    )
}

impl JsonFileRecoveryLog {
    /// # Example
    /// ```ignore
    /// let log = JsonFileRecoveryLog::new("./data/orphaned_bookings.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<RecoveryEntry>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error("read", &self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| storage_error("parse", &self.path, e))
    }

    async fn quarantine_corrupt_file(&self) -> Result<(), DomainError> {
        let aside = self.path.with_extension(format!(
            "corrupt-{}.json",
            Timestamp::now().as_datetime().format("%Y%m%d%H%M%S")
        ));
        fs::rename(&self.path, &aside)
            .await
            .map_err(|e| storage_error("move aside", &self.path, e))?;
        tracing::error!(
            path = %self.path.display(),
            moved_to = %aside.display(),
            "Recovery log was unreadable and has been moved aside"
        );
        Ok(())
    }
}

#[async_trait]
impl RecoveryLog for JsonFileRecoveryLog {
    async fn append(&self, entry: &RecoveryEntry) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(err) if err.message.starts_with("Failed to parse") => {
                self.quarantine_corrupt_file().await?;
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        entries.push(entry.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create directory for", &self.path, e))?;
        }

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| storage_error("serialize", &self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error("write", &tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error("replace", &self.path, e))?;

        tracing::warn!(
            payment_id = %entry.payment_id,
            order_id = %entry.order_id,
            total_entries = entries.len(),
            "Recorded unsaved paid booking in recovery log"
        );
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<RecoveryEntry>, DomainError> {
        self.read_all().await
    }
}
