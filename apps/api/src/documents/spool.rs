//! Upload spool — optionally mirrors each upload to `<dir>/<uuid><ext>`.
//!
//! Nothing reads the spooled files back; extraction always runs from memory.
//! Files are never removed by the service, so the directory grows with every
//! upload. Retention is left to whoever configures `UPLOAD_DIR` (a tmpfs mount
//! or a cron job pruning old files).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use uuid::Uuid;

use crate::documents::Document;

const DEFAULT_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone)]
pub struct UploadSpool {
    dir: PathBuf,
}

impl UploadSpool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the document under a fresh random name and returns the path.
    pub async fn save(&self, document: &Document) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload dir {}", self.dir.display()))?;

        let ext = extension_of(document.file_name.as_deref());
        let path = self.dir.join(format!("{}{ext}", Uuid::new_v4()));

        tokio::fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", path.display()))?;

        debug!("Spooled {} bytes to {}", document.bytes.len(), path.display());
        Ok(path)
    }
}

/// Returns the filename's extension including the dot, or `.pdf`.
fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
