//! Destinations for exported artifacts.

use crate::error::{ExportError, ExportResult};
use agriflow_core::storage::BoxFuture;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives finished export bytes.
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `filename`.
    fn save(&self, bytes: Vec<u8>, filename: &str) -> BoxFuture<'_, ExportResult<()>>;
}

/// Make a user-supplied name safe to use as a file name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "export".to_string()
    } else {
        cleaned
    }
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ExportError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for FileSink {
    fn save(&self, bytes: Vec<u8>, filename: &str) -> BoxFuture<'_, ExportResult<()>> {
        let path = self.dir.join(sanitize_filename(filename));
        Box::pin(async move {
            fs::write(&path, &bytes)
                .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
            Ok(())
        })
    }
}

/// Keeps artifacts in memory, in save order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved `(filename, bytes)` pairs.
    pub fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        match self.artifacts.lock() {
            Ok(artifacts) => artifacts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn filenames(&self) -> Vec<String> {
        self.artifacts().into_iter().map(|(name, _)| name).collect()
    }
}

impl ArtifactSink for MemorySink {
    fn save(&self, bytes: Vec<u8>, filename: &str) -> BoxFuture<'_, ExportResult<()>> {
        let filename = filename.to_string();
        Box::pin(async move {
            self.artifacts
                .lock()
                .map_err(|e| ExportError::Io(format!("Lock error: {}", e)))?
                .push((filename, bytes));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Patil-layout.pdf"), "Patil-layout.pdf");
        assert_eq!(sanitize_filename("../a b/c.pdf"), ".._a_b_c.pdf");
        assert_eq!(sanitize_filename("  "), "export");
        assert_eq!(sanitize_filename(".."), "export");
    }

    #[test]
    fn test_file_sink_writes() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out")).unwrap();
        block_on(sink.save(b"%PDF".to_vec(), "a.pdf")).unwrap();
        assert_eq!(fs::read(dir.path().join("out").join("a.pdf")).unwrap(), b"%PDF");
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        block_on(sink.save(vec![1], "one")).unwrap();
        block_on(sink.save(vec![2], "two")).unwrap();
        assert_eq!(sink.filenames(), vec!["one", "two"]);
        assert_eq!(sink.artifacts()[1].1, vec![2]);
    }
}
