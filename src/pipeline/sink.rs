//! Single-writer output sink
//!
//! All producers route through one sink instance; concurrent direct writes
//! from workers would interleave partial lines.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, WordforgeError};

/// Append target for generated candidates, one per line, flushed per line
/// (durability over raw throughput).
pub struct OutputSink {
    writer: Box<dyn Write + Send>,
    path: Option<PathBuf>,
}

impl OutputSink {
    /// Open (create or truncate) a wordlist file. Failure here is fatal to
    /// the run before it starts.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            WordforgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        Ok(Self {
            writer: Box::new(file),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an arbitrary writer (in-memory buffers in tests)
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            path: None,
        }
    }

    /// Write one candidate as one newline-terminated line and flush
    pub fn write_candidate(&mut self, candidate: &str) -> Result<()> {
        self.write_line(candidate).map_err(|e| {
            WordforgeError::io(
                e.to_string(),
                self.path.as_ref().map(|p| p.to_string_lossy().to_string()),
            )
        })
    }

    fn write_line(&mut self, candidate: &str) -> std::io::Result<()> {
        self.writer.write_all(candidate.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_create_write_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordlist.txt");

        let mut sink = OutputSink::create(&path).unwrap();
        sink.write_candidate("admin").unwrap();
        sink.write_candidate("admin2024").unwrap();
        drop(sink);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "admin\nadmin2024\n");
    }

    #[test]
    fn test_create_fails_on_bad_path() {
        let err = OutputSink::create("/definitely/not/a/dir/wordlist.txt").unwrap_err();
        assert!(matches!(err, WordforgeError::Io { .. }));
    }

    #[test]
    fn test_from_writer_has_no_path() {
        let sink = OutputSink::from_writer(Vec::new());
        assert!(sink.path().is_none());
    }
}
