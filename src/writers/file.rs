//! Append-only file writer

use crate::core::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends to a file, creating it if needed.
///
/// Writes are buffered; the logger flushes after every event.
///
/// ```no_run
/// use logline::prelude::*;
///
/// let logger = Logger::new();
/// logger
///     .add_output("file", FileWriter::new("/var/log/app.log")?, JsonFormatter::new(false))?;
/// # Ok::<(), logline::LoggerError>(())
/// ```
pub struct FileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        {
            let mut writer = FileWriter::new(&path).unwrap();
            writer.write_all(b"first\n").unwrap();
        }
        {
            let mut writer = FileWriter::new(&path).unwrap();
            writer.write_all(b"second\n").unwrap();
            writer.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(FileWriter::new(path).is_err());
    }
}
