//! Size-based rotating log file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only file that rotates once it would grow past `max_bytes`.
///
/// On rotation `app.log` becomes `app.log.1`, `app.log.1` becomes
/// `app.log.2`, and so on up to `backup_count`; the oldest backup is removed.
/// With `backup_count == 0` or `max_bytes == 0` the file is never rotated.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Opens (or creates) `path`, creating parent directories as needed.
    pub fn new(path: impl AsRef<Path>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_log_file(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `index`-th backup (`<path>.<index>`).
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && self.written > 0
            && self.written + incoming as u64 > self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = self.backup_path(self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for index in (1..self.backup_count).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }

        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_log_file(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }

        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/log/app.log");

        let mut writer = RotatingFileWriter::new(&path, 1024, 2).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_rotation_keeps_backup_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut writer = RotatingFileWriter::new(&path, 10, 2).unwrap();
        for line in ["aaaaaaaa\n", "bbbbbbbb\n", "cccccccc\n", "dddddddd\n"] {
            writer.write_all(line.as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "dddddddd\n");
        assert_eq!(
            fs::read_to_string(writer.backup_path(1)).unwrap(),
            "cccccccc\n"
        );
        assert_eq!(
            fs::read_to_string(writer.backup_path(2)).unwrap(),
            "bbbbbbbb\n"
        );
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn test_zero_backups_never_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut writer = RotatingFileWriter::new(&path, 4, 0).unwrap();
        writer.write_all(b"12345678").unwrap();
        writer.write_all(b"90").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1234567890");
        assert!(!writer.backup_path(1).exists());
    }

    #[test]
    fn test_resumes_existing_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "0123456789").unwrap();

        let mut writer = RotatingFileWriter::new(&path, 12, 1).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(writer.backup_path(1)).unwrap(), "0123456789");
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
    }
}
