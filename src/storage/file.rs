//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{QuillError, Result};
use crate::storage::traits::{Storage, StorageConfig, StorageInput, StorageOutput};

/// A file-based storage implementation rooted at one directory.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: StorageConfig,
}

impl FileStorage {
    /// Create a new file storage in the given directory.
    ///
    /// A missing directory is created by the first write, not here.
    pub fn new<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if directory.exists() && !directory.is_dir() {
            return Err(QuillError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    fn ensure_directory(&self) -> Result<()> {
        if !self.directory.is_dir() {
            std::fs::create_dir_all(&self.directory)?;
        }
        Ok(())
    }

    /// Get the full path for a file name.
    fn file_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = File::open(self.file_path(name)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                QuillError::storage(format!("File not found: {name}"))
            } else {
                e.into()
            }
        })?;

        Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.ensure_directory()?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.file_path(name))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).exists()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        match std::fs::remove_file(self.file_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        if !self.directory.is_dir() {
            return Ok(files);
        }

        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();

            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push(name.to_string());
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let metadata = self.file_path(name).metadata().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                QuillError::storage(format!("File not found: {name}"))
            } else {
                e.into()
            }
        })?;

        Ok(metadata.len())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        std::fs::rename(self.file_path(old_name), self.file_path(new_name))?;
        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        self.ensure_directory()?;

        for counter in 0..10000 {
            let temp_name = format!("{prefix}_{counter}.tmp");

            // create_new so two writers never share a temp file
            let file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.file_path(&temp_name))
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let output = FileOutput::new(file, self.config.buffer_size, self.config.sync_writes);
            return Ok((temp_name, Box::new(output)));
        }

        Err(QuillError::storage("Could not create temporary file"))
    }
}

/// A file input implementation.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let size = file.metadata()?.len();
        let reader = BufReader::with_capacity(buffer_size, file);

        Ok(FileInput { reader, size })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInput {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A file output implementation.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position: 0,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;

        if self.sync_writes {
            self.writer.flush()?;
        }

        Ok(bytes_written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn close(&mut self) -> Result<()> {
        self.flush_and_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), StorageConfig::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_read_file() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"Hello, World!").unwrap();
        assert_eq!(output.position(), 13);
        output.close().unwrap();

        let mut input = storage.open_input("test.txt").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();

        assert_eq!(buffer, b"Hello, World!");
        assert_eq!(input.size().unwrap(), 13);
    }

    #[test]
    fn test_file_operations() {
        let (_temp_dir, storage) = create_test_storage();

        assert!(!storage.file_exists("nonexistent.txt"));

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"Test content").unwrap();
        output.close().unwrap();

        assert!(storage.file_exists("test.txt"));
        assert_eq!(storage.file_size("test.txt").unwrap(), 12);
        assert_eq!(storage.list_files().unwrap(), vec!["test.txt"]);

        storage.rename_file("test.txt", "renamed.txt").unwrap();
        assert!(!storage.file_exists("test.txt"));
        assert!(storage.file_exists("renamed.txt"));

        storage.delete_file("renamed.txt").unwrap();
        assert!(!storage.file_exists("renamed.txt"));

        // Deleting again is fine
        storage.delete_file("renamed.txt").unwrap();
    }

    #[test]
    fn test_rename_replaces_existing() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output("index.qs").unwrap();
        output.write_all(b"old").unwrap();
        output.close().unwrap();

        let (temp_name, mut output) = storage.create_temp_output("index.qs").unwrap();
        output.write_all(b"new content").unwrap();
        output.close().unwrap();

        storage.rename_file(&temp_name, "index.qs").unwrap();

        let mut buffer = Vec::new();
        storage
            .open_input("index.qs")
            .unwrap()
            .read_to_end(&mut buffer)
            .unwrap();
        assert_eq!(buffer, b"new content");
        assert_eq!(storage.list_files().unwrap(), vec!["index.qs"]);
    }

    #[test]
    fn test_temp_file_creation() {
        let (_temp_dir, storage) = create_test_storage();

        let (first, mut output) = storage.create_temp_output("test").unwrap();
        output.close().unwrap();
        let (second, _output) = storage.create_temp_output("test").unwrap();

        assert_eq!(first, "test_0.tmp");
        assert_eq!(second, "test_1.tmp");
    }

    #[test]
    fn test_directory_created_on_first_write() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested, StorageConfig::default()).unwrap();

        assert!(!nested.exists());
        assert!(!storage.file_exists("seg"));
        assert!(storage.list_files().unwrap().is_empty());

        let (temp_name, mut output) = storage.create_temp_output("seg").unwrap();
        output.write_all(b"data").unwrap();
        output.close().unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.list_files().unwrap(), vec![temp_name]);
    }

    #[test]
    fn test_file_path_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("plain");
        std::fs::write(&file_path, b"x").unwrap();

        assert!(FileStorage::new(&file_path, StorageConfig::default()).is_err());
    }

    #[test]
    fn test_file_not_found() {
        let (_temp_dir, storage) = create_test_storage();

        assert!(storage.open_input("nonexistent.txt").is_err());
        assert!(storage.file_size("nonexistent.txt").is_err());
    }
}
