//! In-memory storage implementation for testing and volatile indexes.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{QuillError, Result};
use crate::storage::traits::{Storage, StorageInput, StorageOutput};

type FileMap = Arc<Mutex<HashMap<String, Box<[u8]>>>>;

/// An in-memory storage implementation.
///
/// Outputs become visible to readers when they are closed (or dropped).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create a new, empty memory storage.
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Get a copy of a file's content.
    pub fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().get(name).map(|data| data.to_vec())
    }

    /// Replace a file's content directly.
    pub fn write_file(&self, name: &str, data: &[u8]) {
        self.files.lock().insert(name.to_string(), data.into());
    }

    fn not_found(name: &str) -> QuillError {
        QuillError::storage(format!("File not found: {name}"))
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.lock();
        let data = files.get(name).ok_or_else(|| Self::not_found(name))?;

        Ok(Box::new(MemoryInput::new(data.to_vec())))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput::new(
            name.to_string(),
            Arc::clone(&self.files),
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.lock().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut file_names: Vec<String> = self.files.lock().keys().cloned().collect();
        file_names.sort();
        Ok(file_names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let files = self.files.lock();
        let data = files.get(name).ok_or_else(|| Self::not_found(name))?;
        Ok(data.len() as u64)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let mut files = self.files.lock();
        let data = files
            .remove(old_name)
            .ok_or_else(|| Self::not_found(old_name))?;

        files.insert(new_name.to_string(), data);
        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        let mut files = self.files.lock();

        for counter in 0..10000 {
            let temp_name = format!("{prefix}_{counter}.tmp");
            if files.contains_key(&temp_name) {
                continue;
            }

            // Reserve the name right away
            files.insert(temp_name.clone(), Box::default());
            let output = MemoryOutput::new(temp_name.clone(), Arc::clone(&self.files));
            return Ok((temp_name, Box::new(output)));
        }

        Err(QuillError::storage("Could not create temporary file"))
    }
}

/// A memory-based input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
    size: u64,
}

impl MemoryInput {
    fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryInput {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A memory-based output implementation.
#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    closed: bool,
}

impl MemoryOutput {
    fn new(name: String, files: FileMap) -> Self {
        MemoryOutput {
            name,
            buffer: Vec::new(),
            files,
            closed: false,
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::other("Output is closed"));
        }

        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn position(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            let data = std::mem::take(&mut self.buffer).into_boxed_slice();
            self.files.lock().insert(self.name.clone(), data);
            self.closed = true;
        }
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        // Ensure the file is stored when the output is dropped
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();

        let mut output = storage.create_output("test.txt").unwrap();
        output.write_all(b"Hello, Memory!").unwrap();
        assert_eq!(output.position(), 14);

        // Not visible until closed
        assert!(!storage.file_exists("test.txt"));
        output.close().unwrap();
        assert!(storage.file_exists("test.txt"));

        let mut input = storage.open_input("test.txt").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();
        assert_eq!(buffer, b"Hello, Memory!");
        assert_eq!(input.size().unwrap(), 14);
    }

    #[test]
    fn test_rename_and_delete() {
        let storage = MemoryStorage::new();
        storage.write_file("a", b"1");
        storage.write_file("b", b"22");

        storage.rename_file("a", "b").unwrap();
        assert_eq!(storage.read_file("b").unwrap(), b"1");
        assert_eq!(storage.list_files().unwrap(), vec!["b".to_string()]);

        storage.delete_file("b").unwrap();
        assert!(storage.list_files().unwrap().is_empty());
        assert!(storage.rename_file("missing", "b").is_err());
    }

    #[test]
    fn test_temp_names_are_unique() {
        let storage = MemoryStorage::new();

        let (first, _a) = storage.create_temp_output("seg").unwrap();
        let (second, _b) = storage.create_temp_output("seg").unwrap();

        assert_eq!(first, "seg_0.tmp");
        assert_eq!(second, "seg_1.tmp");
    }
}
