//! File-backed state store
//!
//! One file per key under a root directory. Every value is framed with a
//! crc32 checksum so torn or tampered files surface as corruption
//! instead of silently feeding the deserializer garbage.

use crate::error::{IndexError, Result};
use crate::storage::StateStore;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const FILE_EXTENSION: &str = "state";

/// Durable key→bytes store rooted at a directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    closed: AtomicBool,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(IndexError::Storage("store is closed".to_string()));
        }
        Ok(())
    }

    /// Keys are opaque; filenames are not. Keep a readable stem and
    /// disambiguate with the key's checksum so distinct keys can never
    /// collide on disk.
    fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .take(64)
            .collect();
        let digest = crc32fast::hash(key.as_bytes());
        self.root.join(format!("{stem}-{digest:08x}.{FILE_EXTENSION}"))
    }

    fn frame(value: &[u8]) -> Vec<u8> {
        let checksum = crc32fast::hash(value);
        let mut framed = Vec::with_capacity(value.len() + 4);
        framed.extend_from_slice(&checksum.to_le_bytes());
        framed.extend_from_slice(value);
        framed
    }

    fn unframe(path: &Path, framed: &[u8]) -> Result<Vec<u8>> {
        if framed.len() < 4 {
            return Err(IndexError::Corruption(format!(
                "truncated frame in {}",
                path.display()
            )));
        }
        let (header, payload) = framed.split_at(4);
        let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if crc32fast::hash(payload) != stored {
            return Err(IndexError::Corruption(format!(
                "checksum mismatch in {}",
                path.display()
            )));
        }
        Ok(payload.to_vec())
    }
}

impl StateStore for FileStore {
    fn initialize(&self) -> Result<()> {
        self.ensure_open()?;
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_open()?;
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(key);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(&Self::frame(value))?;
        file.sync_all()?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let path = self.path_for(key);
        let framed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::unframe(&path, &framed).map(Some)
    }

    fn clear(&self) -> Result<()> {
        self.ensure_open()?;
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
