//! Durable key-value slots.
//!
//! A [`Backend`] holds opaque text blobs under string keys. The data store
//! only ever uses one key.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::Utc;

/// A durable key-value store of text blobs.
pub trait Backend {
    /// Reads the blob stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    ///
    /// Implementations must not leave a partially written blob visible to
    /// later reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Moves the blob stored under `key` out of the way without discarding
    /// it, and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored under `key` or the blob cannot
    /// be moved.
    fn set_aside(&mut self, key: &str) -> io::Result<String>;
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// A backend rooted at the given directory. The directory is created on
    /// first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory blobs are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a key is stored in.
    #[must_use]
    pub fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        // write to a sibling file and rename it into place, so readers see
        // either the old blob or the new one
        let path = self.path(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn set_aside(&mut self, key: &str) -> io::Result<String> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let aside = self.root.join(format!("{key}.json.unreadable-{stamp}"));
        fs::rename(self.path(key), &aside)?;
        Ok(aside.display().to_string())
    }
}

/// An in-memory backend, for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend pre-populated with one blob.
    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let mut backend = Self::new();
        backend.slots.insert(key.to_string(), value.to_string());
        backend
    }

    /// The blob stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_aside(&mut self, key: &str) -> io::Result<String> {
        let blob = self
            .slots
            .remove(key)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let aside = format!("{key}.unreadable");
        self.slots.insert(aside.clone(), blob);
        Ok(aside)
    }
}
