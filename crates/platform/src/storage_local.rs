//! Local filesystem Storage implementation for the desktop player.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled (host builds only).
//! All paths are resolved relative to the music root provided at construction.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::storage::{File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub enum LocalStorageError {
    /// The music root is missing or not a directory.
    NotMounted,
    /// Underlying I/O failure.
    Io(std::io::Error),
}

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotMounted => f.write_str("music root is not a directory"),
            Self::Io(e) => write!(f, "local storage error: {e}"),
        }
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotMounted => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LocalStorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
    pos: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = Read::read(&mut self.inner, buf)?;
        self.pos = self.pos.saturating_add(n as u64);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        self.pos = Seek::seek(&mut self.inner, SeekFrom::Start(pos))?;
        Ok(self.pos)
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// Paths passed to [`LocalFileStorage::open_file`] and [`LocalFileStorage::exists`]
/// are resolved relative to the root provided at construction.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::{File, Storage};
/// let mut storage = LocalFileStorage::new("/home/user/music");
/// storage.mount().await.unwrap();
/// let file = storage.open_file("sound.wav").await.unwrap();
/// assert!(file.size() >= 44);
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
    mounted: bool,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `music_root`.
    #[must_use]
    pub fn new(music_root: &str) -> Self {
        Self { root: PathBuf::from(music_root), mounted: false }
    }

    /// Create from the `MUSIC_PATH` environment variable.
    ///
    /// Returns `None` if `MUSIC_PATH` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("MUSIC_PATH").ok().map(|p| Self::new(&p))
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LocalStorageError> {
        if self.mounted {
            Ok(self.root.join(path))
        } else {
            Err(LocalStorageError::NotMounted)
        }
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File<'a> = LocalFile;

    async fn mount(&mut self) -> Result<(), Self::Error> {
        self.mounted = self.root.is_dir();
        if self.mounted {
            Ok(())
        } else {
            Err(LocalStorageError::NotMounted)
        }
    }

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<LocalFile, Self::Error> {
        let full = self.resolve(path)?;
        let file = fs::File::open(&full)?;
        let meta = file.metadata()?;
        Ok(LocalFile { inner: file, size: meta.len(), pos: 0 })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path)?.is_file())
    }
}
