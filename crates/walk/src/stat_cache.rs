//! Lazily populated status information for a single entry.

use std::cell::{Cell, OnceCell};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Caches the link status (`lstat`) and the resolved status (`stat`) of a
/// path so that each is fetched from the filesystem at most once until the
/// cache is invalidated.
#[derive(Debug, Default)]
pub struct StatCache {
    link: OnceCell<Metadata>,
    resolved: OnceCell<Option<Metadata>>,
    fetches: Cell<u32>,
}

impl StatCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache already holding the link status of its path.
    #[must_use]
    pub fn with_link_status(metadata: Metadata) -> Self {
        let cache = Self::new();
        let _ = cache.link.set(metadata);
        cache
    }

    /// Returns the status of `path` without following a final symlink.
    pub fn link_status(&self, path: &Path) -> io::Result<&Metadata> {
        if let Some(metadata) = self.link.get() {
            return Ok(metadata);
        }
        let metadata = fs::symlink_metadata(path)?;
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.link.get_or_init(|| metadata))
    }

    /// Returns the status of the file `path` ultimately refers to.
    ///
    /// `None` means the path is a dangling symlink or vanished.
    pub fn resolved_status(&self, path: &Path) -> Option<&Metadata> {
        self.resolved
            .get_or_init(|| {
                if let Some(link) = self.link.get() {
                    if !link.file_type().is_symlink() {
                        return Some(link.clone());
                    }
                }
                self.fetches.set(self.fetches.get() + 1);
                fs::metadata(path).ok()
            })
            .as_ref()
    }

    /// Reports whether the link status has been fetched.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.link.get().is_some()
    }

    /// Number of filesystem status calls issued through this cache.
    #[must_use]
    pub fn fetches(&self) -> u32 {
        self.fetches.get()
    }

    /// Drops both cached statuses.
    pub fn invalidate(&mut self) {
        self.link.take();
        self.resolved.take();
    }
}

/// Device and inode pair identifying a file independently of its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    /// Builds an identity from raw device and inode numbers.
    #[must_use]
    pub const fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    /// Extracts the identity of the file described by `metadata`.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        Some(Self::new(metadata.dev(), metadata.ino()))
    }

    /// Extracts the identity of the file described by `metadata`.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Returns the identity of this process's standard output when it refers
    /// to a file.
    #[cfg(unix)]
    #[must_use]
    #[allow(clippy::unnecessary_cast)]
    pub fn of_stdout() -> Option<Self> {
        let stdout = io::stdout();
        let stat = rustix::fs::fstat(&stdout).ok()?;
        Some(Self::new(stat.st_dev as u64, stat.st_ino as u64))
    }

    /// Returns the identity of this process's standard output when it refers
    /// to a file.
    #[cfg(not(unix))]
    #[must_use]
    pub fn of_stdout() -> Option<Self> {
        None
    }

    /// Device number.
    #[must_use]
    pub const fn dev(&self) -> u64 {
        self.dev
    }

    /// Inode number.
    #[must_use]
    pub const fn ino(&self) -> u64 {
        self.ino
    }
}

/// Key used to recognise a directory reached twice through symlinks.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LoopKey {
    Identity(FileIdentity),
    Canonical(PathBuf),
}

impl LoopKey {
    pub(crate) fn of(path: &Path, metadata: &Metadata) -> Option<Self> {
        if let Some(identity) = FileIdentity::from_metadata(metadata) {
            return Some(Self::Identity(identity));
        }
        fs::canonicalize(path).ok().map(Self::Canonical)
    }
}
