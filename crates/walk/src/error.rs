use std::error::Error as StdError;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error returned when traversal, an entry action, or configuration fails.
///
/// Environmental failures (missing roots, unreadable directories, symlink
/// cycles, failures raised by the callback) are *recoverable*: the walker
/// hands them to the configured [`ErrorPolicy`](crate::ErrorPolicy). Errors
/// that signal a misuse of the API, such as an invalid rename or a prune
/// request during post-order traversal, always propagate.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    /// Classifies a failure to inspect a traversal root.
    pub(crate) fn root(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::new(WalkErrorKind::NotFound { path, source }),
            io::ErrorKind::PermissionDenied => {
                Self::new(WalkErrorKind::PermissionDenied { path, source })
            }
            _ => Self::metadata(path, source),
        }
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::new(WalkErrorKind::PermissionDenied { path, source })
        } else {
            Self::new(WalkErrorKind::ReadDir { path, source })
        }
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) fn open(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::new(WalkErrorKind::PermissionDenied { path, source })
        } else {
            Self::new(WalkErrorKind::Read { path, source })
        }
    }

    pub(crate) fn read(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Read { path, source })
    }

    pub(crate) fn cyclic(path: PathBuf, ancestor: PathBuf) -> Self {
        Self::new(WalkErrorKind::CyclicRecursion { path, ancestor })
    }

    /// Wraps an error raised by the visitor callback.
    ///
    /// A boxed [`WalkError`] is unwrapped instead of nested so its kind (and
    /// therefore its recoverability) survives the round trip through the
    /// callback.
    pub(crate) fn callback(path: PathBuf, source: Box<dyn StdError + Send + Sync>) -> Self {
        match source.downcast::<Self>() {
            Ok(error) => *error,
            Err(source) => Self::new(WalkErrorKind::Callback { path, source }),
        }
    }

    pub(crate) fn invalid_rename(path: PathBuf, name: OsString, reason: RenameConflict) -> Self {
        Self::new(WalkErrorKind::InvalidRename { path, name, reason })
    }

    pub(crate) fn unsupported_prune(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::UnsupportedPrune { path })
    }

    pub(crate) fn removed(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::Removed { path })
    }

    pub(crate) fn bad_separator(value: impl Into<String>) -> Self {
        Self::new(WalkErrorKind::BadSeparator {
            value: value.into(),
        })
    }

    pub(crate) fn bad_color_spec(spec: impl Into<String>, reason: &'static str) -> Self {
        Self::new(WalkErrorKind::BadColorSpec {
            spec: spec.into(),
            reason,
        })
    }

    /// Returns the specific failure.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> WalkErrorKind {
        self.kind
    }

    /// Returns the filesystem path associated with the error.
    ///
    /// Configuration errors are not tied to a path and report an empty one.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }

    /// Reports whether the error may be absorbed by an error policy.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

/// Reason an [`Entry::rename`](crate::Entry::rename) request was rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RenameConflict {
    /// The new name contains a separator or is a special component.
    #[error("the new name must be a single path component")]
    NotLeaf,
    /// Something already exists under the new name.
    #[error("the destination already exists")]
    DestinationExists,
}

/// Classification of walker failures.
#[derive(Debug, Error)]
pub enum WalkErrorKind {
    /// A traversal root does not exist.
    #[error("traversal root '{}' not found: {source}", path.display())]
    NotFound {
        /// Root that could not be found.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Listing a directory or opening a file was refused.
    #[error("permission denied for '{}': {source}", path.display())]
    PermissionDenied {
        /// Path that could not be accessed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Listing a directory failed for a reason other than permissions.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Retrieving the status of an entry failed.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A followed symlink resolves to one of its own ancestors.
    #[error(
        "circular recursion in '{}': target is the ancestor '{}'",
        path.display(),
        ancestor.display()
    )]
    CyclicRecursion {
        /// Symlink that closes the loop.
        path: PathBuf,
        /// Ancestor directory the symlink resolves to.
        ancestor: PathBuf,
    },
    /// The visitor callback raised an error of its own.
    #[error("callback failed for '{}': {source}", path.display())]
    Callback {
        /// Entry the callback was visiting.
        path: PathBuf,
        /// Error raised by the callback.
        source: Box<dyn StdError + Send + Sync>,
    },
    /// Reading file contents failed.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Content access was requested for something other than a regular file.
    #[error("'{}' is not a regular file", path.display())]
    NotRegularFile {
        /// Offending entry.
        path: PathBuf,
    },
    /// The file to open is the process's own standard output.
    #[error("refusing to read '{}': it is the standard output of this process", path.display())]
    OutputLoop {
        /// Offending entry.
        path: PathBuf,
    },
    /// A rename request was rejected.
    #[error("cannot rename '{}' to '{}': {reason}", path.display(), name.to_string_lossy())]
    InvalidRename {
        /// Entry to be renamed.
        path: PathBuf,
        /// Requested new name.
        name: OsString,
        /// Why the request was rejected.
        reason: RenameConflict,
    },
    /// The rename itself failed.
    #[error("failed to rename '{}' to '{}': {source}", path.display(), target.display())]
    Rename {
        /// Entry to be renamed.
        path: PathBuf,
        /// Destination path.
        target: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A directory scheduled for removal still has contents.
    #[error("cannot remove '{}': directory not empty", path.display())]
    NonEmptyDirectory {
        /// Directory that could not be removed.
        path: PathBuf,
    },
    /// The removal itself failed.
    #[error("failed to remove '{}': {source}", path.display())]
    Remove {
        /// Entry that could not be removed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// An action was requested on an entry already scheduled for removal.
    #[error("'{}' has been removed", path.display())]
    Removed {
        /// Removed entry.
        path: PathBuf,
    },
    /// Prune was requested while traversing in post-order.
    #[error("cannot prune '{}': descent already happened in post-order traversal", path.display())]
    UnsupportedPrune {
        /// Entry whose callback requested the prune.
        path: PathBuf,
    },
    /// A record separator outside the supported set was configured.
    #[error("invalid field separator '{value}': expected colon, tab, or space")]
    BadSeparator {
        /// Rejected separator.
        value: String,
    },
    /// A color specification could not be parsed.
    #[error("invalid color specification '{spec}': {reason}")]
    BadColorSpec {
        /// Rejected specification.
        spec: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl WalkErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::CyclicRecursion { path, .. }
            | Self::Callback { path, .. }
            | Self::Read { path, .. }
            | Self::NotRegularFile { path }
            | Self::OutputLoop { path }
            | Self::InvalidRename { path, .. }
            | Self::Rename { path, .. }
            | Self::NonEmptyDirectory { path }
            | Self::Remove { path, .. }
            | Self::Removed { path }
            | Self::UnsupportedPrune { path } => path,
            Self::BadSeparator { .. } | Self::BadColorSpec { .. } => Path::new(""),
        }
    }

    /// Reports whether an error policy may absorb this failure.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::PermissionDenied { .. }
                | Self::ReadDir { .. }
                | Self::Metadata { .. }
                | Self::CyclicRecursion { .. }
                | Self::Callback { .. }
                | Self::Read { .. }
                | Self::NotRegularFile { .. }
                | Self::OutputLoop { .. }
        )
    }
}
