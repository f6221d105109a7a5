use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::io;
use std::mem;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use logging::{debug_log, info_log};

use crate::error::{RenameConflict, WalkError, WalkErrorKind};
use crate::mode::{self, FileKind};
use crate::signal::{Signal, VisitResult};
use crate::stat_cache::{FileIdentity, LoopKey, StatCache};

/// Directory names skipped by [`Entry::no_vcs`].
const VCS_DIRS: [&str; 4] = ["CVS", ".svn", ".git", ".hg"];

/// State shared by every entry of a single traversal.
#[derive(Debug)]
pub(crate) struct WalkContext {
    pub(crate) start: SystemTime,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) follow_symlinks: bool,
    pub(crate) output: Option<FileIdentity>,
}

impl WalkContext {
    pub(crate) fn new(follow_symlinks: bool, output: Option<FileIdentity>) -> Self {
        Self {
            start: SystemTime::now(),
            cwd: std::env::current_dir().ok(),
            follow_symlinks,
            output,
        }
    }
}

/// Mutation or control request recorded by the visitor for the current entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PendingAction {
    /// Nothing requested.
    #[default]
    None,
    /// Descendants are skipped.
    Pruned,
    /// The callback finished early.
    Done,
    /// The entry is renamed to the given leaf name once the callback returns.
    Renamed(OsString),
    /// The entry is deleted once the callback returns.
    Removed,
}

/// A filesystem entry visited by the walker.
///
/// An entry borrows its parent, so the chain of ancestors is available for
/// the whole visit while only the current branch is kept alive.
#[derive(Debug)]
pub struct Entry<'a> {
    parent: Option<&'a Entry<'a>>,
    context: &'a WalkContext,
    origin: PathBuf,
    name: OsString,
    path: PathBuf,
    depth: usize,
    count: u64,
    stat: StatCache,
    pending: PendingAction,
}

impl<'a> Entry<'a> {
    pub(crate) fn root(path: &Path, context: &'a WalkContext, metadata: Option<Metadata>) -> Self {
        let (origin, name) = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_os_string()),
            _ => (PathBuf::new(), path.as_os_str().to_os_string()),
        };
        Self {
            parent: None,
            context,
            origin,
            name,
            path: path.to_path_buf(),
            depth: 0,
            count: 0,
            stat: metadata.map_or_else(StatCache::new, StatCache::with_link_status),
            pending: PendingAction::None,
        }
    }

    pub(crate) fn child(parent: &'a Entry<'a>, name: OsString) -> Self {
        Self {
            parent: Some(parent),
            context: parent.context,
            origin: PathBuf::new(),
            path: parent.path.join(&name),
            name,
            depth: parent.depth + 1,
            count: 0,
            stat: StatCache::new(),
            pending: PendingAction::None,
        }
    }

    pub(crate) fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    /// Final path component, or the root exactly as given when it has none.
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Path of the entry: its root joined with every ancestor name.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Distance from the traversal root, which has depth 0.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Ordinal of this entry among all entries visited so far (1-based).
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Time the traversal started.
    #[must_use]
    pub fn start(&self) -> SystemTime {
        self.context.start
    }

    /// The directory this entry was listed from, if it is not a root.
    #[must_use]
    pub const fn parent(&self) -> Option<&'a Entry<'a>> {
        self.parent
    }

    /// Iterates over the ancestors of this entry, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Entry<'a>> + use<'a> {
        std::iter::successors(self.parent, |entry| entry.parent)
    }

    /// Reports whether this entry is a traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Action requested by the visitor so far.
    #[must_use]
    pub const fn pending_action(&self) -> &PendingAction {
        &self.pending
    }

    /// Reports whether the entry has been scheduled for or undergone removal.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.pending == PendingAction::Removed
    }

    /// Absolute path of the entry, resolved against the working directory
    /// captured when the traversal started.
    #[must_use]
    pub fn full_path(&self) -> PathBuf {
        match &self.context.cwd {
            Some(cwd) if self.path.is_relative() => cwd.join(&self.path),
            _ => self.path.clone(),
        }
    }

    /// Path with a trailing separator when it refers to a directory.
    #[must_use]
    pub fn path_with_slash(&self) -> PathBuf {
        self.with_slash(self.path.clone())
    }

    /// [`full_path`](Self::full_path) with a trailing separator for
    /// directories.
    #[must_use]
    pub fn full_path_with_slash(&self) -> PathBuf {
        self.with_slash(self.full_path())
    }

    fn with_slash(&self, path: PathBuf) -> PathBuf {
        let is_dir = self.resolved_status().is_some_and(Metadata::is_dir);
        let bytes = path.as_os_str().as_encoded_bytes();
        if !is_dir || bytes.last().is_some_and(|b| std::path::is_separator(char::from(*b))) {
            return path;
        }
        let mut raw = path.into_os_string();
        raw.push(MAIN_SEPARATOR_STR);
        PathBuf::from(raw)
    }

    /// Name of the directory containing the entry.
    #[must_use]
    pub fn dirname(&self) -> Option<OsString> {
        self.full_path()
            .parent()
            .and_then(Path::file_name)
            .map(OsStr::to_os_string)
    }

    /// Extension of the name, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> Option<&OsStr> {
        Path::new(&self.name).extension()
    }

    /// Name without its extension.
    #[must_use]
    pub fn stem(&self) -> &OsStr {
        Path::new(&self.name)
            .file_stem()
            .unwrap_or(self.name.as_os_str())
    }

    /// Reports whether the name starts with a dot.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().first() == Some(&b'.')
    }

    /// Negation of [`is_hidden`](Self::is_hidden).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.is_hidden()
    }

    /// Status of the entry without following a final symlink, cached after
    /// the first call.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::Metadata`] when the entry cannot be inspected.
    pub fn link_status(&self) -> Result<&Metadata, WalkError> {
        self.stat.link_status(&self.path).map_err(|error| {
            debug_log!(Stat, 1, "lstat failed for {}: {}", self.path.display(), error);
            WalkError::metadata(self.path.clone(), error)
        })
    }

    /// Status of the file the entry refers to; `None` for dangling symlinks.
    #[must_use]
    pub fn resolved_status(&self) -> Option<&Metadata> {
        self.stat.resolved_status(&self.path)
    }

    /// Device and inode of the file the entry refers to.
    #[must_use]
    pub fn identity(&self) -> Option<FileIdentity> {
        self.resolved_status().and_then(FileIdentity::from_metadata)
    }

    pub(crate) fn loop_key(&self) -> Option<LoopKey> {
        self.resolved_status()
            .and_then(|metadata| LoopKey::of(&self.path, metadata))
    }

    /// Full mode bits, or `None` when the status is unavailable.
    #[must_use]
    pub fn mode(&self) -> Option<u32> {
        self.link_status().ok().map(mode::mode_of)
    }

    /// File type decoded from [`mode`](Self::mode).
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.mode().map_or(FileKind::Unknown, FileKind::from_mode)
    }

    /// Permission string such as `rwxr-xr-x`.
    #[must_use]
    pub fn permissions_string(&self) -> Option<String> {
        self.mode().map(mode::permissions_string)
    }

    /// Type letter used by long listings; `#` when the status is unavailable.
    #[must_use]
    pub fn type_letter(&self) -> char {
        self.mode()
            .map_or('#', |mode| FileKind::from_mode(mode).letter())
    }

    /// Suffix appended to the name in classified listings; `*` marks
    /// executables.
    #[must_use]
    pub fn type_suffix(&self) -> &'static str {
        if self.is_executable() {
            "*"
        } else {
            self.kind().suffix()
        }
    }

    /// Size in bytes from the link status.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.link_status().ok().map(Metadata::len)
    }

    /// Size in bytes for regular files only.
    #[must_use]
    pub fn file_size(&self) -> Option<u64> {
        self.link_status()
            .ok()
            .filter(|metadata| metadata.is_file())
            .map(Metadata::len)
    }

    /// Reports whether the entry itself is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.link_status().is_ok_and(Metadata::is_dir)
    }

    /// Reports whether the entry itself is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.link_status().is_ok_and(Metadata::is_file)
    }

    /// Reports whether the entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.link_status().is_ok_and(Metadata::is_symlink)
    }

    /// Reports whether the entry is a named pipe.
    #[must_use]
    pub fn is_pipe(&self) -> bool {
        self.kind() == FileKind::Fifo
    }

    /// Reports whether the entry is a socket.
    #[must_use]
    pub fn is_socket(&self) -> bool {
        self.kind() == FileKind::Socket
    }

    /// Reports whether the entry is a regular file with any execute bit set.
    #[must_use]
    pub fn is_executable(&self) -> bool {
        self.is_file() && self.mode().is_some_and(|mode| mode & 0o111 != 0)
    }

    /// Reports whether the entry is a symlink whose target does not exist.
    #[must_use]
    pub fn is_broken_link(&self) -> bool {
        self.is_symlink() && self.resolved_status().is_none()
    }

    /// Reports whether the walker treats the entry as a directory to descend
    /// into.
    pub(crate) fn is_dir_like(&self) -> bool {
        match self.link_status() {
            Ok(metadata) if metadata.is_dir() => true,
            Ok(metadata) if metadata.is_symlink() => {
                self.context.follow_symlinks && self.resolved_status().is_some_and(Metadata::is_dir)
            }
            _ => false,
        }
    }

    /// Numeric owner.
    #[cfg(unix)]
    #[must_use]
    pub fn uid(&self) -> Option<u32> {
        use std::os::unix::fs::MetadataExt;

        self.link_status().ok().map(MetadataExt::uid)
    }

    /// Numeric group.
    #[cfg(unix)]
    #[must_use]
    pub fn gid(&self) -> Option<u32> {
        use std::os::unix::fs::MetadataExt;

        self.link_status().ok().map(MetadataExt::gid)
    }

    /// Owner name, falling back to the numeric id when it has no name.
    #[cfg(unix)]
    #[must_use]
    pub fn owner(&self) -> Option<String> {
        let uid = self.uid()?;
        Some(uzers::get_user_by_uid(uid).map_or_else(
            || uid.to_string(),
            |user| user.name().to_string_lossy().into_owned(),
        ))
    }

    /// Group name, falling back to the numeric id when it has no name.
    #[cfg(unix)]
    #[must_use]
    pub fn group(&self) -> Option<String> {
        let gid = self.gid()?;
        Some(uzers::get_group_by_gid(gid).map_or_else(
            || gid.to_string(),
            |group| group.name().to_string_lossy().into_owned(),
        ))
    }

    /// Target of a symbolic link.
    #[must_use]
    pub fn readlink(&self) -> Option<PathBuf> {
        if self.is_symlink() {
            fs::read_link(&self.path).ok()
        } else {
            None
        }
    }

    /// ` -> target` for symlinks, as printed by long listings.
    #[must_use]
    pub fn arrow(&self) -> Option<String> {
        self.readlink()
            .map(|target| format!(" -> {}", target.display()))
    }

    /// Reports whether a directory has an entry called `name`.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<Path>) -> bool {
        fs::symlink_metadata(self.path.join(name)).is_ok()
    }

    /// Names of the directory's entries, unsorted.
    ///
    /// # Errors
    ///
    /// Fails when the entry is not a directory or cannot be listed.
    pub fn entries(&self) -> Result<Vec<OsString>, WalkError> {
        read_names(&self.path)
    }

    /// Paths of the directory's entries, unsorted.
    ///
    /// # Errors
    ///
    /// Fails when the entry is not a directory or cannot be listed.
    pub fn children(&self) -> Result<Vec<PathBuf>, WalkError> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|name| self.path.join(name))
            .collect())
    }

    /// Reports whether a directory has no entries.
    ///
    /// # Errors
    ///
    /// Fails when the entry is not a directory or cannot be listed.
    pub fn is_empty_dir(&self) -> Result<bool, WalkError> {
        let mut listing = fs::read_dir(&self.path)
            .map_err(|error| WalkError::read_dir(self.path.clone(), error))?;
        Ok(listing.next().is_none())
    }

    /// Last modification time.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn modified(&self) -> Result<SystemTime, WalkError> {
        self.timestamp(Metadata::modified)
    }

    /// Last access time.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn accessed(&self) -> Result<SystemTime, WalkError> {
        self.timestamp(Metadata::accessed)
    }

    /// Last status change time. Platforms without one report the
    /// modification time.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn changed(&self) -> Result<SystemTime, WalkError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            let metadata = self.link_status()?;
            let secs = metadata.ctime();
            let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
            let offset = Duration::new(secs.unsigned_abs(), nanos);
            Ok(if secs >= 0 {
                UNIX_EPOCH + offset
            } else {
                UNIX_EPOCH - offset
            })
        }
        #[cfg(not(unix))]
        {
            self.modified()
        }
    }

    fn timestamp(
        &self,
        field: impl FnOnce(&Metadata) -> io::Result<SystemTime>,
    ) -> Result<SystemTime, WalkError> {
        field(self.link_status()?).map_err(|error| WalkError::metadata(self.path.clone(), error))
    }

    /// Seconds between the last modification and the start of the traversal.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn age(&self) -> Result<f64, WalkError> {
        self.modified().map(|time| self.seconds_before_start(time))
    }

    /// Seconds between the last access and the start of the traversal.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn age_access(&self) -> Result<f64, WalkError> {
        self.accessed().map(|time| self.seconds_before_start(time))
    }

    /// Same as [`age`](Self::age).
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn age_modify(&self) -> Result<f64, WalkError> {
        self.age()
    }

    /// Seconds between the last status change and the start of the traversal.
    ///
    /// # Errors
    ///
    /// Fails when the status or the timestamp is unavailable.
    pub fn age_change(&self) -> Result<f64, WalkError> {
        self.changed().map(|time| self.seconds_before_start(time))
    }

    fn seconds_before_start(&self, time: SystemTime) -> f64 {
        match self.context.start.duration_since(time) {
            Ok(elapsed) => elapsed.as_secs_f64(),
            Err(ahead) => -ahead.duration().as_secs_f64(),
        }
    }

    pub(crate) fn output_identity(&self) -> Option<FileIdentity> {
        self.context.output
    }

    fn record(&mut self, action: PendingAction) {
        if self.pending == PendingAction::None {
            self.pending = action;
        }
    }

    /// Skips the descendants of this directory.
    ///
    /// Meant to be used as `entry.prune()?` inside a visitor. Pruning is only
    /// meaningful in pre-order traversal; in post-order the walker reports
    /// [`WalkErrorKind::UnsupportedPrune`].
    ///
    /// # Errors
    ///
    /// Always returns [`Signal::Prune`].
    pub fn prune(&mut self) -> VisitResult {
        self.record(PendingAction::Pruned);
        Err(Signal::Prune)
    }

    /// Ends the callback for this entry without affecting descent.
    ///
    /// # Errors
    ///
    /// Always returns [`Signal::Done`].
    pub fn done(&mut self) -> VisitResult {
        self.record(PendingAction::Done);
        Err(Signal::Done)
    }

    /// Prunes version control metadata directories.
    ///
    /// # Errors
    ///
    /// Returns [`Signal::Prune`] when the entry is one.
    pub fn no_vcs(&mut self) -> VisitResult {
        let is_vcs = self
            .name
            .to_str()
            .is_some_and(|name| VCS_DIRS.contains(&name));
        if is_vcs {
            debug_log!(Walk, 2, "pruning version control directory {}", self.path.display());
            return self.prune();
        }
        Ok(())
    }

    /// Schedules a rename of this entry to `new_name` within its directory.
    ///
    /// The rename happens once the callback returns; in pre-order traversal
    /// descent then continues under the new name.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::Removed`] when the entry is scheduled for
    /// removal.
    pub fn rename(&mut self, new_name: impl Into<OsString>) -> Result<(), WalkError> {
        if self.is_removed() {
            return Err(WalkError::removed(self.path.clone()));
        }
        self.pending = PendingAction::Renamed(new_name.into());
        Ok(())
    }

    /// Schedules removal of this entry once the callback returns.
    ///
    /// Directories must be empty by then; descent into a removed entry is
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::Removed`] when the entry is already scheduled
    /// for removal.
    pub fn remove(&mut self) -> Result<(), WalkError> {
        if self.is_removed() {
            return Err(WalkError::removed(self.path.clone()));
        }
        self.pending = PendingAction::Removed;
        Ok(())
    }

    /// Performs the pending rename or removal. Returns `false` when the entry
    /// no longer exists.
    pub(crate) fn apply_pending(&mut self) -> Result<bool, WalkError> {
        match mem::take(&mut self.pending) {
            PendingAction::Renamed(new_name) => {
                self.perform_rename(new_name)?;
                Ok(true)
            }
            PendingAction::Removed => {
                self.perform_remove()?;
                self.pending = PendingAction::Removed;
                Ok(false)
            }
            other => {
                self.pending = other;
                Ok(true)
            }
        }
    }

    fn sibling_path(&self, name: &OsStr) -> PathBuf {
        match self.parent {
            Some(parent) => parent.path.join(name),
            None => self.origin.join(name),
        }
    }

    fn perform_rename(&mut self, new_name: OsString) -> Result<(), WalkError> {
        let mut components = Path::new(&new_name).components();
        let is_leaf = matches!(
            components.next(),
            Some(Component::Normal(leaf)) if leaf == new_name.as_os_str()
        ) && components.next().is_none();
        if !is_leaf {
            return Err(WalkError::invalid_rename(
                self.path.clone(),
                new_name,
                RenameConflict::NotLeaf,
            ));
        }

        let target = self.sibling_path(&new_name);
        if fs::symlink_metadata(&target).is_ok() {
            return Err(WalkError::invalid_rename(
                self.path.clone(),
                new_name,
                RenameConflict::DestinationExists,
            ));
        }
        fs::rename(&self.path, &target).map_err(|source| {
            WalkError::new(WalkErrorKind::Rename {
                path: self.path.clone(),
                target: target.clone(),
                source,
            })
        })?;

        info_log!(Mutate, 1, "renamed {} -> {}", self.path.display(), target.display());
        self.name = new_name;
        self.path = target;
        self.stat.invalidate();
        Ok(())
    }

    fn perform_remove(&mut self) -> Result<(), WalkError> {
        let is_dir = fs::symlink_metadata(&self.path)
            .map_err(|source| {
                WalkError::new(WalkErrorKind::Remove {
                    path: self.path.clone(),
                    source,
                })
            })?
            .is_dir();

        let outcome = if is_dir {
            fs::remove_dir(&self.path)
        } else {
            fs::remove_file(&self.path)
        };
        outcome.map_err(|source| {
            let path = self.path.clone();
            if source.kind() == io::ErrorKind::DirectoryNotEmpty {
                WalkError::new(WalkErrorKind::NonEmptyDirectory { path })
            } else {
                WalkError::new(WalkErrorKind::Remove { path, source })
            }
        })?;

        info_log!(Mutate, 1, "removed {}", self.path.display());
        self.stat.invalidate();
        Ok(())
    }
}

pub(crate) fn read_names(path: &Path) -> Result<Vec<OsString>, WalkError> {
    let listing = fs::read_dir(path).map_err(|error| WalkError::read_dir(path.to_path_buf(), error))?;
    listing
        .map(|item| {
            item.map(|dir_entry| dir_entry.file_name())
                .map_err(|error| WalkError::read_dir(path.to_path_buf(), error))
        })
        .collect()
}
