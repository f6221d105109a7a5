//! Helpers interpreting POSIX mode bits.

use std::fs::Metadata;

const S_IFMT: u32 = 0o170_000;
const S_IFIFO: u32 = 0o010_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFREG: u32 = 0o100_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFWHT: u32 = 0o160_000;

/// File type encoded in the upper bits of a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Named pipe.
    Fifo,
    /// Character device.
    CharDevice,
    /// Directory.
    Directory,
    /// Block device.
    BlockDevice,
    /// Regular file.
    Regular,
    /// Symbolic link.
    Symlink,
    /// Socket.
    Socket,
    /// BSD whiteout entry.
    Whiteout,
    /// Anything the mode does not describe.
    Unknown,
}

impl FileKind {
    /// Decodes the file type bits of `mode`.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFIFO => Self::Fifo,
            S_IFCHR => Self::CharDevice,
            S_IFDIR => Self::Directory,
            S_IFBLK => Self::BlockDevice,
            S_IFREG => Self::Regular,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            S_IFWHT => Self::Whiteout,
            _ => Self::Unknown,
        }
    }

    /// Single letter used in long listings (`-` for regular files).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Fifo => 'p',
            Self::CharDevice => 'c',
            Self::Directory => 'd',
            Self::BlockDevice => 'b',
            Self::Regular => '-',
            Self::Symlink => 'l',
            Self::Socket => 's',
            Self::Whiteout => 'w',
            Self::Unknown => '?',
        }
    }

    /// Suffix appended to names in classified listings.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Fifo => "|",
            Self::Directory => "/",
            Self::Symlink => "@",
            Self::Socket => "=",
            Self::Whiteout => "%",
            _ => "",
        }
    }
}

/// Returns the full mode of `metadata`, synthesising one where the platform
/// has no POSIX permissions.
#[cfg(unix)]
#[must_use]
pub fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;

    metadata.mode()
}

/// Returns the full mode of `metadata`, synthesising one where the platform
/// has no POSIX permissions.
#[cfg(not(unix))]
#[must_use]
pub fn mode_of(metadata: &Metadata) -> u32 {
    let file_type = metadata.file_type();
    let readonly = metadata.permissions().readonly();
    if file_type.is_symlink() {
        S_IFLNK | 0o777
    } else if file_type.is_dir() {
        S_IFDIR | if readonly { 0o555 } else { 0o755 }
    } else {
        S_IFREG | if readonly { 0o444 } else { 0o644 }
    }
}

/// Renders the nine permission characters of `mode` as `ls -l` does,
/// including setuid, setgid and sticky markers.
#[must_use]
pub fn permissions_string(mode: u32) -> String {
    const TRIPLES: [(u32, u32, char); 3] = [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')];

    let mut out = String::with_capacity(9);
    for (shift, special, marker) in TRIPLES {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => marker,
            (true, false) => marker.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}
