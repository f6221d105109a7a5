//! `ls`-style coloring of entry names.
//!
//! A [`ColorTable`] holds one SGR code per [`ColorCategory`]. Tables are
//! built from the compact pair format (`xxHbex...`, one foreground and one
//! background letter per category) or from GNU `LS_COLORS` assignments.

use std::env;

use crate::entry::Entry;
use crate::error::WalkError;
use crate::mode::FileKind;

/// Pairs used when no color specification is configured.
pub const DEFAULT_PAIRS: &str = "xxHbexfxcxdxbxegedabagacadAxAx";

/// Environment variables consulted by [`ColorSources::from_env`].
pub const PRIMARY_ENV: [&str; 2] = ["RFIND_COLORS", "RFIND_COLOURS"];
/// GNU `ls` color variable.
pub const GNU_ENV: &str = "LS_COLORS";
/// BSD `ls` color variable.
pub const VENDOR_ENV: &str = "LSCOLORS";

/// Categories an entry is painted by, in pair-string order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    /// Regular file.
    Regular,
    /// Symlink whose target is missing, or an entry without status.
    BrokenLink,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Socket.
    Socket,
    /// Named pipe.
    Pipe,
    /// Regular file with an execute bit.
    Executable,
    /// Block device.
    BlockDevice,
    /// Character device.
    CharDevice,
    /// Executable with the setuid bit.
    SetuidExecutable,
    /// Executable with the setgid bit.
    SetgidExecutable,
    /// Other-writable directory with the sticky bit.
    OtherWritableSticky,
    /// Other-writable directory without the sticky bit.
    OtherWritable,
    /// BSD whiteout.
    Whiteout,
    /// Anything else.
    Unknown,
}

impl ColorCategory {
    /// Number of categories.
    pub const COUNT: usize = 15;

    /// All categories, in pair-string order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Regular,
        Self::BrokenLink,
        Self::Directory,
        Self::Symlink,
        Self::Socket,
        Self::Pipe,
        Self::Executable,
        Self::BlockDevice,
        Self::CharDevice,
        Self::SetuidExecutable,
        Self::SetgidExecutable,
        Self::OtherWritableSticky,
        Self::OtherWritable,
        Self::Whiteout,
        Self::Unknown,
    ];

    /// Position of the category in a pair string.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Classifies an entry by its mode; `None` means no status is available.
    #[must_use]
    pub const fn from_mode(mode: Option<u32>) -> Self {
        let Some(mode) = mode else {
            return Self::BrokenLink;
        };
        match FileKind::from_mode(mode) {
            FileKind::Fifo => Self::Pipe,
            FileKind::CharDevice => Self::CharDevice,
            FileKind::Directory => {
                if mode & 0o002 == 0 {
                    Self::Directory
                } else if mode & 0o1000 != 0 {
                    Self::OtherWritableSticky
                } else {
                    Self::OtherWritable
                }
            }
            FileKind::BlockDevice => Self::BlockDevice,
            FileKind::Regular => {
                if mode & 0o111 == 0 {
                    Self::Regular
                } else if mode & 0o4000 != 0 {
                    Self::SetuidExecutable
                } else if mode & 0o2000 != 0 {
                    Self::SetgidExecutable
                } else {
                    Self::Executable
                }
            }
            FileKind::Symlink => Self::Symlink,
            FileKind::Socket => Self::Socket,
            FileKind::Whiteout => Self::Whiteout,
            FileKind::Unknown => Self::Unknown,
        }
    }

    const fn gnu_key(key: &str) -> Option<Self> {
        Some(match key.as_bytes() {
            b"fi" => Self::Regular,
            b"or" => Self::BrokenLink,
            b"di" => Self::Directory,
            b"ln" => Self::Symlink,
            b"so" => Self::Socket,
            b"pi" => Self::Pipe,
            b"ex" => Self::Executable,
            b"bd" => Self::BlockDevice,
            b"cd" => Self::CharDevice,
            b"su" => Self::SetuidExecutable,
            b"sg" => Self::SetgidExecutable,
            b"tw" => Self::OtherWritableSticky,
            b"ow" => Self::OtherWritable,
            b"wh" => Self::Whiteout,
            _ => return None,
        })
    }
}

/// SGR code per category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    codes: [String; ColorCategory::COUNT],
}

impl Default for ColorTable {
    fn default() -> Self {
        let mut table = Self {
            codes: Default::default(),
        };
        // The built-in pair string is well formed.
        let _ = table.apply_pairs(DEFAULT_PAIRS, 0);
        table
    }
}

fn color_offset(letter: u8) -> Option<u8> {
    match letter.to_ascii_lowercase() {
        c @ b'a'..=b'h' => Some(c - b'a'),
        _ => None,
    }
}

fn pair_code(spec: &str, fg: u8, bg: u8) -> Result<String, WalkError> {
    let valid = |letter: u8| letter.eq_ignore_ascii_case(&b'x') || color_offset(letter).is_some();
    if !valid(fg) || !valid(bg) {
        return Err(WalkError::bad_color_spec(spec, "colors must be letters a-h or x"));
    }
    let mut parts = Vec::with_capacity(3);
    if let Some(offset) = color_offset(fg) {
        parts.push((30 + offset).to_string());
    }
    if fg.is_ascii_uppercase() {
        parts.push("1".to_owned());
    }
    if let Some(offset) = color_offset(bg) {
        parts.push((40 + offset).to_string());
    }
    Ok(parts.join(";"))
}

fn is_sgr_code(code: &str) -> bool {
    code.split(';')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

impl ColorTable {
    /// Parses a pair string on top of the default table.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::BadColorSpec`](crate::WalkErrorKind::BadColorSpec)
    /// for odd lengths, too many pairs, or letters outside `a-h`/`x`.
    pub fn from_pairs(spec: &str) -> Result<Self, WalkError> {
        let mut table = Self::default();
        table.apply_pairs(spec, 0)?;
        Ok(table)
    }

    /// Parses GNU `key=code` assignments on top of the default table.
    /// Extension patterns (`*.tar=...`) and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::BadColorSpec`](crate::WalkErrorKind::BadColorSpec)
    /// for assignments without `=` or codes that are not `digits(;digits)*`.
    pub fn from_gnu(spec: &str) -> Result<Self, WalkError> {
        let mut table = Self::default();
        table.apply_gnu(spec)?;
        Ok(table)
    }

    /// Parses either format, telling them apart by the presence of `=`.
    ///
    /// # Errors
    ///
    /// See [`from_pairs`](Self::from_pairs) and [`from_gnu`](Self::from_gnu).
    pub fn parse(spec: &str) -> Result<Self, WalkError> {
        if spec.contains('=') {
            Self::from_gnu(spec)
        } else {
            Self::from_pairs(spec)
        }
    }

    fn apply_pairs(&mut self, spec: &str, first: usize) -> Result<(), WalkError> {
        let bytes = spec.as_bytes();
        if bytes.len() % 2 != 0 {
            return Err(WalkError::bad_color_spec(spec, "pair string has odd length"));
        }
        if first + bytes.len() / 2 > ColorCategory::COUNT {
            return Err(WalkError::bad_color_spec(spec, "too many color pairs"));
        }
        for (slot, pair) in self.codes[first..].iter_mut().zip(bytes.chunks_exact(2)) {
            *slot = pair_code(spec, pair[0], pair[1])?;
        }
        Ok(())
    }

    fn apply_gnu(&mut self, spec: &str) -> Result<(), WalkError> {
        for assignment in spec.split(':').filter(|part| !part.is_empty()) {
            let Some((key, code)) = assignment.split_once('=') else {
                return Err(WalkError::bad_color_spec(spec, "assignment without '='"));
            };
            if !code.is_empty() && !is_sgr_code(code) {
                return Err(WalkError::bad_color_spec(spec, "codes must be digits separated by ';'"));
            }
            if let Some(category) = ColorCategory::gnu_key(key) {
                self.codes[category.index()] = code.to_owned();
            }
        }
        Ok(())
    }

    /// SGR code of `category`; empty means uncolored.
    #[must_use]
    pub fn code(&self, category: ColorCategory) -> &str {
        &self.codes[category.index()]
    }

    /// Wraps `text` in the escape sequence for `category`.
    #[must_use]
    pub fn paint(&self, category: ColorCategory, text: &str) -> String {
        let code = self.code(category);
        if code.is_empty() {
            text.to_owned()
        } else {
            format!("\x1b[{code}m{text}\x1b[m")
        }
    }

    /// Paints `text` according to the category of `entry`.
    #[must_use]
    pub fn paint_entry(&self, entry: &Entry<'_>, text: &str) -> String {
        self.paint(entry.color_category(), text)
    }
}

/// Color specifications in priority order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorSources {
    /// Explicitly configured specification, in either format.
    pub explicit: Option<String>,
    /// Program specific variable, in either format.
    pub primary: Option<String>,
    /// GNU `LS_COLORS`.
    pub gnu: Option<String>,
    /// BSD `LSCOLORS`, overriding the directory through other-writable pairs.
    pub vendor: Option<String>,
}

impl ColorSources {
    /// Collects sources from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Collects sources through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            explicit: None,
            primary: PRIMARY_ENV.iter().find_map(|name| non_empty(name)),
            gnu: non_empty(GNU_ENV),
            vendor: non_empty(VENDOR_ENV),
        }
    }

    /// Sets the explicit specification.
    #[must_use]
    pub fn with_explicit(mut self, spec: impl Into<String>) -> Self {
        self.explicit = Some(spec.into());
        self
    }

    /// Builds the table from the highest-priority source present.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::BadColorSpec`](crate::WalkErrorKind::BadColorSpec)
    /// when the chosen source is malformed.
    pub fn resolve(&self) -> Result<ColorTable, WalkError> {
        if let Some(spec) = self.explicit.as_deref().or(self.primary.as_deref()) {
            return ColorTable::parse(spec);
        }
        if let Some(spec) = &self.gnu {
            return ColorTable::from_gnu(spec);
        }
        let mut table = ColorTable::default();
        if let Some(spec) = &self.vendor {
            if spec.len() / 2 > ColorCategory::OtherWritable.index() - 1 {
                return Err(WalkError::bad_color_spec(spec.as_str(), "too many color pairs"));
            }
            table.apply_pairs(spec, ColorCategory::Directory.index())?;
        }
        Ok(table)
    }
}

impl Entry<'_> {
    /// Color category of the entry. Symlinks whose target cannot be
    /// resolved are [`ColorCategory::BrokenLink`].
    #[must_use]
    pub fn color_category(&self) -> ColorCategory {
        if self.is_broken_link() {
            ColorCategory::BrokenLink
        } else {
            ColorCategory::from_mode(self.mode())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalkErrorKind;

    #[test]
    fn default_table_matches_builtin_pairs() {
        let table = ColorTable::default();
        assert_eq!(table.code(ColorCategory::Regular), "");
        assert_eq!(table.code(ColorCategory::BrokenLink), "37;1;41");
        assert_eq!(table.code(ColorCategory::Directory), "34");
        assert_eq!(table.code(ColorCategory::Symlink), "35");
        assert_eq!(table.code(ColorCategory::Executable), "31");
        assert_eq!(table.code(ColorCategory::BlockDevice), "34;46");
        assert_eq!(table.code(ColorCategory::Whiteout), "30;1");
        assert_eq!(table.code(ColorCategory::Unknown), "30;1");
    }

    #[test]
    fn classifies_modes() {
        assert_eq!(ColorCategory::from_mode(None), ColorCategory::BrokenLink);
        assert_eq!(ColorCategory::from_mode(Some(0o100_644)), ColorCategory::Regular);
        assert_eq!(ColorCategory::from_mode(Some(0o100_755)), ColorCategory::Executable);
        assert_eq!(
            ColorCategory::from_mode(Some(0o104_755)),
            ColorCategory::SetuidExecutable
        );
        assert_eq!(
            ColorCategory::from_mode(Some(0o102_755)),
            ColorCategory::SetgidExecutable
        );
        assert_eq!(ColorCategory::from_mode(Some(0o040_755)), ColorCategory::Directory);
        assert_eq!(
            ColorCategory::from_mode(Some(0o041_777)),
            ColorCategory::OtherWritableSticky
        );
        assert_eq!(ColorCategory::from_mode(Some(0o040_777)), ColorCategory::OtherWritable);
        assert_eq!(ColorCategory::from_mode(Some(0o120_777)), ColorCategory::Symlink);
        assert_eq!(ColorCategory::from_mode(Some(0o010_644)), ColorCategory::Pipe);
        assert_eq!(ColorCategory::from_mode(Some(0o140_755)), ColorCategory::Socket);
        assert_eq!(ColorCategory::from_mode(Some(0o060_660)), ColorCategory::BlockDevice);
        assert_eq!(ColorCategory::from_mode(Some(0o020_660)), ColorCategory::CharDevice);
    }

    #[test]
    fn pairs_translate_to_sgr_codes() {
        let table = ColorTable::from_pairs("xxHbAx").expect("valid pairs");
        assert_eq!(table.code(ColorCategory::Regular), "");
        assert_eq!(table.code(ColorCategory::BrokenLink), "37;1;41");
        assert_eq!(table.code(ColorCategory::Directory), "30;1");
        // Categories beyond the given pairs keep their defaults.
        assert_eq!(table.code(ColorCategory::Symlink), "35");
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        let too_long = "xx".repeat(16);
        for spec in ["xxH", "zzxx", too_long.as_str()] {
            let error = ColorTable::from_pairs(spec).expect_err(spec);
            assert!(matches!(error.kind(), WalkErrorKind::BadColorSpec { .. }), "{spec}");
        }
    }

    #[test]
    fn gnu_assignments_override_defaults() {
        let table = ColorTable::from_gnu("di=01;34:ln=01;36:*.tar=01;31:zz=5").expect("valid");
        assert_eq!(table.code(ColorCategory::Directory), "01;34");
        assert_eq!(table.code(ColorCategory::Symlink), "01;36");
        assert_eq!(table.code(ColorCategory::Socket), "32");
    }

    #[test]
    fn malformed_gnu_assignments_are_rejected() {
        for spec in ["di", "di=bold", "di=1;;4"] {
            let error = ColorTable::from_gnu(spec).expect_err(spec);
            assert!(matches!(error.kind(), WalkErrorKind::BadColorSpec { .. }), "{spec}");
        }
    }

    #[test]
    fn parse_detects_format() {
        assert_eq!(
            ColorTable::parse("di=1").expect("gnu").code(ColorCategory::Directory),
            "1"
        );
        assert_eq!(
            ColorTable::parse("xxxxbx").expect("pairs").code(ColorCategory::Directory),
            "31"
        );
    }

    #[test]
    fn sources_follow_priority() {
        let lookup = |name: &str| match name {
            "RFIND_COLOURS" => Some("xxxxgx".to_owned()),
            "LS_COLORS" => Some("di=1".to_owned()),
            _ => None,
        };
        let sources = ColorSources::from_lookup(lookup);
        assert_eq!(sources.resolve().expect("table").code(ColorCategory::Directory), "36");

        let explicit = sources.clone().with_explicit("di=4");
        assert_eq!(explicit.resolve().expect("table").code(ColorCategory::Directory), "4");

        let gnu_only = ColorSources {
            primary: None,
            ..sources
        };
        assert_eq!(gnu_only.resolve().expect("table").code(ColorCategory::Directory), "1");
    }

    #[test]
    fn vendor_pairs_start_at_directory() {
        let sources = ColorSources {
            vendor: Some("gxfx".to_owned()),
            ..ColorSources::default()
        };
        let table = sources.resolve().expect("table");
        assert_eq!(table.code(ColorCategory::Regular), "");
        assert_eq!(table.code(ColorCategory::Directory), "36");
        assert_eq!(table.code(ColorCategory::Symlink), "35");
        assert_eq!(table.code(ColorCategory::Socket), "32");
    }

    #[test]
    fn paint_wraps_only_colored_categories() {
        let table = ColorTable::default();
        assert_eq!(table.paint(ColorCategory::Regular, "a.txt"), "a.txt");
        assert_eq!(table.paint(ColorCategory::Directory, "src"), "\x1b[34msrc\x1b[m");
    }
}
