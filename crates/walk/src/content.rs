//! Reading the contents of regular files during a visit.

use std::fs::{File, Metadata};
use std::io::{BufRead, BufReader, Read};
use std::ops::Range;

use logging::debug_log;
use regex::Regex;

use crate::entry::Entry;
use crate::error::{WalkError, WalkErrorKind};
use crate::stat_cache::FileIdentity;

/// Block size used when the filesystem does not report a preferred one.
pub const FALLBACK_BLOCK_SIZE: u64 = 512;

const VIM_SWAP_MAGIC: &[u8] = b"b0VIM";

/// A line matching a [`Entry::grep`] pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrepMatch {
    /// 1-based line number.
    pub line_number: usize,
    /// Line contents without the line terminator.
    pub line: String,
    /// Byte range of the first match within `line`.
    pub range: Range<usize>,
}

impl GrepMatch {
    /// Returns the line with the matched text wrapped in the SGR `code`.
    #[must_use]
    pub fn highlighted(&self, code: &str) -> String {
        let Range { start, end } = self.range.clone();
        format!(
            "{}\x1b[{code}m{}\x1b[m{}",
            &self.line[..start],
            &self.line[start..end],
            &self.line[end..]
        )
    }
}

fn preferred_block_size(metadata: &Metadata) -> u64 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        match metadata.blksize() {
            0 => FALLBACK_BLOCK_SIZE,
            size => size,
        }
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        FALLBACK_BLOCK_SIZE
    }
}

/// Reports whether `name` looks like a Vim swap file (`.name.swp`, `.swo`,
/// ...).
fn has_vimswap_name(name: &[u8]) -> bool {
    let Some(split) = name.len().checked_sub(4) else {
        return false;
    };
    let (prefix, suffix) = name.split_at(split);
    let suffix_ok = suffix[0] == b'.'
        && suffix[1].eq_ignore_ascii_case(&b's')
        && suffix[2].eq_ignore_ascii_case(&b'w')
        && suffix[3].is_ascii_alphabetic();
    let prefix_ok = prefix.is_empty() || (prefix[0] == b'.' && prefix.len() > 1);
    suffix_ok && prefix_ok
}

impl Entry<'_> {
    /// Opens the file for reading.
    ///
    /// # Errors
    ///
    /// - [`WalkErrorKind::NotRegularFile`] when the entry does not resolve to
    ///   a regular file.
    /// - [`WalkErrorKind::OutputLoop`] when the file is this process's
    ///   standard output.
    /// - [`WalkErrorKind::PermissionDenied`] or [`WalkErrorKind::Read`] when
    ///   opening fails.
    pub fn open(&self) -> Result<File, WalkError> {
        let Some(metadata) = self.resolved_status().filter(|metadata| metadata.is_file()) else {
            return Err(WalkError::new(WalkErrorKind::NotRegularFile {
                path: self.path().to_path_buf(),
            }));
        };
        if let Some(output) = self.output_identity() {
            if FileIdentity::from_metadata(metadata) == Some(output) {
                debug_log!(Content, 1, "refusing to read standard output {}", self.path().display());
                return Err(WalkError::new(WalkErrorKind::OutputLoop {
                    path: self.path().to_path_buf(),
                }));
            }
        }
        File::open(self.path()).map_err(|error| WalkError::open(self.path().to_path_buf(), error))
    }

    /// Reads the first `limit` bytes, or the whole file for `None`.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open); reading failures map to
    /// [`WalkErrorKind::Read`].
    pub fn read(&self, limit: Option<u64>) -> Result<Vec<u8>, WalkError> {
        let file = self.open()?;
        let mut buffer = Vec::new();
        let outcome = match limit {
            Some(limit) => file.take(limit).read_to_end(&mut buffer),
            None => BufReader::new(file).read_to_end(&mut buffer),
        };
        outcome.map_err(|error| WalkError::read(self.path().to_path_buf(), error))?;
        Ok(buffer)
    }

    /// Calls `visit` with every line and its 1-based number. Line terminators
    /// are stripped and invalid UTF-8 is replaced. Returns the number of
    /// lines.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open); reading failures map to
    /// [`WalkErrorKind::Read`].
    pub fn for_each_line<F>(&self, mut visit: F) -> Result<usize, WalkError>
    where
        F: FnMut(&str, usize),
    {
        let mut reader = BufReader::new(self.open()?);
        let mut raw = Vec::new();
        let mut number = 0;
        loop {
            raw.clear();
            let read = reader
                .read_until(b'\n', &mut raw)
                .map_err(|error| WalkError::read(self.path().to_path_buf(), error))?;
            if read == 0 {
                break;
            }
            if raw.last() == Some(&b'\n') {
                raw.pop();
            }
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            number += 1;
            visit(&String::from_utf8_lossy(&raw), number);
        }
        Ok(number)
    }

    /// Returns every line matching `pattern`.
    ///
    /// # Errors
    ///
    /// See [`for_each_line`](Self::for_each_line).
    pub fn grep(&self, pattern: &Regex) -> Result<Vec<GrepMatch>, WalkError> {
        let mut matches = Vec::new();
        self.for_each_line(|line, line_number| {
            if let Some(found) = pattern.find(line) {
                matches.push(GrepMatch {
                    line_number,
                    line: line.to_owned(),
                    range: found.range(),
                });
            }
        })?;
        Ok(matches)
    }

    /// Reports whether any of the first `probe_blocks` blocks contains a NUL
    /// byte. `None` probes the whole file.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open); reading failures map to
    /// [`WalkErrorKind::Read`].
    pub fn is_binary(&self, probe_blocks: Option<u64>) -> Result<bool, WalkError> {
        let mut file = self.open()?;
        let block_size = self
            .resolved_status()
            .map_or(FALLBACK_BLOCK_SIZE, preferred_block_size);
        let block_size = usize::try_from(block_size).unwrap_or(usize::MAX).min(1 << 20);
        let mut block = vec![0_u8; block_size];
        let mut remaining = probe_blocks;

        while remaining != Some(0) {
            let filled = read_block(&mut file, &mut block)
                .map_err(|error| WalkError::read(self.path().to_path_buf(), error))?;
            if filled == 0 {
                break;
            }
            if block[..filled].contains(&0) {
                return Ok(true);
            }
            remaining = remaining.map(|n| n - 1);
        }
        Ok(false)
    }

    /// Reports whether the entry is a Vim swap file: a swap-style name and
    /// the `b0VIM` magic at the start of its contents.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn is_vimswap(&self) -> Result<bool, WalkError> {
        if !has_vimswap_name(self.name().as_encoded_bytes()) {
            return Ok(false);
        }
        if !self.resolved_status().is_some_and(Metadata::is_file) {
            return Ok(false);
        }
        let magic = self.read(Some(VIM_SWAP_MAGIC.len() as u64))?;
        Ok(magic == VIM_SWAP_MAGIC)
    }
}

/// Fills `block` as far as the file allows.
fn read_block(file: &mut File, block: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match file.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vimswap_names() {
        for name in [".notes.txt.swp", ".x.swo", ".swp", ".a.SWP"] {
            assert!(has_vimswap_name(name.as_bytes()), "{name}");
        }
        for name in ["notes.swp", "..swp", ".notes.txt", "swp", ".a.sw1"] {
            assert!(!has_vimswap_name(name.as_bytes()), "{name}");
        }
    }

    #[test]
    fn highlight_wraps_match() {
        let found = GrepMatch {
            line_number: 3,
            line: "say hello there".to_owned(),
            range: 4..9,
        };
        assert_eq!(found.highlighted("31;1"), "say \x1b[31;1mhello\x1b[m there");
    }
}
