//! Separator-joined output records, one per line.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::WalkError;

/// Line terminator of the host platform.
pub const LINE_TERMINATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Field separator for [`RecordWriter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    /// `:`, or `|` on Windows where colons appear in paths.
    #[default]
    Colon,
    /// Horizontal tab.
    Tab,
    /// Single space.
    Space,
}

impl Separator {
    /// Character written between fields.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Colon => {
                if cfg!(windows) {
                    '|'
                } else {
                    ':'
                }
            }
            Self::Tab => '\t',
            Self::Space => ' ',
        }
    }
}

impl FromStr for Separator {
    type Err = WalkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            ":" | "|" | "colon" => Ok(Self::Colon),
            "\t" | "tab" => Ok(Self::Tab),
            " " | "space" => Ok(Self::Space),
            other => Err(WalkError::bad_separator(other)),
        }
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Writes records of displayable fields joined by a [`Separator`].
#[derive(Debug)]
pub struct RecordWriter<W> {
    out: W,
    separator: Separator,
    written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer emitting to `out`.
    pub const fn new(out: W, separator: Separator) -> Self {
        Self {
            out,
            separator,
            written: 0,
        }
    }

    /// Writes one record terminated by [`LINE_TERMINATOR`].
    ///
    /// # Errors
    ///
    /// Propagates write failures of the underlying writer.
    pub fn write_record<I>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut line = String::new();
        for (index, field) in fields.into_iter().enumerate() {
            if index > 0 {
                line.push(self.separator.as_char());
            }
            line.push_str(&field.to_string());
        }
        line.push_str(LINE_TERMINATOR);
        self.out.write_all(line.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.written
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Propagates flush failures.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
