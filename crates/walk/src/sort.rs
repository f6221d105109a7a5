use std::fmt;
use std::time::SystemTime;

use logging::debug_log;

use crate::entry::Entry;

/// Comparable key extracted from an entry by a custom sort.
///
/// Keys of different variants order by variant first, so entries whose key
/// could not be computed ([`SortKey::Missing`]) sort before everything else.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// No key available, e.g. the status could not be read.
    Missing,
    /// Integer key such as a size.
    Int(i128),
    /// Textual key.
    Text(String),
    /// Raw byte key, useful for names that are not valid UTF-8.
    Bytes(Vec<u8>),
    /// Timestamp key.
    Time(SystemTime),
}

impl From<u64> for SortKey {
    fn from(value: u64) -> Self {
        Self::Int(i128::from(value))
    }
}

impl From<i64> for SortKey {
    fn from(value: i64) -> Self {
        Self::Int(i128::from(value))
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<SystemTime> for SortKey {
    fn from(value: SystemTime) -> Self {
        Self::Time(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for SortKey {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

type KeyFn<'a> = dyn Fn(&Entry<'_>) -> SortKey + 'a;

/// How the entries of one directory are ordered before they are visited.
#[derive(Default)]
pub enum SortOrder<'a> {
    /// Keep the order the operating system lists them in.
    Unordered,
    /// Byte-wise ascending by name.
    #[default]
    Name,
    /// Ascending by a key computed once per entry.
    Key(Box<KeyFn<'a>>),
}

impl<'a> SortOrder<'a> {
    /// Sorts ascending by the key `key` returns.
    pub fn by_key<F>(key: F) -> Self
    where
        F: Fn(&Entry<'_>) -> SortKey + 'a,
    {
        Self::Key(Box::new(key))
    }
}

impl fmt::Debug for SortOrder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unordered => f.write_str("Unordered"),
            Self::Name => f.write_str("Name"),
            Self::Key(_) => f.write_str("Key(..)"),
        }
    }
}

/// Sorting stage applied to each directory listing: order, then optional
/// reversal, then an optional stable move of directories to the front.
#[derive(Debug)]
pub(crate) struct SortPolicy<'s, 'a> {
    pub(crate) order: &'s SortOrder<'a>,
    pub(crate) reverse: bool,
    pub(crate) directories_first: bool,
}

impl SortPolicy<'_, '_> {
    pub(crate) fn arrange(&self, entries: &mut Vec<Entry<'_>>) {
        match self.order {
            SortOrder::Unordered => {}
            SortOrder::Name => entries.sort_by(|a, b| a.name().cmp(b.name())),
            SortOrder::Key(key) => entries.sort_by_cached_key(|entry| key(entry)),
        }
        if self.reverse {
            entries.reverse();
        }
        if self.directories_first {
            let (dirs, others): (Vec<_>, Vec<_>) =
                entries.drain(..).partition(Entry::is_dir_like);
            entries.extend(dirs);
            entries.extend(others);
        }
        debug_log!(
            Sort,
            2,
            "arranged {} entries ({:?}, reverse={}, directories_first={})",
            entries.len(),
            self.order,
            self.reverse,
            self.directories_first
        );
    }
}
