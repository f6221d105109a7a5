use std::ffi::OsString;

use walk::Separator;

/// Key selected with `--sort`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortChoice {
    /// Directory order as returned by the operating system.
    None,
    /// Byte-wise by name.
    #[default]
    Name,
    /// By size in bytes.
    Size,
    /// By modification time.
    Mtime,
    /// By access time.
    Atime,
    /// By status change time.
    Ctime,
    /// By extension, then by name.
    Ext,
}

impl SortChoice {
    pub(crate) fn from_value(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "size" => Self::Size,
            "mtime" => Self::Mtime,
            "atime" => Self::Atime,
            "ctime" => Self::Ctime,
            "ext" => Self::Ext,
            _ => Self::Name,
        }
    }
}

/// Behavior selected with `--on-error`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    /// Stop at the first error.
    #[default]
    Fail,
    /// Print the error, skip the entry and exit with status 1 at the end.
    Warn,
    /// Skip the entry silently.
    Ignore,
}

impl OnError {
    pub(crate) fn from_value(value: &str) -> Self {
        match value {
            "warn" => Self::Warn,
            "ignore" => Self::Ignore,
            _ => Self::Fail,
        }
    }
}

/// Parsed command-line arguments.
///
/// Values are kept as given; patterns, colors and diagnostic flags are
/// validated when the search is set up.
///
/// **Warning**: exposed through `cli::test_utils` for integration tests
/// only. It is not part of the stable public API.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// `--help`, `-h`
    pub show_help: bool,
    /// `--version`, `-V`
    pub show_version: bool,
    /// Positional roots; empty means the current directory.
    pub roots: Vec<OsString>,
    /// `--max-depth`, `-m`
    pub max_depth: Option<usize>,
    /// `--depth`, `-d`: post-order traversal.
    pub depth_first: bool,
    /// `--follow`, `-L`
    pub follow: bool,
    /// `--sort`, `-s`
    pub sort: SortChoice,
    /// `--reverse`, `-r`
    pub reverse: bool,
    /// `--dirs-first`, `-D`
    pub dirs_first: bool,
    /// `--name`, `-n`
    pub names: Vec<String>,
    /// `--prune`, `-P`
    pub prunes: Vec<String>,
    /// `--novcs`
    pub novcs: bool,
    /// `--type`, `-t`
    pub types: Option<String>,
    /// `--grep`, `-g`
    pub grep: Option<String>,
    /// `--binary`, `-b`
    pub binary: bool,
    /// `--vimswap`
    pub vimswap: bool,
    /// `--long`, `-l`
    pub long: bool,
    /// `--color`, `-c`
    pub color: bool,
    /// `--colors`
    pub colors: Option<String>,
    /// `--separator`, `-S`
    pub separator: Option<Separator>,
    /// `--on-error`, `-e`
    pub on_error: OnError,
    /// `--count`, `-C`
    pub count: bool,
    /// Number of `-v` occurrences.
    pub verbose: u8,
    /// Comma separated `--info` tokens, in order.
    pub info: Vec<String>,
    /// Comma separated `--debug` tokens, in order.
    pub debug: Vec<String>,
}
