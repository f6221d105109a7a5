#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `rfind` command-line front-end on top of the
//! [`walk`] crate. Arguments are parsed with clap, turned into a
//! [`walk::Walk`] configuration plus a set of selection predicates, and every
//! selected entry is printed as a record on the supplied output handle.
//!
//! # Design
//!
//! - [`run`] is the entry point used by the binary. It never touches the
//!   process-wide standard streams directly, so tests drive it with
//!   in-memory buffers.
//! - Name and prune patterns are compiled with `globset`, `--grep`
//!   patterns with `regex`.
//! - `--on-error` maps onto [`walk::ErrorPolicy`]: `fail` propagates, `warn`
//!   prints each recovered error, `ignore` drops it.
//! - Diagnostics (`-v`, `--info`, `--debug`) are routed through the
//!   [`logging`] crate.
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Every entry was visited |
//! | 1    | An error stopped the walk, or `--on-error=warn` reported one |
//! | 15   | The command line could not be understood |
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["rfind", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("rfind "));
//! ```

use std::ffi::OsString;
use std::io::Write;

use logging::VerbosityConfig;
use walk::{ErrorPolicy, RecordWriter, Separator, SortKey, SortOrder, Walk, WalkError};

mod arguments;
mod command_builder;
mod render;
mod search;


use arguments::{OnError, ParsedArgs, SortChoice, parse_args};
use search::{Search, SetupError};

/// Argument parsing entry points for integration tests.
///
/// **Warning**: not part of the stable public API.
pub mod test_utils {
    pub use crate::arguments::{OnError, ParsedArgs, SortChoice, parse_args};
}

/// Name used in diagnostics and the default `argv[0]`.
pub const PROGRAM_NAME: &str = "rfind";

/// Exit status of a successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status when the walk failed or reported errors.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for command-line usage errors.
pub const EXIT_USAGE: i32 = 15;

const MAX_EXIT_CODE: i32 = 255;

const VERSION_TEXT: &str = concat!("rfind ", env!("CARGO_PKG_VERSION"), "\n");

const HELP_TEXT: &str = concat!(
    "Usage: rfind [OPTIONS] [ROOT]...\n",
    "\n",
    "Walk each ROOT (default: the current directory) depth-first and print the\n",
    "entries that pass every selection option.\n",
    "\n",
    "Traversal:\n",
    "  -m, --max-depth N      descend at most N levels below the roots\n",
    "  -d, --depth            visit directory contents before the directory\n",
    "  -L, --follow           follow symbolic links to directories\n",
    "  -s, --sort KEY         none, name, size, mtime, atime, ctime or ext\n",
    "  -r, --reverse          reverse the sort order\n",
    "  -D, --dirs-first       list directories before other entries\n",
    "  -P, --prune GLOB       skip entries named GLOB and their contents\n",
    "      --novcs            skip CVS, .svn, .git and .hg directories\n",
    "  -e, --on-error MODE    fail, warn or ignore unreadable entries\n",
    "\n",
    "Selection:\n",
    "  -n, --name GLOB        select entries whose name matches GLOB\n",
    "  -t, --type LETTERS     select by type letter (d, -, f, l, p, s, c, b)\n",
    "  -b, --binary           select binary files\n",
    "      --vimswap          select Vim swap files\n",
    "  -g, --grep REGEX       print matching lines of text files\n",
    "\n",
    "Output:\n",
    "  -l, --long             print type, permissions, owner, group, size,\n",
    "                         modification time and path\n",
    "  -c, --color            color names by file type\n",
    "      --colors SPEC      color specification; implies --color\n",
    "  -S, --separator SEP    field separator: colon, tab or space\n",
    "  -C, --count            report the number of visited entries\n",
    "\n",
    "Diagnostics:\n",
    "  -v, --verbose          increase verbosity; may be repeated\n",
    "      --info FLAGS       raise info flags (walk, skip, mutate, stats)\n",
    "      --debug FLAGS      raise debug flags (walk, sort, stat, cycle,\n",
    "                         policy, content)\n",
    "  -h, --help             show this help message and exit\n",
    "  -V, --version          output version information and exit\n",
    "\n",
    "Colors are taken from --colors, RFIND_COLORS, LS_COLORS or LSCOLORS, in\n",
    "that order. RFIND_LOG overrides the diagnostic filter.\n",
);

/// Runs `rfind` with `arguments` (including the program name) and returns
/// the process exit status.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{error}");
            let _ = writeln!(stderr, "Try '{PROGRAM_NAME} --help' for more information.");
            EXIT_USAGE
        }
    }
}

/// Converts a numeric exit status into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return write_text(HELP_TEXT, stdout, stderr);
    }
    if parsed.show_version {
        return write_text(VERSION_TEXT, stdout, stderr);
    }

    let config = match verbosity(&parsed) {
        Ok(config) => config,
        Err(error) => return usage_error(&error, stderr),
    };
    logging::init_tracing(config);

    let mut search = match Search::new(&parsed) {
        Ok(search) => search,
        Err(error) => return usage_error(&error, stderr),
    };

    let separator = parsed.separator.unwrap_or(if parsed.long {
        Separator::Space
    } else {
        Separator::Colon
    });
    let mut records = RecordWriter::new(&mut *stdout, separator);
    let mut warnings = 0_u64;

    let result = {
        let policy = match parsed.on_error {
            OnError::Fail => ErrorPolicy::Propagate,
            OnError::Warn => ErrorPolicy::callback(|error: &WalkError| {
                warnings += 1;
                writeln!(stderr, "{PROGRAM_NAME}: {error}")
            }),
            OnError::Ignore => ErrorPolicy::callback(|_: &WalkError| ()),
        };
        let mut walk = Walk::builder()
            .max_depth(parsed.max_depth)
            .depth_first(parsed.depth_first)
            .follow_symlinks(parsed.follow)
            .sort(sort_order(parsed.sort))
            .reverse(parsed.reverse)
            .directories_first(parsed.dirs_first)
            .error_policy(policy)
            .build();
        walk.run(&parsed.roots, |entry| search.visit(entry, &mut records))
    };

    let output_error = search
        .take_output_error()
        .or_else(|| records.flush().err());
    if let Some(error) = output_error {
        let _ = writeln!(stderr, "{PROGRAM_NAME}: failed to write output: {error}");
        return EXIT_FAILURE;
    }

    match result {
        Ok(visited) => {
            if parsed.count {
                let _ = writeln!(stderr, "{visited} entries visited");
            }
            if warnings > 0 {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            }
        }
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            EXIT_FAILURE
        }
    }
}

fn verbosity(parsed: &ParsedArgs) -> Result<VerbosityConfig, SetupError> {
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for token in &parsed.info {
        config
            .apply_info_flag(token)
            .map_err(SetupError::Diagnostics)?;
    }
    for token in &parsed.debug {
        config
            .apply_debug_flag(token)
            .map_err(SetupError::Diagnostics)?;
    }
    Ok(config)
}

fn sort_order<'a>(choice: SortChoice) -> SortOrder<'a> {
    match choice {
        SortChoice::None => SortOrder::Unordered,
        SortChoice::Name => SortOrder::Name,
        SortChoice::Size => SortOrder::by_key(|entry| SortKey::from(entry.size())),
        SortChoice::Mtime => SortOrder::by_key(|entry| SortKey::from(entry.modified().ok())),
        SortChoice::Atime => SortOrder::by_key(|entry| SortKey::from(entry.accessed().ok())),
        SortChoice::Ctime => SortOrder::by_key(|entry| SortKey::from(entry.changed().ok())),
        SortChoice::Ext => SortOrder::by_key(|entry| {
            let mut key = entry
                .extension()
                .map(|extension| extension.as_encoded_bytes().to_vec())
                .unwrap_or_default();
            key.push(0);
            key.extend_from_slice(entry.name().as_encoded_bytes());
            SortKey::Bytes(key)
        }),
    }
}

fn write_text<Out: Write, Err: Write>(text: &str, stdout: &mut Out, stderr: &mut Err) -> i32 {
    match stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        Ok(()) => EXIT_SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: failed to write output: {error}");
            EXIT_FAILURE
        }
    }
}

fn usage_error<Err: Write>(error: &SetupError, stderr: &mut Err) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
    let _ = writeln!(stderr, "Try '{PROGRAM_NAME} --help' for more information.");
    EXIT_USAGE
}
