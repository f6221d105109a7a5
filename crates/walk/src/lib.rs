#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` is a configurable depth-first filesystem walker meant to be embedded
//! as a `find` substitute. A [`Walk`] visits every root and everything below
//! it, handing each node to a visitor callback as an [`Entry`]. The visitor
//! inspects the entry through lazily cached accessors, reads file contents,
//! and steers the traversal: it may prune a directory, finish early, rename
//! or remove the entry, or fail with an error that the configured
//! [`ErrorPolicy`] may absorb.
//!
//! # Design
//!
//! - [`WalkBuilder`] fixes the [`WalkConfig`]: depth limit, pre- or
//!   post-order visiting, symlink following, per-directory ordering through
//!   [`SortOrder`], and the error policy.
//! - [`Walk::run`] recurses one stack frame per directory level. Each
//!   [`Entry`] borrows its parent, so the ancestor chain stays available for
//!   the whole visit and nothing outlives the recursive call that created it.
//! - The visitor returns [`VisitResult`]. [`Entry::prune`] and
//!   [`Entry::done`] produce the control [`Signal`]s; any error converts into
//!   [`Signal::Error`] through `?`.
//! - [`ColorTable`] and [`RecordWriter`] format entries for terminal output.
//!
//! # Invariants
//!
//! - An entry's path always equals its root joined with every ancestor name,
//!   also after a rename.
//! - The visited count grows by exactly one per entry, roots included,
//!   whether or not the entry is later pruned or removed.
//! - Status information is fetched at most once per entry and is discarded
//!   whenever the entry's name changes.
//! - Renames, removals and post-order prunes never go through the error
//!   policy: they abort the run when they fail.
//!
//! # Examples
//!
//! Collect every Rust source file while skipping `target` directories.
//!
//! ```
//! use std::fs;
//! use walk::Walk;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir_all(temp.path().join("src"))?;
//! fs::create_dir_all(temp.path().join("target/debug"))?;
//! fs::write(temp.path().join("src/lib.rs"), b"")?;
//! fs::write(temp.path().join("target/debug/build.rs"), b"")?;
//!
//! let mut sources = Vec::new();
//! Walk::builder().build().run([temp.path()], |entry| {
//!     if entry.name() == "target" {
//!         entry.prune()?;
//!     }
//!     if entry.extension().is_some_and(|ext| ext == "rs") {
//!         sources.push(entry.path().to_path_buf());
//!     }
//!     Ok(())
//! })?;
//!
//! assert_eq!(sources, [temp.path().join("src/lib.rs")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod color;
mod content;
mod entry;
mod error;
mod mode;
mod policy;
mod record;
mod signal;
mod sort;
mod stat_cache;
mod walker;

pub use crate::builder::{OutputGuard, TraversalOrder, WalkBuilder, WalkConfig};
pub use crate::color::{
    ColorCategory, ColorSources, ColorTable, DEFAULT_PAIRS, GNU_ENV, PRIMARY_ENV, VENDOR_ENV,
};
pub use crate::content::{FALLBACK_BLOCK_SIZE, GrepMatch};
pub use crate::entry::{Entry, PendingAction};
pub use crate::error::{RenameConflict, WalkError, WalkErrorKind};
pub use crate::mode::{FileKind, permissions_string};
pub use crate::policy::ErrorPolicy;
pub use crate::record::{LINE_TERMINATOR, RecordWriter, Separator};
pub use crate::signal::{Signal, VisitResult};
pub use crate::sort::{SortKey, SortOrder};
pub use crate::stat_cache::{FileIdentity, StatCache};
pub use crate::walker::{Walk, WalkState};
