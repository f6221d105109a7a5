use crate::policy::ErrorPolicy;
use crate::sort::SortOrder;
use crate::stat_cache::FileIdentity;
use crate::walker::Walk;

/// Whether a directory's callback runs before or after its descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Directory first, then its contents. Pruning is available.
    #[default]
    PreOrder,
    /// Contents first, then the directory (`find -depth`).
    PostOrder,
}

/// Which file [`Entry::open`](crate::Entry::open) refuses to read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputGuard {
    /// Whatever this process's standard output refers to at run time.
    #[default]
    Stdout,
    /// A specific file.
    Identity(FileIdentity),
    /// No protection.
    Disabled,
}

impl OutputGuard {
    pub(crate) fn resolve(self) -> Option<FileIdentity> {
        match self {
            Self::Stdout => FileIdentity::of_stdout(),
            Self::Identity(identity) => Some(identity),
            Self::Disabled => None,
        }
    }
}

/// Traversal options fixed for the lifetime of a [`Walk`].
#[derive(Debug, Default)]
pub struct WalkConfig<'a> {
    /// Entries at this depth are visited but not descended into.
    pub max_depth: Option<usize>,
    /// Pre- or post-order visiting.
    pub order: TraversalOrder,
    /// Descend into symlinks that resolve to directories.
    pub follow_symlinks: bool,
    /// Ordering of each directory listing.
    pub sort: SortOrder<'a>,
    /// Reverse the sorted listing.
    pub reverse: bool,
    /// Move directories ahead of other entries after sorting.
    pub directories_first: bool,
}

/// Configures a [`Walk`].
///
/// ```
/// use walk::{SortOrder, TraversalOrder, WalkBuilder};
///
/// let walk = WalkBuilder::new()
///     .max_depth(Some(2))
///     .order(TraversalOrder::PostOrder)
///     .sort(SortOrder::Unordered)
///     .build();
/// assert_eq!(walk.config().max_depth, Some(2));
/// ```
#[derive(Debug, Default)]
pub struct WalkBuilder<'a> {
    config: WalkConfig<'a>,
    policy: ErrorPolicy<'a>,
    output: OutputGuard,
}

impl<'a> WalkBuilder<'a> {
    /// Creates a builder with the defaults: unlimited depth, pre-order,
    /// symlinks not followed, sorted by name, errors propagated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits descent to `max_depth` levels below each root.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Selects pre- or post-order visiting.
    #[must_use]
    pub const fn order(mut self, order: TraversalOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Shorthand for [`TraversalOrder::PostOrder`] when `depth_first` holds.
    #[must_use]
    pub const fn depth_first(self, depth_first: bool) -> Self {
        self.order(if depth_first {
            TraversalOrder::PostOrder
        } else {
            TraversalOrder::PreOrder
        })
    }

    /// Configures whether symlinks to directories are descended into.
    ///
    /// The symlink itself is always visited. Symlinks resolving to one of
    /// their own ancestors raise
    /// [`WalkErrorKind::CyclicRecursion`](crate::WalkErrorKind::CyclicRecursion).
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Sets the ordering of each directory listing.
    #[must_use]
    pub fn sort(mut self, sort: SortOrder<'a>) -> Self {
        self.config.sort = sort;
        self
    }

    /// Reverses each sorted listing.
    #[must_use]
    pub const fn reverse(mut self, reverse: bool) -> Self {
        self.config.reverse = reverse;
        self
    }

    /// Visits directories before the other entries of a listing.
    #[must_use]
    pub const fn directories_first(mut self, first: bool) -> Self {
        self.config.directories_first = first;
        self
    }

    /// Sets how recoverable errors are handled.
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy<'a>) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the file content access refuses to read.
    #[must_use]
    pub const fn output_guard(mut self, guard: OutputGuard) -> Self {
        self.output = guard;
        self
    }

    /// Builds the [`Walk`].
    #[must_use]
    pub fn build(self) -> Walk<'a> {
        Walk::new(self.config, self.policy, self.output)
    }
}
