use std::path::{Path, PathBuf};
use std::time::SystemTime;

use logging::{debug_log, info_log};

use crate::builder::{OutputGuard, TraversalOrder, WalkBuilder, WalkConfig};
use crate::entry::{self, Entry, PendingAction, WalkContext};
use crate::error::WalkError;
use crate::policy::ErrorPolicy;
use crate::signal::Signal;
use crate::sort::SortPolicy;
use crate::stat_cache::LoopKey;

/// Counters describing the most recent [`Walk::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkState {
    start: Option<SystemTime>,
    visited: u64,
    depth: usize,
}

impl WalkState {
    /// Time the run started.
    #[must_use]
    pub const fn start(&self) -> Option<SystemTime> {
        self.start
    }

    /// Entries visited so far.
    #[must_use]
    pub const fn visited(&self) -> u64 {
        self.visited
    }

    /// Directory nesting currently being listed. Zero outside a run.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// Depth-first traversal driving a visitor callback.
///
/// ```
/// use walk::Walk;
/// use std::fs;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// fs::create_dir(temp.path().join("src"))?;
/// fs::write(temp.path().join("src/main.rs"), b"fn main() {}")?;
///
/// let mut names = Vec::new();
/// let visited = Walk::builder().build().run([temp.path()], |entry| {
///     names.push(entry.name().to_string_lossy().into_owned());
///     Ok(())
/// })?;
/// assert_eq!(visited, 3);
/// assert_eq!(names[1..], ["src", "main.rs"]);
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
#[derive(Debug)]
pub struct Walk<'a> {
    config: WalkConfig<'a>,
    policy: ErrorPolicy<'a>,
    output: OutputGuard,
    state: WalkState,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(config: WalkConfig<'a>, policy: ErrorPolicy<'a>, output: OutputGuard) -> Self {
        Self {
            config,
            policy,
            output,
            state: WalkState::default(),
        }
    }

    /// Starts configuring a walk.
    #[must_use]
    pub fn builder() -> WalkBuilder<'a> {
        WalkBuilder::new()
    }

    /// Options the walk was built with.
    #[must_use]
    pub const fn config(&self) -> &WalkConfig<'a> {
        &self.config
    }

    /// Counters of the most recent run.
    #[must_use]
    pub const fn state(&self) -> &WalkState {
        &self.state
    }

    /// Entries visited by the most recent run.
    #[must_use]
    pub const fn visited_count(&self) -> u64 {
        self.state.visited
    }

    /// Visits every root and everything below it, calling `visitor` for each
    /// entry. An empty root list walks the current directory. Returns the
    /// number of entries visited.
    ///
    /// # Errors
    ///
    /// Returns the first error the error policy does not absorb, including
    /// every non-recoverable one.
    pub fn run<I, V>(&mut self, roots: I, mut visitor: V) -> Result<u64, WalkError>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        V: FnMut(&mut Entry<'_>) -> Result<(), Signal>,
    {
        let mut roots: Vec<PathBuf> = roots
            .into_iter()
            .map(|root| root.as_ref().to_path_buf())
            .collect();
        if roots.is_empty() {
            roots.push(PathBuf::from("."));
        }

        let context = WalkContext::new(self.config.follow_symlinks, self.output.resolve());
        self.state = WalkState {
            start: Some(context.start),
            ..WalkState::default()
        };

        let mut traversal = Traversal {
            config: &self.config,
            policy: &mut self.policy,
            state: &mut self.state,
            visitor: &mut visitor,
        };
        for root in &roots {
            traversal.walk_root(root, &context)?;
        }

        info_log!(Stats, 1, "visited {} entries", self.state.visited);
        Ok(self.state.visited)
    }
}

struct Traversal<'t, 'a, V> {
    config: &'t WalkConfig<'a>,
    policy: &'t mut ErrorPolicy<'a>,
    state: &'t mut WalkState,
    visitor: &'t mut V,
}

impl<V> Traversal<'_, '_, V>
where
    V: FnMut(&mut Entry<'_>) -> Result<(), Signal>,
{
    fn walk_root(&mut self, root: &Path, context: &WalkContext) -> Result<(), WalkError> {
        info_log!(Walk, 1, "walking root {}", root.display());
        let status = std::fs::symlink_metadata(root)
            .map_err(|error| WalkError::root(root.to_path_buf(), error));
        let Some(metadata) = self.policy.guard(None, status)? else {
            info_log!(Skip, 1, "skipping root {}", root.display());
            return Ok(());
        };
        self.enter(Entry::root(root, context, Some(metadata)))
    }

    fn enter(&mut self, mut entry: Entry<'_>) -> Result<(), WalkError> {
        self.state.visited += 1;
        entry.set_count(self.state.visited);
        debug_log!(Walk, 3, "visiting {} (depth {})", entry.path().display(), entry.depth());

        match self.config.order {
            TraversalOrder::PreOrder => {
                if self.call_visitor(&mut entry)? {
                    self.enter_dir(&entry)?;
                }
            }
            TraversalOrder::PostOrder => {
                self.enter_dir(&entry)?;
                self.call_visitor(&mut entry)?;
            }
        }
        Ok(())
    }

    /// Runs the visitor and performs any pending mutation. Returns whether
    /// the entry may be descended into.
    ///
    /// A prune counts whether it was returned or only recorded on the entry.
    fn call_visitor(&mut self, entry: &mut Entry<'_>) -> Result<bool, WalkError> {
        let mut pruned = false;
        match (self.visitor)(entry) {
            Ok(()) | Err(Signal::Done) => {}
            Err(Signal::Prune) => pruned = true,
            Err(Signal::Error(source)) => {
                let error = WalkError::callback(entry.path().to_path_buf(), source);
                self.policy.recover(error, Some(&*entry))?;
            }
        }
        pruned |= *entry.pending_action() == PendingAction::Pruned;

        let mut descend = true;
        if pruned {
            match self.config.order {
                TraversalOrder::PreOrder => {
                    info_log!(Skip, 1, "pruned {}", entry.path().display());
                    descend = false;
                }
                TraversalOrder::PostOrder => {
                    return Err(WalkError::unsupported_prune(entry.path().to_path_buf()));
                }
            }
        }
        if !entry.apply_pending()? {
            descend = false;
        }
        Ok(descend)
    }

    fn enter_dir(&mut self, entry: &Entry<'_>) -> Result<(), WalkError> {
        if entry.is_removed() {
            return Ok(());
        }
        if self
            .config
            .max_depth
            .is_some_and(|max_depth| entry.depth() >= max_depth)
        {
            return Ok(());
        }

        let Some(status) = self.policy.guard(Some(entry), entry.link_status())? else {
            return Ok(());
        };
        if status.is_symlink() {
            if !self.config.follow_symlinks
                || !entry.resolved_status().is_some_and(std::fs::Metadata::is_dir)
            {
                return Ok(());
            }
            if let Some(ancestor) = find_loop(entry) {
                debug_log!(
                    Cycle,
                    1,
                    "{} resolves to ancestor {}",
                    entry.path().display(),
                    ancestor.display()
                );
                let error = WalkError::cyclic(entry.path().to_path_buf(), ancestor);
                self.policy.recover(error, Some(entry))?;
                return Ok(());
            }
        } else if !status.is_dir() {
            return Ok(());
        }

        let Some(names) = self.policy.guard(Some(entry), entry::read_names(entry.path()))? else {
            return Ok(());
        };
        info_log!(Walk, 2, "entering {}", entry.path().display());
        debug_log!(Walk, 2, "listing {} ({} entries)", entry.path().display(), names.len());

        let mut children: Vec<Entry<'_>> = names
            .into_iter()
            .map(|name| Entry::child(entry, name))
            .collect();
        SortPolicy {
            order: &self.config.sort,
            reverse: self.config.reverse,
            directories_first: self.config.directories_first,
        }
        .arrange(&mut children);

        self.state.depth += 1;
        let result = children.into_iter().try_for_each(|child| self.enter(child));
        self.state.depth -= 1;
        result
    }
}

/// Returns the ancestor a followed symlink resolves to, if any. Directories
/// above the root are checked as well.
fn find_loop(entry: &Entry<'_>) -> Option<PathBuf> {
    let target = entry.loop_key()?;
    let mut root = entry;
    for ancestor in entry.ancestors() {
        if ancestor.loop_key().as_ref() == Some(&target) {
            return Some(ancestor.path().to_path_buf());
        }
        root = ancestor;
    }
    root.path()
        .ancestors()
        .skip(1)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find(|dir| {
            std::fs::metadata(dir)
                .ok()
                .and_then(|metadata| LoopKey::of(dir, &metadata))
                .as_ref()
                == Some(&target)
        })
        .map(Path::to_path_buf)
}
