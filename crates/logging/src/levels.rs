//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfoFlag {
    /// Roots and directories entered by the walker.
    Walk,
    /// Entries skipped through pruning, depth limits, or recovered errors.
    Skip,
    /// Renames and removals requested by the callback.
    Mutate,
    /// End-of-run counters.
    Stats,
}

impl InfoFlag {
    /// Lower-case token used on the command line and in the `flag` field of events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Skip => "skip",
            Self::Mutate => "mutate",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for internal diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugFlag {
    /// Traversal state machine steps.
    Walk,
    /// Sibling ordering.
    Sort,
    /// Status cache fetches and invalidations.
    Stat,
    /// Symlink cycle checks.
    Cycle,
    /// Error policy decisions.
    Policy,
    /// File content access.
    Content,
}

impl DebugFlag {
    /// Lower-case token used on the command line and in the `flag` field of events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Sort => "sort",
            Self::Stat => "stat",
            Self::Cycle => "cycle",
            Self::Policy => "policy",
            Self::Content => "content",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
pub struct InfoLevels {
    /// Walk progress level.
    pub walk: u8,
    /// Skipped entries level.
    pub skip: u8,
    /// Mutation level.
    pub mutate: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Walk => self.walk,
            InfoFlag::Skip => self.skip,
            InfoFlag::Mutate => self.mutate,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Walk => self.walk = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Mutate => self.mutate = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.walk = level;
        self.skip = level;
        self.mutate = level;
        self.stats = level;
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
pub struct DebugLevels {
    /// Traversal level.
    pub walk: u8,
    /// Sorting level.
    pub sort: u8,
    /// Status cache level.
    pub stat: u8,
    /// Cycle detection level.
    pub cycle: u8,
    /// Error policy level.
    pub policy: u8,
    /// Content access level.
    pub content: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Walk => self.walk,
            DebugFlag::Sort => self.sort,
            DebugFlag::Stat => self.stat,
            DebugFlag::Cycle => self.cycle,
            DebugFlag::Policy => self.policy,
            DebugFlag::Content => self.content,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Walk => self.walk = level,
            DebugFlag::Sort => self.sort = level,
            DebugFlag::Stat => self.stat = level,
            DebugFlag::Cycle => self.cycle = level,
            DebugFlag::Policy => self.policy = level,
            DebugFlag::Content => self.content = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.walk = level;
        self.sort = level;
        self.stat = level;
        self.cycle = level;
        self.policy = level;
        self.content = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_levels_get_set_roundtrip_per_flag() {
        let mut levels = InfoLevels::default();
        levels.set(InfoFlag::Mutate, 3);
        assert_eq!(levels.get(InfoFlag::Mutate), 3);
        assert_eq!(levels.get(InfoFlag::Walk), 0);
    }

    #[test]
    fn debug_levels_set_all_touches_every_flag() {
        let mut levels = DebugLevels::default();
        levels.set_all(2);
        for flag in [
            DebugFlag::Walk,
            DebugFlag::Sort,
            DebugFlag::Stat,
            DebugFlag::Cycle,
            DebugFlag::Policy,
            DebugFlag::Content,
        ] {
            assert_eq!(levels.get(flag), 2, "{flag:?}");
        }
    }

    #[test]
    fn flag_names_are_lowercase_tokens() {
        assert_eq!(InfoFlag::Stats.name(), "stats");
        assert_eq!(DebugFlag::Cycle.name(), "cycle");
    }
}
