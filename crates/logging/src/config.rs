//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug)]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a `-v` count.
    ///
    /// Level 0 is silent, level 1 reports skipped entries and mutations,
    /// level 2 adds walk progress and statistics plus first-level debug
    /// output, and level 3 and above raise every debug flag.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level {
            0 => {}
            1 => {
                config.info.skip = 1;
                config.info.mutate = 1;
            }
            2 => {
                config.info.set_all(1);
                config.info.walk = 2;
                config.debug.walk = 1;
                config.debug.policy = 1;
                config.debug.cycle = 1;
            }
            3 => {
                config.info.set_all(2);
                config.debug.set_all(1);
                config.debug.walk = 2;
            }
            _ => {
                config.info.set_all(2);
                config.debug.set_all(3);
            }
        }

        config
    }

    /// Apply a single info flag token (e.g., "skip2", "stats", "ALL", "NONE").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        match name {
            "ALL" | "all" => {
                self.info.set_all(level);
                return Ok(());
            }
            "NONE" | "none" => {
                self.info.set_all(0);
                return Ok(());
            }
            _ => {}
        }

        let flag = match name {
            "walk" => InfoFlag::Walk,
            "skip" => InfoFlag::Skip,
            "mutate" => InfoFlag::Mutate,
            "stats" => InfoFlag::Stats,
            _ => return Err(format!("unknown info flag: {name}")),
        };

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "walk2", "cycle").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        match name {
            "ALL" | "all" => {
                self.debug.set_all(level);
                return Ok(());
            }
            "NONE" | "none" => {
                self.debug.set_all(0);
                return Ok(());
            }
            _ => {}
        }

        let flag = match name {
            "walk" => DebugFlag::Walk,
            "sort" => DebugFlag::Sort,
            "stat" => DebugFlag::Stat,
            "cycle" => DebugFlag::Cycle,
            "policy" => DebugFlag::Policy,
            "content" => DebugFlag::Content,
            _ => return Err(format!("unknown debug flag: {name}")),
        };

        self.debug.set(flag, level);
        Ok(())
    }

    /// Returns `true` when no info or debug flag is raised.
    pub fn is_silent(&self) -> bool {
        let info = &self.info;
        let debug = &self.debug;
        info.walk == 0
            && info.skip == 0
            && info.mutate == 0
            && info.stats == 0
            && debug.walk == 0
            && debug.sort == 0
            && debug.stat == 0
            && debug.cycle == 0
            && debug.policy == 0
            && debug.content == 0
    }
}

/// Parse a flag token like "walk2" into ("walk", 2) or "skip" into ("skip", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}
