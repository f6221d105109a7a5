//! Per-entry selection and printing.

use std::fs::Metadata;
use std::io::{self, Write};
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use logging::debug_log;
use regex::Regex;
use thiserror::Error;
use walk::{Entry, RecordWriter, VisitResult, WalkError};

use crate::arguments::ParsedArgs;
use crate::render::Renderer;

/// Problems with the command line found while setting up a search.
#[derive(Debug, Error)]
pub(crate) enum SetupError {
    #[error("invalid pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("{0}")]
    Diagnostics(String),
    #[error("{0} cannot be combined with --depth")]
    PruneInPostOrder(&'static str),
}

/// Compiled selection predicates and output settings for one run.
#[derive(Debug)]
pub(crate) struct Search {
    names: Option<GlobSet>,
    prunes: Option<GlobSet>,
    novcs: bool,
    types: Option<Vec<char>>,
    grep: Option<Regex>,
    binary: bool,
    vimswap: bool,
    post_order: bool,
    renderer: Renderer,
    output_error: Option<io::Error>,
}

impl Search {
    pub(crate) fn new(args: &ParsedArgs) -> Result<Self, SetupError> {
        if args.depth_first {
            if !args.prunes.is_empty() {
                return Err(SetupError::PruneInPostOrder("--prune"));
            }
            if args.novcs {
                return Err(SetupError::PruneInPostOrder("--novcs"));
            }
        }

        Ok(Self {
            names: glob_set(&args.names)?,
            prunes: glob_set(&args.prunes)?,
            novcs: args.novcs,
            types: args.types.as_ref().map(|letters| letters.chars().collect()),
            grep: args.grep.as_deref().map(Regex::new).transpose()?,
            binary: args.binary,
            vimswap: args.vimswap,
            post_order: args.depth_first,
            renderer: Renderer::new(args)?,
            output_error: None,
        })
    }

    /// Visits one entry: applies pruning, the selection predicates, and
    /// prints what survives.
    pub(crate) fn visit<W: Write>(
        &mut self,
        entry: &mut Entry<'_>,
        records: &mut RecordWriter<W>,
    ) -> VisitResult {
        if self.output_error.is_some() {
            return if self.post_order { Ok(()) } else { entry.prune() };
        }
        if self.novcs {
            entry.no_vcs()?;
        }
        if matches_name(self.prunes.as_ref(), entry) {
            return entry.prune();
        }
        if !self.selects(entry)? {
            return Ok(());
        }

        if let Some(pattern) = &self.grep {
            if !is_regular(entry) || entry.is_binary(Some(1))? {
                return Ok(());
            }
            let matches = entry.grep(pattern)?;
            let path = self.renderer.path(entry);
            for found in &matches {
                let fields = [
                    path.clone(),
                    found.line_number.to_string(),
                    self.renderer.line(found),
                ];
                if let Err(error) = records.write_record(fields) {
                    self.output_error = Some(error);
                    break;
                }
            }
            return Ok(());
        }

        if let Err(error) = records.write_record(self.renderer.fields(entry)) {
            self.output_error = Some(error);
        }
        Ok(())
    }

    /// Returns the first error met while writing output.
    pub(crate) fn take_output_error(&mut self) -> Option<io::Error> {
        self.output_error.take()
    }

    fn selects(&self, entry: &Entry<'_>) -> Result<bool, WalkError> {
        if self.names.is_some() && !matches_name(self.names.as_ref(), entry) {
            return Ok(false);
        }
        if let Some(types) = &self.types {
            let letter = entry.type_letter();
            if !types
                .iter()
                .any(|&wanted| wanted == letter || (wanted == 'f' && letter == '-'))
            {
                return Ok(false);
            }
        }
        if self.binary && !(is_regular(entry) && entry.is_binary(Some(1))?) {
            return Ok(false);
        }
        if self.vimswap && !entry.is_vimswap()? {
            return Ok(false);
        }
        debug_log!(Content, 2, "selected {}", entry.path().display());
        Ok(true)
    }
}

fn glob_set(patterns: &[String]) -> Result<Option<GlobSet>, SetupError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| SetupError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map(Some).map_err(|source| SetupError::Glob {
        pattern: patterns.join(","),
        source,
    })
}

fn matches_name(set: Option<&GlobSet>, entry: &Entry<'_>) -> bool {
    set.is_some_and(|set| set.is_match(Path::new(entry.name())))
}

fn is_regular(entry: &Entry<'_>) -> bool {
    entry.resolved_status().is_some_and(Metadata::is_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::parse_args;

    fn search(args: &[&str]) -> Result<Search, SetupError> {
        let mut argv = vec!["rfind"];
        argv.extend_from_slice(args);
        Search::new(&parse_args(argv).expect("parse"))
    }

    #[test]
    fn rejects_malformed_glob() {
        let error = search(&["-n", "a[b"]).expect_err("bad glob");
        assert!(matches!(error, SetupError::Glob { ref pattern, .. } if pattern == "a[b"));
        assert!(error.to_string().starts_with("invalid pattern 'a[b'"));
    }

    #[test]
    fn rejects_malformed_regex() {
        let error = search(&["-g", "(unclosed"]).expect_err("bad regex");
        assert!(matches!(error, SetupError::Regex(_)));
    }

    #[test]
    fn rejects_pruning_in_post_order() {
        let error = search(&["-d", "-P", "target"]).expect_err("post-order prune");
        assert_eq!(error.to_string(), "--prune cannot be combined with --depth");
        let error = search(&["--depth", "--novcs"]).expect_err("post-order novcs");
        assert_eq!(error.to_string(), "--novcs cannot be combined with --depth");
    }

    #[test]
    fn rejects_malformed_color_spec() {
        let error = search(&["--colors", "abc"]).expect_err("odd length");
        assert!(matches!(error, SetupError::Walk(_)));
    }

    #[test]
    fn empty_pattern_lists_compile_to_nothing() {
        let search = search(&[]).expect("setup");
        assert!(search.names.is_none());
        assert!(search.prunes.is_none());
        assert!(search.grep.is_none());
    }
}
