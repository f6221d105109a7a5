use std::ffi::OsString;

use clap::ArgMatches;

use super::parsed_args::{OnError, ParsedArgs, SortChoice};
use crate::PROGRAM_NAME;
use crate::command_builder::clap_command;

/// Parses `arguments` (including the program name) into [`ParsedArgs`].
///
/// # Errors
///
/// Returns the clap error for unknown options, missing or malformed values.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command(PROGRAM_NAME).try_get_matches_from(args)?;
    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        roots: take_all(&mut matches, "roots"),
        max_depth: matches.remove_one::<usize>("max-depth"),
        depth_first: matches.get_flag("depth"),
        follow: matches.get_flag("follow"),
        sort: matches
            .remove_one::<String>("sort")
            .map_or_else(SortChoice::default, |value| SortChoice::from_value(&value)),
        reverse: matches.get_flag("reverse"),
        dirs_first: matches.get_flag("dirs-first"),
        names: take_all(&mut matches, "name"),
        prunes: take_all(&mut matches, "prune"),
        novcs: matches.get_flag("novcs"),
        types: matches.remove_one::<String>("type"),
        grep: matches.remove_one::<String>("grep"),
        binary: matches.get_flag("binary"),
        vimswap: matches.get_flag("vimswap"),
        long: matches.get_flag("long"),
        color: matches.get_flag("color"),
        colors: matches.remove_one::<String>("colors"),
        separator: matches.remove_one("separator"),
        on_error: matches
            .remove_one::<String>("on-error")
            .map_or_else(OnError::default, |value| OnError::from_value(&value)),
        count: matches.get_flag("count"),
        verbose: matches.get_count("verbose"),
        info: split_tokens(take_all(&mut matches, "info")),
        debug: split_tokens(take_all(&mut matches, "debug")),
    })
}

fn take_all<T>(matches: &mut ArgMatches, id: &str) -> Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .remove_many::<T>(id)
        .map(Iterator::collect)
        .unwrap_or_default()
}

fn split_tokens(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
