use clap::builder::{OsStringValueParser, PossibleValuesParser};
use clap::{Arg, ArgAction, Command};
use walk::Separator;

/// Values accepted by `--sort`.
pub(crate) const SORT_VALUES: [&str; 7] = ["none", "name", "size", "mtime", "atime", "ctime", "ext"];

/// Values accepted by `--on-error`.
pub(crate) const ON_ERROR_VALUES: [&str; 3] = ["fail", "warn", "ignore"];

fn parse_separator(value: &str) -> Result<Separator, String> {
    value.parse::<Separator>().map_err(|error| error.to_string())
}

/// Builds the clap command describing every option `rfind` understands.
///
/// Help and version handling is disabled in clap so both flags can render
/// the static texts through the caller's output handles.
pub(crate) fn clap_command(program_name: &'static str) -> Command {
    Command::new(program_name)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .short('m')
                .value_name("N")
                .help("Descend at most N levels below the roots.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .short('d')
                .help("Visit directory contents before the directory itself.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("follow")
                .long("follow")
                .short('L')
                .help("Follow symbolic links to directories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .short('s')
                .value_name("KEY")
                .help("Order directory entries by KEY.")
                .value_parser(PossibleValuesParser::new(SORT_VALUES)),
        )
        .arg(
            Arg::new("reverse")
                .long("reverse")
                .short('r')
                .help("Reverse the sort order.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dirs-first")
                .long("dirs-first")
                .short('D')
                .help("List directories before other entries.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .short('n')
                .value_name("GLOB")
                .help("Select entries whose name matches GLOB.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("prune")
                .long("prune")
                .short('P')
                .value_name("GLOB")
                .help("Skip entries whose name matches GLOB and their contents.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("novcs")
                .long("novcs")
                .help("Skip version control directories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .short('t')
                .value_name("LETTERS")
                .help("Select entries whose type letter is one of LETTERS."),
        )
        .arg(
            Arg::new("grep")
                .long("grep")
                .short('g')
                .value_name("REGEX")
                .help("Print the lines of text files matching REGEX."),
        )
        .arg(
            Arg::new("binary")
                .long("binary")
                .short('b')
                .help("Select binary files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("vimswap")
                .long("vimswap")
                .help("Select Vim swap files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("long")
                .long("long")
                .short('l')
                .help("Use a long listing format.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .short('c')
                .help("Color names by file type.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("colors")
                .long("colors")
                .value_name("SPEC")
                .help("Color specification; implies --color."),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .short('S')
                .value_name("SEP")
                .help("Field separator: colon, tab or space.")
                .value_parser(parse_separator),
        )
        .arg(
            Arg::new("on-error")
                .long("on-error")
                .short('e')
                .value_name("MODE")
                .help("What to do when an entry cannot be read.")
                .value_parser(PossibleValuesParser::new(ON_ERROR_VALUES)),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('C')
                .help("Report the number of visited entries.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase verbosity; may be repeated.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Raise informational diagnostics, e.g. skip,stats2.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Raise debug diagnostics, e.g. walk2,cycle.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("roots")
                .value_name("ROOT")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}
