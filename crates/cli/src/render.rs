use std::time::SystemTime;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use walk::{ColorSources, ColorTable, Entry, GrepMatch, WalkError};

use crate::arguments::ParsedArgs;

/// SGR code used to highlight grep matches.
const MATCH_CODE: &str = "01;31";

/// Modification time column of long listings.
const LIST_TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]/[month padding:zero]/[day padding:zero]-[hour padding:zero]:[minute padding:zero]"
);

/// Turns entries into output fields.
#[derive(Debug, Default)]
pub(crate) struct Renderer {
    colors: Option<ColorTable>,
    long: bool,
}

impl Renderer {
    pub(crate) fn new(args: &ParsedArgs) -> Result<Self, WalkError> {
        let colors = if args.color || args.colors.is_some() {
            let mut sources = ColorSources::from_env();
            if let Some(spec) = &args.colors {
                sources = sources.with_explicit(spec.as_str());
            }
            Some(sources.resolve()?)
        } else {
            None
        };
        Ok(Self {
            colors,
            long: args.long,
        })
    }

    /// The entry's path, with the last component painted when colors are
    /// enabled.
    pub(crate) fn path(&self, entry: &Entry<'_>) -> String {
        let path = entry.path().to_string_lossy();
        let Some(colors) = &self.colors else {
            return path.into_owned();
        };
        let name = entry.name().to_string_lossy();
        match path.strip_suffix(name.as_ref()) {
            Some(prefix) if !name.is_empty() => {
                format!("{prefix}{}", colors.paint_entry(entry, &name))
            }
            _ => colors.paint_entry(entry, &path),
        }
    }

    /// Fields of the record printed for a selected entry.
    pub(crate) fn fields(&self, entry: &Entry<'_>) -> Vec<String> {
        if !self.long {
            return vec![self.path(entry)];
        }

        let mode = format!(
            "{}{}",
            entry.type_letter(),
            entry
                .permissions_string()
                .unwrap_or_else(|| "?".repeat(9))
        );
        let owner = entry
            .owner()
            .or_else(|| entry.uid().map(|uid| uid.to_string()))
            .unwrap_or_else(|| "-".to_owned());
        let group = entry
            .group()
            .or_else(|| entry.gid().map(|gid| gid.to_string()))
            .unwrap_or_else(|| "-".to_owned());
        let size = entry
            .size()
            .map_or_else(|| "-".to_owned(), |size| size.to_string());
        let modified = entry
            .modified()
            .map_or_else(|_| "-".to_owned(), format_time);
        let mut path = self.path(entry);
        if let Some(arrow) = entry.arrow() {
            path.push_str(&arrow);
        }
        vec![mode, owner, group, size, modified, path]
    }

    /// A grep match line, highlighted when colors are enabled.
    pub(crate) fn line(&self, found: &GrepMatch) -> String {
        if self.colors.is_some() {
            found.highlighted(MATCH_CODE)
        } else {
            found.line.clone()
        }
    }
}

fn format_time(time: SystemTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::from(time)
        .to_offset(offset)
        .format(LIST_TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| "1970/01/01-00:00".to_owned())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn formats_times_to_the_minute() {
        let text = format_time(UNIX_EPOCH + Duration::from_secs(86_400 * 365));
        assert_eq!(text.len(), "1971/01/01-00:00".len());
        assert!(!text.contains(' '));
        assert!(text.starts_with("197"));
    }

    #[test]
    fn plain_lines_are_not_highlighted() {
        let found = GrepMatch {
            line_number: 3,
            line: "a needle here".to_owned(),
            range: 2..8,
        };
        assert_eq!(Renderer::default().line(&found), "a needle here");
    }

    #[test]
    fn colored_lines_highlight_the_match() {
        let renderer = Renderer {
            colors: Some(ColorTable::default()),
            long: false,
        };
        let found = GrepMatch {
            line_number: 1,
            line: "needle".to_owned(),
            range: 0..6,
        };
        assert_eq!(renderer.line(&found), "\x1b[01;31mneedle\x1b[m");
    }
}
