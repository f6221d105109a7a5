use std::fmt;

use logging::debug_log;

use crate::entry::Entry;
use crate::error::WalkError;

type ReportFn<'a> = dyn FnMut(&WalkError) + 'a;
type FallbackFn<'a> = dyn FnMut(&WalkError, Option<&Entry<'_>>) + 'a;

/// What the walker does with recoverable errors.
///
/// Only errors for which [`WalkError::is_recoverable`] holds reach the
/// policy; all others abort the traversal regardless of the policy chosen.
#[derive(Default)]
pub enum ErrorPolicy<'a> {
    /// Abort the traversal with the error.
    #[default]
    Propagate,
    /// Report the error and skip the affected entry or directory.
    Callback(Box<ReportFn<'a>>),
    /// Like [`ErrorPolicy::Callback`], also passing the entry being visited
    /// when there is one.
    Fallback(Box<FallbackFn<'a>>),
}

impl<'a> ErrorPolicy<'a> {
    /// Reports errors to `report` and keeps walking. The closure's return
    /// value is ignored.
    pub fn callback<F, R>(mut report: F) -> Self
    where
        F: FnMut(&WalkError) -> R + 'a,
    {
        Self::Callback(Box::new(move |error| {
            let _ = report(error);
        }))
    }

    /// Hands errors, together with the current entry, to `fallback` and keeps
    /// walking.
    pub fn fallback<F>(fallback: F) -> Self
    where
        F: FnMut(&WalkError, Option<&Entry<'_>>) + 'a,
    {
        Self::Fallback(Box::new(fallback))
    }

    /// Reports whether recoverable errors are absorbed.
    #[must_use]
    pub const fn recovers(&self) -> bool {
        !matches!(self, Self::Propagate)
    }

    /// Absorbs `error` if the policy allows it, otherwise returns it.
    pub(crate) fn recover(
        &mut self,
        error: WalkError,
        entry: Option<&Entry<'_>>,
    ) -> Result<(), WalkError> {
        if !error.is_recoverable() {
            return Err(error);
        }
        match self {
            Self::Propagate => Err(error),
            Self::Callback(report) => {
                debug_log!(Policy, 1, "reporting recoverable error: {}", error);
                report(&error);
                Ok(())
            }
            Self::Fallback(fallback) => {
                debug_log!(Policy, 1, "falling back on recoverable error: {}", error);
                fallback(&error, entry);
                Ok(())
            }
        }
    }

    /// Runs `result` through the policy: `Ok(None)` means the error was
    /// absorbed and the caller should skip the affected item.
    pub(crate) fn guard<T>(
        &mut self,
        entry: Option<&Entry<'_>>,
        result: Result<T, WalkError>,
    ) -> Result<Option<T>, WalkError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => self.recover(error, entry).map(|()| None),
        }
    }
}

impl fmt::Debug for ErrorPolicy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => f.write_str("Propagate"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Fallback(_) => f.write_str("Fallback(..)"),
        }
    }
}
