use std::error::Error as StdError;

/// Control outcome a visitor returns for an entry.
///
/// Visitors report success with `Ok(())` and use `Err(Signal)` to stop early:
/// [`Entry::prune`](crate::Entry::prune) and
/// [`Entry::done`](crate::Entry::done) produce the control variants, while
/// any error type converts into [`Signal::Error`] through `?`.
#[derive(Debug)]
pub enum Signal {
    /// Finish the current entry's callback normally.
    Done,
    /// Skip the descendants of the current directory.
    Prune,
    /// The callback failed; the walker hands the failure to its error policy.
    Error(Box<dyn StdError + Send + Sync>),
}

impl Signal {
    /// Builds an error signal from a message or boxed error.
    pub fn error(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Error(error.into())
    }

    /// Reports whether this signal carries an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl<E> From<E> for Signal
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::Error(Box::new(error))
    }
}

/// Result type returned by visitor callbacks.
pub type VisitResult = Result<(), Signal>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn fails() -> VisitResult {
        Err(io::Error::other("disk on fire"))?;
        Ok(())
    }

    #[test]
    fn question_mark_converts_errors() {
        let signal = fails().expect_err("error signal");
        assert!(signal.is_error());
        match signal {
            Signal::Error(error) => assert_eq!(error.to_string(), "disk on fire"),
            other => panic!("unexpected signal {other:?}"),
        }
    }

    #[test]
    fn messages_become_error_signals() {
        let signal = Signal::error("custom");
        assert!(signal.is_error());
        assert!(!Signal::Prune.is_error());
        assert!(!Signal::Done.is_error());
    }
}
