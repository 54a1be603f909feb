//! Change log accumulator shared by the repair components.

use std::fmt;

/// Ordered, human-readable record of the mutations applied to one document.
///
/// Components append to a shared log; [`ChangeLog::mark`] and
/// [`ChangeLog::changed_since`] let each one report whether *it* changed
/// anything without owning the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: Vec<String>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change: impl Into<String>) {
        self.entries.push(change.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    /// Position to compare against later with [`changed_since`](Self::changed_since).
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    pub fn changed_since(&self, mark: usize) -> bool {
        self.entries.len() > mark
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.join("; "))
    }
}
