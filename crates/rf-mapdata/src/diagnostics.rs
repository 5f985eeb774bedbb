//! Non-fatal diagnostics collected while loading and checking data

use std::fmt;

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was being loaded or checked (`terrain t_wall`, `cardreader`, ...)
    pub context: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

/// Sink for data and usage errors that must never abort the process.
///
/// Every entry is also forwarded to the `log` facade at warn level.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, context: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            context: context.into(),
            message: message.into(),
        };
        log::warn!(target: "rf_mapdata", "{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|d| d.message.contains(needle))
            .count()
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_query() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());
        diag.report("terrain t_wall", "invalid terrain t_nope for opening t_wall");
        diag.report("terrain t_door", "invalid terrain t_nope for closing t_door");
        assert_eq!(diag.len(), 2);
        assert!(diag.contains("for opening"));
        assert_eq!(diag.count_matching("t_nope"), 2);
        assert_eq!(
            diag.iter().next().map(ToString::to_string).as_deref(),
            Some("terrain t_wall: invalid terrain t_nope for opening t_wall")
        );
    }

    #[test]
    fn test_take_empties() {
        let mut diag = Diagnostics::new();
        diag.report("x", "y");
        let taken = diag.take();
        assert_eq!(taken.len(), 1);
        assert!(diag.is_empty());
    }
}
