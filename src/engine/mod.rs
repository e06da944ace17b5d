// Rule model and execution engine

mod executor;
pub mod priority;
pub mod selector;

pub use executor::RuleExecutor;
pub use priority::PriorityLevel;

use std::fmt;

/// Action a rule applies to its matched processes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    SetPriority,
    Kill,
}

/// How the query string is matched against process names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-sensitive exact equality
    Exact,
    /// Case-insensitive regular expression, unanchored
    Pattern,
}

/// Composed selection strategy: matching kind plus cardinality modifier.
/// The two concerns are orthogonal; `first_only` applies to either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMode {
    pub kind: MatchKind,
    /// Keep only the first match in snapshot order
    pub first_only: bool,
}

/// A validated rule, immutable once loaded.
///
/// Arguments are positional: args[0] is the selector query, args[1] is
/// action-specific (priority designator or tree-kill flag).
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub kind: RuleKind,
    pub filter: FilterMode,
    pub args: Vec<String>,
}

impl Rule {
    /// Positional argument accessor; a missing argument is the empty string
    pub fn param(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }
}

/// One failed action on a single matched process
#[derive(Debug)]
pub struct ActionFailure {
    pub pid: i32,
    pub name: String,
    pub error: anyhow::Error,
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid {} ({}): {:#}", self.pid, self.name, self.error)
    }
}

/// Outcome of one rule: how many processes matched and every individual
/// action failure. An empty failure list means the rule succeeded, including
/// the common zero-match case.
#[derive(Debug)]
pub struct RuleReport {
    pub rule: String,
    pub matched: usize,
    pub failures: Vec<ActionFailure>,
}

impl RuleReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RuleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}': {} of {} action(s) failed",
            self.rule,
            self.failures.len(),
            self.matched
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ':' } else { ';' };
            write!(f, "{} {}", sep, failure)?;
        }
        Ok(())
    }
}

/// Totals for one pass over the rule list
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
