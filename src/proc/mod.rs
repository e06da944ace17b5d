// Process table access

mod system;

pub use system::SystemProcessTable;

use crate::engine::priority::PriorityLevel;
use anyhow::Result;

/// One row of a process-table snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcEntry {
    pub pid: i32,
    pub name: String,
}

impl std::fmt::Display for ProcEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PID {} ({})", self.pid, self.name)
    }
}

/// Capability object over the OS process table.
///
/// The engine never holds entries across rules: every rule takes a fresh
/// snapshot and acts on the pids it found, so entries can go stale between
/// selection and action. Actions are best-effort and individually failable.
pub trait ProcessTable {
    /// Current list of visible processes, in provider-defined order
    fn snapshot(&self) -> Result<Vec<ProcEntry>>;

    /// Assign a scheduling priority level to one process
    fn set_priority(&self, pid: i32, level: PriorityLevel) -> Result<()>;

    /// Terminate one process, optionally its entire tree
    fn terminate(&self, pid: i32, entire_tree: bool) -> Result<()>;
}
