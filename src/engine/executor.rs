// Rule execution with per-process failure isolation

use super::{priority, selector, ActionFailure, Rule, RuleKind, RuleReport, RunSummary};
use crate::proc::{ProcEntry, ProcessTable};
use crate::sanitize_for_log;
use anyhow::{Context, Result};

/// Executes rules against an injected process table.
///
/// Rules run strictly in order, one process at a time. A failure acting on
/// one process is recorded and never stops the remaining processes of the
/// same rule, and a failed rule never stops the rules after it.
pub struct RuleExecutor<'a> {
    table: &'a dyn ProcessTable,
    dry_run: bool,
}

impl<'a> RuleExecutor<'a> {
    pub fn new(table: &'a dyn ProcessTable, dry_run: bool) -> Self {
        Self { table, dry_run }
    }

    /// Apply every rule in order, logging each outcome
    pub fn run_all(&self, rules: &[Rule]) -> RunSummary {
        let mut summary = RunSummary::default();

        for rule in rules {
            summary.executed += 1;
            log::info!("Executing rule '{}'", sanitize_for_log(&rule.name));

            match self.execute(rule) {
                Ok(report) if report.is_success() => {
                    log::info!(
                        "Rule '{}': ok ({} process(es))",
                        sanitize_for_log(&rule.name),
                        report.matched
                    );
                }
                Ok(report) => {
                    log::error!("{}", report);
                    summary.failed += 1;
                }
                Err(e) => {
                    log::error!("Rule '{}' failed: {:#}", sanitize_for_log(&rule.name), e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Execute one rule: snapshot, select, act.
    ///
    /// Per-process failures are collected in the report. An Err return means
    /// the rule itself could not run at all (unreadable process table,
    /// invalid pattern); the caller continues with the next rule either way.
    pub fn execute(&self, rule: &Rule) -> Result<RuleReport> {
        let snapshot = self
            .table
            .snapshot()
            .context("Failed to read process table")?;
        let matched = selector::select(&rule.filter, rule.param(0), &snapshot)?;

        log::debug!(
            "Rule '{}' matched {} of {} process(es)",
            sanitize_for_log(&rule.name),
            matched.len(),
            snapshot.len()
        );

        let failures = match rule.kind {
            RuleKind::SetPriority => self.set_priorities(rule, &matched),
            RuleKind::Kill => self.kill_processes(rule, &matched),
        };

        Ok(RuleReport {
            rule: rule.name.clone(),
            matched: matched.len(),
            failures,
        })
    }

    fn set_priorities(&self, rule: &Rule, matched: &[ProcEntry]) -> Vec<ActionFailure> {
        // Resolved once per rule, not per process
        let level = priority::resolve(rule.param(1));
        let mut failures = Vec::new();

        for process in matched {
            log::info!(" -- set pid={:>6} priority={}", process.pid, level);

            if self.dry_run {
                continue;
            }

            if let Err(e) = self.table.set_priority(process.pid, level) {
                failures.push(ActionFailure {
                    pid: process.pid,
                    name: process.name.clone(),
                    error: e,
                });
            }
        }

        failures
    }

    fn kill_processes(&self, rule: &Rule, matched: &[ProcEntry]) -> Vec<ActionFailure> {
        let entire_tree = is_truthy(rule.param(1));
        let mut failures = Vec::new();

        for process in matched {
            log::info!(" -- terminate pid={:>6} tree={}", process.pid, entire_tree);

            if self.dry_run {
                continue;
            }

            if let Err(e) = self.table.terminate(process.pid, entire_tree) {
                failures.push(ActionFailure {
                    pid: process.pid,
                    name: process.name.clone(),
                    error: e,
                });
            }
        }

        failures
    }
}

/// Tree-kill flag semantics: only "1" and "true" are truthy
fn is_truthy(text: &str) -> bool {
    matches!(text.to_lowercase().as_str(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FilterMode, MatchKind, PriorityLevel};
    use anyhow::bail;
    use std::cell::RefCell;

    /// Synthetic process table with an explicitly ordered snapshot and a
    /// configurable set of pids whose actions fail
    struct MockTable {
        procs: Vec<ProcEntry>,
        fail_pids: Vec<i32>,
        priority_calls: RefCell<Vec<(i32, PriorityLevel)>>,
        kill_calls: RefCell<Vec<(i32, bool)>>,
    }

    impl MockTable {
        fn new(procs: Vec<(i32, &str)>) -> Self {
            Self {
                procs: procs
                    .into_iter()
                    .map(|(pid, name)| ProcEntry {
                        pid,
                        name: name.to_string(),
                    })
                    .collect(),
                fail_pids: Vec::new(),
                priority_calls: RefCell::new(Vec::new()),
                kill_calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(mut self, pids: &[i32]) -> Self {
            self.fail_pids = pids.to_vec();
            self
        }
    }

    impl ProcessTable for MockTable {
        fn snapshot(&self) -> Result<Vec<ProcEntry>> {
            Ok(self.procs.clone())
        }

        fn set_priority(&self, pid: i32, level: PriorityLevel) -> Result<()> {
            self.priority_calls.borrow_mut().push((pid, level));
            if self.fail_pids.contains(&pid) {
                bail!("permission denied signalling process {}", pid);
            }
            Ok(())
        }

        fn terminate(&self, pid: i32, entire_tree: bool) -> Result<()> {
            self.kill_calls.borrow_mut().push((pid, entire_tree));
            if self.fail_pids.contains(&pid) {
                bail!("permission denied signalling process {}", pid);
            }
            Ok(())
        }
    }

    fn rule(kind: RuleKind, match_kind: MatchKind, first_only: bool, args: &[&str]) -> Rule {
        Rule {
            name: "test rule".to_string(),
            kind,
            filter: FilterMode {
                kind: match_kind,
                first_only,
            },
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_set_priority_exact_match_end_to_end() {
        // Two "notepad" processes get AboveNormal, "notepad2" is untouched
        let table = MockTable::new(vec![(10, "notepad"), (11, "notepad"), (12, "notepad2")]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(
            RuleKind::SetPriority,
            MatchKind::Exact,
            false,
            &["notepad", "high"],
        );
        let report = executor.execute(&rule).unwrap();

        assert!(report.is_success());
        assert_eq!(report.matched, 2);
        assert_eq!(
            *table.priority_calls.borrow(),
            vec![
                (10, PriorityLevel::ABOVE_NORMAL),
                (11, PriorityLevel::ABOVE_NORMAL)
            ]
        );
    }

    #[test]
    fn test_kill_pattern_first_with_tree_flag_end_to_end() {
        // Three matches for the pattern, only the first is terminated,
        // with entire-tree semantics requested
        let table = MockTable::new(vec![
            (100, "bash"),
            (101, "chrome"),
            (102, "chrome-sandbox"),
            (103, "chrome"),
        ]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(
            RuleKind::Kill,
            MatchKind::Pattern,
            true,
            &["^chrome.*", "true"],
        );
        let report = executor.execute(&rule).unwrap();

        assert!(report.is_success());
        assert_eq!(report.matched, 1);
        assert_eq!(*table.kill_calls.borrow(), vec![(101, true)]);
    }

    #[test]
    fn test_kill_failure_does_not_stop_siblings() {
        // One of three terminations fails: the aggregate carries exactly one
        // cause and the other two processes were still attempted
        let table =
            MockTable::new(vec![(1, "worker"), (2, "worker"), (3, "worker")]).failing_on(&[2]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(RuleKind::Kill, MatchKind::Exact, false, &["worker"]);
        let report = executor.execute(&rule).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].pid, 2);
        assert_eq!(
            *table.kill_calls.borrow(),
            vec![(1, false), (2, false), (3, false)]
        );
    }

    #[test]
    fn test_set_priority_failure_does_not_stop_siblings() {
        let table = MockTable::new(vec![(1, "svc"), (2, "svc")]).failing_on(&[1]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(RuleKind::SetPriority, MatchKind::Exact, false, &["svc", "low"]);
        let report = executor.execute(&rule).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].pid, 1);
        assert_eq!(table.priority_calls.borrow().len(), 2);
    }

    #[test]
    fn test_zero_matches_succeeds_with_no_side_effects() {
        let table = MockTable::new(vec![(1, "bash")]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(
            RuleKind::SetPriority,
            MatchKind::Exact,
            false,
            &["notepad", "high"],
        );
        let report = executor.execute(&rule).unwrap();

        assert!(report.is_success());
        assert_eq!(report.matched, 0);
        assert!(table.priority_calls.borrow().is_empty());
        assert!(table.kill_calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_priority_argument_falls_back_to_idle() {
        let table = MockTable::new(vec![(1, "bash")]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(RuleKind::SetPriority, MatchKind::Exact, false, &["bash"]);
        let report = executor.execute(&rule).unwrap();

        assert!(report.is_success());
        assert_eq!(*table.priority_calls.borrow(), vec![(1, PriorityLevel::IDLE)]);
    }

    #[test]
    fn test_tree_flag_defaults_to_false() {
        let table = MockTable::new(vec![(1, "bash"), (2, "bash")]);
        let executor = RuleExecutor::new(&table, false);

        let rule = rule(RuleKind::Kill, MatchKind::Exact, false, &["bash"]);
        executor.execute(&rule).unwrap();

        assert_eq!(*table.kill_calls.borrow(), vec![(1, false), (2, false)]);
    }

    #[test]
    fn test_dry_run_performs_no_actions() {
        let table = MockTable::new(vec![(1, "bash")]);
        let executor = RuleExecutor::new(&table, true);

        let kill = rule(RuleKind::Kill, MatchKind::Exact, false, &["bash", "true"]);
        let renice = rule(RuleKind::SetPriority, MatchKind::Exact, false, &["bash", "low"]);

        assert!(executor.execute(&kill).unwrap().is_success());
        assert!(executor.execute(&renice).unwrap().is_success());
        assert!(table.kill_calls.borrow().is_empty());
        assert!(table.priority_calls.borrow().is_empty());
    }

    #[test]
    fn test_invalid_pattern_fails_the_rule_but_not_the_run() {
        let table = MockTable::new(vec![(1, "bash")]);
        let executor = RuleExecutor::new(&table, false);

        let bad = rule(RuleKind::Kill, MatchKind::Pattern, false, &["[invalid"]);
        let good = rule(RuleKind::Kill, MatchKind::Exact, false, &["bash"]);

        let summary = executor.run_all(&[bad, good]);
        assert_eq!(summary.executed, 2);
        assert_eq!(summary.failed, 1);
        // The rule after the failing one still ran
        assert_eq!(*table.kill_calls.borrow(), vec![(1, false)]);
    }

    #[test]
    fn test_run_all_counts_partial_failures() {
        let table = MockTable::new(vec![(1, "a"), (2, "b")]).failing_on(&[2]);
        let executor = RuleExecutor::new(&table, false);

        let ok = rule(RuleKind::Kill, MatchKind::Exact, false, &["a"]);
        let failing = rule(RuleKind::Kill, MatchKind::Exact, false, &["b"]);

        let summary = executor.run_all(&[ok, failing]);
        assert_eq!(summary.executed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy(""));
    }
}
