// procrules - one-shot process rule engine library

pub mod config;
pub mod engine;
pub mod proc;

// Re-export commonly used types
pub use engine::{Rule, RuleExecutor, RuleReport};
pub use proc::{ProcEntry, ProcessTable};

/// Strip control characters from untrusted process names before logging
pub fn sanitize_for_log(name: &str) -> String {
    name.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("chrome"), "chrome");
        assert_eq!(sanitize_for_log("bad\x1b[31mname\n"), "bad[31mname");
    }
}
