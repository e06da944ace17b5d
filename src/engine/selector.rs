// Process selection logic

use super::{FilterMode, MatchKind};
use crate::proc::ProcEntry;
use anyhow::{bail, Context, Result};
use regex::{Regex, RegexBuilder};

/// Maximum allowed length for name patterns to prevent ReDoS attacks
const MAX_PATTERN_LENGTH: usize = 256;

/// Maximum compiled regex size in bytes (10MB) to prevent memory exhaustion
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Select the processes a rule applies to.
///
/// Exact matching is case-sensitive string equality against the process
/// name; pattern matching is a case-insensitive, unanchored regex search.
/// Matches come back in snapshot order, and under `first_only` at most one
/// entry is kept. Zero matches is a valid empty result, not an error.
pub fn select(filter: &FilterMode, query: &str, snapshot: &[ProcEntry]) -> Result<Vec<ProcEntry>> {
    let mut matched: Vec<ProcEntry> = match filter.kind {
        MatchKind::Exact => snapshot
            .iter()
            .filter(|p| p.name == query)
            .cloned()
            .collect(),
        MatchKind::Pattern => {
            let pattern = compile_pattern(query)?;
            snapshot
                .iter()
                .filter(|p| pattern.is_match(&p.name))
                .cloned()
                .collect()
        }
    };

    if filter.first_only {
        matched.truncate(1);
    }

    Ok(matched)
}

/// Compile a name pattern with safety limits.
///
/// Applies the following protections:
/// - Limits pattern length to MAX_PATTERN_LENGTH characters
/// - Sets a compiled size limit to prevent memory exhaustion
fn compile_pattern(pattern: &str) -> Result<Regex> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        // Truncate on a char boundary; patterns come from the rule file and
        // may be multibyte
        let preview: String = pattern.chars().take(50).collect();
        bail!(
            "Pattern too long (max {} chars): {}...",
            MAX_PATTERN_LENGTH,
            preview
        );
    }

    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .context(format!("Invalid pattern: {}", pattern))
}
