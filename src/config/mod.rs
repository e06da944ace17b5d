// Rule file loading and runtime settings

mod args;
mod env;

pub use args::Args;

use crate::engine::{FilterMode, MatchKind, Rule, RuleKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_RULES_PATH: &str = "rules.toml";

/// Template written in place of a missing rule file
const RULES_TEMPLATE: &str = r##"# procrules rule file
#
# Rules are applied once, in order. Each rule selects processes by name and
# either changes their scheduling priority or terminates them.
#
# [[rules]]
# name = "tame browsers"        # optional, defaults to "#<n>"
# kind = "set_priority"         # set_priority | terminate
# match = "pattern"             # exact | pattern
# first = false                 # act on the first match only
# args = ["^chrom", "low"]      # [query, priority designator]
#
# [[rules]]
# name = "stop runaway miner"
# kind = "terminate"
# match = "exact"
# args = ["xmrig", "true"]      # [query, kill entire process tree]
"##;

/// Runtime settings assembled from CLI arguments and environment overrides
#[derive(Debug, Clone)]
pub struct Settings {
    pub rules_path: PathBuf,
    pub dry_run: bool,
    pub debug: bool,
    pub syslog: bool,
}

impl Settings {
    /// Create settings from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let settings = Self {
            rules_path: args
                .rules
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_PATH)),
            dry_run: args.dry_run,
            debug: args.debug,
            syslog: args.syslog,
        };

        // Apply environment variable overrides
        env::apply_env_overrides(settings)
    }
}

/// Raw rule file contents before validation
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    name: Option<String>,
    kind: String,
    #[serde(rename = "match")]
    match_kind: String,
    #[serde(default)]
    first: bool,
    #[serde(default)]
    args: Vec<String>,
}

/// Load and validate the rule file.
///
/// A missing file is not an error: a commented template is written in its
/// place and an empty rule list is returned. Rules with unrecognized kinds
/// or match modes are dropped with a warning and never reach the executor.
/// Unnamed rules get a positional placeholder counting accepted rules only.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    if !path.exists() {
        fs::write(path, RULES_TEMPLATE)
            .with_context(|| format!("Failed to create rule file template at {}", path.display()))?;
        log::info!("Created rule file template at {}", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file {}", path.display()))?;
    let file: RuleFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse rule file {}", path.display()))?;

    let mut rules = Vec::new();
    for raw in file.rules {
        let Some(kind) = parse_kind(&raw.kind) else {
            log::warn!("Dropping rule with unrecognized kind '{}'", raw.kind);
            continue;
        };

        let Some(match_kind) = parse_match_kind(&raw.match_kind) else {
            log::warn!(
                "Dropping rule with unrecognized match mode '{}'",
                raw.match_kind
            );
            continue;
        };

        let name = raw
            .name
            .unwrap_or_else(|| format!("#{}", rules.len() + 1));

        rules.push(Rule {
            name,
            kind,
            filter: FilterMode {
                kind: match_kind,
                first_only: raw.first,
            },
            args: raw.args,
        });
    }

    Ok(rules)
}

fn parse_kind(text: &str) -> Option<RuleKind> {
    match text.to_lowercase().as_str() {
        "set_priority" | "setpriority" => Some(RuleKind::SetPriority),
        "terminate" | "kill" | "killprocess" => Some(RuleKind::Kill),
        _ => None,
    }
}

fn parse_match_kind(text: &str) -> Option<MatchKind> {
    match text.to_lowercase().as_str() {
        "exact" | "by_name" | "by_name_exact" => Some(MatchKind::Exact),
        "pattern" | "by_name_match" | "by_name_pattern" | "by_pattern" => Some(MatchKind::Pattern),
        _ => None,
    }
}
