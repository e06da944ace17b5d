// Environment variable configuration support

use super::Settings;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Apply environment variable overrides to settings
pub fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
    if let Ok(val) = env::var("PROCRULES_RULES") {
        settings.rules_path = PathBuf::from(val);
    }

    if let Ok(val) = env::var("PROCRULES_DRY_RUN") {
        settings.dry_run = parse_bool(&val)?;
    }

    if let Ok(val) = env::var("PROCRULES_DEBUG") {
        settings.debug = parse_bool(&val)?;
    }

    Ok(settings)
}

/// Parse boolean value from string
/// Accepts: true/false, 1/0, yes/no, on/off (case-insensitive)
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean value: {}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(parse_bool("yes").unwrap());
        assert!(parse_bool("on").unwrap());

        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("no").unwrap());
        assert!(!parse_bool("off").unwrap());

        assert!(parse_bool("invalid").is_err());
    }
}
