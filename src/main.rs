// procrules - main entry point

use procrules::config::{load_rules, Args, Settings};
use procrules::engine::RuleExecutor;
use procrules::proc::SystemProcessTable;
use std::process;

/// Setup logging based on configuration
fn setup_logging(debug: bool, use_syslog: bool) {
    let log_level = if debug { "debug" } else { "info" };

    if use_syslog {
        #[cfg(feature = "syslog")]
        {
            use syslog::{BasicLogger, Facility, Formatter3164};
            let formatter = Formatter3164 {
                facility: Facility::LOG_USER,
                hostname: None,
                process: "procrules".into(),
                pid: std::process::id(),
            };

            match syslog::unix(formatter) {
                Ok(logger) => {
                    let level = if debug {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    };
                    if log::set_boxed_logger(Box::new(BasicLogger::new(logger)))
                        .map(|()| log::set_max_level(level))
                        .is_ok()
                    {
                        return;
                    }
                }
                Err(e) => eprintln!("Failed to connect to syslog: {e}"),
            }
        }

        #[cfg(not(feature = "syslog"))]
        eprintln!("Warning: --syslog requires the 'syslog' feature to be enabled");
    }

    // Fallback to env_logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Assemble settings from arguments and environment overrides
    let settings = match Settings::from_args(args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    setup_logging(settings.debug, settings.syslog);

    // Load the rule file; a missing file leaves a template behind
    let rules = match load_rules(&settings.rules_path) {
        Ok(rules) => rules,
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    };

    if rules.is_empty() {
        log::info!(
            "No rules to apply ({})",
            settings.rules_path.display()
        );
        return;
    }

    if settings.dry_run {
        log::warn!("DRY RUN MODE - will not touch the process table");
    }

    // Apply every rule in file order; one failed rule never stops the rest
    let table = SystemProcessTable::new();
    let executor = RuleExecutor::new(&table, settings.dry_run);
    let summary = executor.run_all(&rules);

    log::info!(
        "Applied {} rule(s), {} failed",
        summary.executed,
        summary.failed
    );

    if !summary.is_success() {
        process::exit(1);
    }
}
