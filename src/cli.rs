//! Command-line interface argument parsing.
//!
//! Every flag is optional: running the binary with no arguments collects the
//! default regions from the default repository and writes the default file.

use clap::Parser;
use std::path::PathBuf;

/// standings-sync - pull the latest regional standings into one JSON file
///
/// Finds the newest dated snapshot for each region in the standings
/// repository, parses its markdown table and writes a consolidated
/// JSON document.
///
/// Examples:
///   standings-sync
///   standings-sync --output site/data/rankings.json
///   standings-sync --year 2024 --dry-run
///   standings-sync --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .standings-sync.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the rankings document
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use this year's snapshots instead of the latest year
    #[arg(long, value_name = "YEAR")]
    pub year: Option<u16>,

    /// API token for the repository host
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Resolve snapshot files and print them without fetching or writing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .standings-sync.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(year) = self.year {
            if !(1000..=9999).contains(&year) {
                return Err(format!("Year must have four digits, got {}", year));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_valid() {
        let args = Args::try_parse_from(["standings-sync"]).unwrap();
        assert!(args.output.is_none());
        assert!(!args.dry_run);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "standings-sync",
            "--output",
            "out.json",
            "--year",
            "2024",
            "--timeout",
            "30",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.year, Some(2024));
        assert_eq!(args.timeout, Some(30));
        assert!(args.dry_run);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = Args {
            verbose: true,
            quiet: true,
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let args = Args {
            timeout: Some(0),
            ..Args::default()
        };
        assert!(args.validate().is_err());

        let args = Args {
            year: Some(24),
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
