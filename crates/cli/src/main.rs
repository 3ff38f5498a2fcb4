use clap::{Parser, Subcommand};

mod commands;

use commands::{ScanArgs, ScanSnapshotArgs};

#[derive(Parser)]
#[command(name = "edge-scan")]
#[command(
    about = "Political market probability gaps between Polymarket and bookmakers",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live markets and odds, then report edges
    Scan(ScanArgs),
    /// Report edges from saved market and event JSON files
    ScanSnapshot(ScanSnapshotArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan(args) => {
            commands::scan::run(args).await?;
        }
        Commands::ScanSnapshot(args) => {
            commands::scan_snapshot::run(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "edge-scan",
            "scan",
            "--min-delta",
            "3",
            "--direction",
            "poly",
            "--any-days",
            "--limit",
            "50",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.filters.min_delta, Some(3.0));
                assert!(args.filters.any_days);
                assert_eq!(args.limit, Some(50));
                assert!(args.filters.json);
            }
            Commands::ScanSnapshot(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_max_days_conflicts_with_any_days() {
        let result = Cli::try_parse_from(["edge-scan", "scan", "--max-days", "10", "--any-days"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_requires_files() {
        assert!(Cli::try_parse_from(["edge-scan", "scan-snapshot"]).is_err());
        assert!(Cli::try_parse_from([
            "edge-scan",
            "scan-snapshot",
            "--markets",
            "m.json",
            "--events",
            "e.json",
        ])
        .is_ok());
    }
}
