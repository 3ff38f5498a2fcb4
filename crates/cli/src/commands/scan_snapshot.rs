//! CLI command for an offline scan over saved JSON snapshots.

use super::{execute_scan, print_output, FilterArgs};
use anyhow::{Context, Result};
use clap::Args;
use edge_scanner_engine::{MarketRecord, OddsEvent};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Arguments for the snapshot scan command.
#[derive(Args, Debug)]
pub struct ScanSnapshotArgs {
    /// JSON file holding an array of market records
    #[arg(long)]
    pub markets: PathBuf,

    /// JSON file holding an array of bookmaker events
    #[arg(long)]
    pub events: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs a scan over snapshot files.
pub fn run(args: ScanSnapshotArgs) -> Result<()> {
    let config = args.filters.load_config()?;
    let filter = args.filters.signal_filter(&config.filter);

    let records: Vec<MarketRecord> = read_json(&args.markets)?;
    let events: Vec<OddsEvent> = read_json(&args.events)?;

    let output = execute_scan(&records, &events, config.scan.to_match_config(), &filter);
    print_output(&output, args.filters.json)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_json_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "Q?", "outcomes": ["Yes", "No"], "probabilities": [0.6, 0.4]}}]"#
        )
        .unwrap();

        let records: Vec<MarketRecord> = read_json(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].yes_probability(), Some(0.6));
    }

    #[test]
    fn test_read_json_missing_file() {
        let err = read_json::<Vec<OddsEvent>>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_read_json_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = read_json::<Vec<OddsEvent>>(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
