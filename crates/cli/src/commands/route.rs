//! `route` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{Document, RouteEntry};
use fanout::FanoutRouter;
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::RouteArgs;
use crate::error::CliError;

/// One routing entry for JSON output
#[derive(Serialize)]
struct EntryOutput<'a> {
    position: usize,
    destination: &'a str,
    payload: &'a Document,
}

#[derive(Serialize)]
struct RouteOutput<'a> {
    splitter: &'a str,
    data_units: usize,
    entries: Vec<EntryOutput<'a>>,
}

/// Execute the `route` command
pub fn run_route(args: &RouteArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let splitter = blueprint
        .splitter(&args.splitter)
        .ok_or_else(|| CliError::unknown_splitter(&args.splitter))?;

    let doc = read_payload(&args.payload)?;
    let router = FanoutRouter::new(splitter.mode.clone());
    let summary = router
        .route_with_summary(&doc, &splitter.destinations)
        .with_context(|| format!("Failed to route payload through '{}'", splitter.name))?;

    info!(
        splitter = %splitter.name,
        data_units = summary.data_units,
        entries = summary.entries.len(),
        "Payload routed"
    );

    if args.json {
        let output = RouteOutput {
            splitter: &splitter.name,
            data_units: summary.data_units,
            entries: entry_outputs(&summary.entries),
        };
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialize routing list")?;
        println!("{}", json);
    } else {
        println!(
            "{}: {} data units, {} entries",
            splitter.name,
            summary.data_units,
            summary.entries.len()
        );
        for (position, entry) in summary.entries.iter().enumerate() {
            let payload = serde_json::to_string(entry.payload.as_ref())
                .context("Failed to serialize payload")?;
            println!("  [{}] -> {}: {}", position, entry.destination, payload);
        }
    }

    Ok(())
}

fn entry_outputs(entries: &[RouteEntry]) -> Vec<EntryOutput<'_>> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| EntryOutput {
            position,
            destination: &entry.destination,
            payload: &entry.payload,
        })
        .collect()
}

/// Read a JSON payload document
fn read_payload(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::payload(path.display().to_string(), e.to_string()))?;
    let doc = serde_json::from_str(&content)
        .map_err(|e| CliError::payload(path.display().to_string(), e.to_string()))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_payload() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"root":{"name":"Batch","children":[{"name":"Orders"}]}}"#)
            .unwrap();
        let doc = read_payload(file.path()).unwrap();
        assert!(doc.exists("Orders"));
    }

    #[test]
    fn test_read_payload_invalid_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"not json").unwrap();
        let err = read_payload(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read payload"));
    }
}
