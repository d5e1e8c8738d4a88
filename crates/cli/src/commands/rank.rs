use anyhow::{Context, Result};
use hopper_core::pools::{flatten_endpoints, PoolSelector};
use tracing::debug;

use super::output::{endpoints_json, endpoints_table, ranking_json, ranking_table, OutputFormat};

/// Ranks the configured pools once and prints them best first.
pub async fn print_ranking(selector: &PoolSelector, format: OutputFormat) -> Result<()> {
    let ranked = selector.rank().await;
    debug!(pools = ranked.len(), "printing ranking");

    match format {
        OutputFormat::Json => {
            println!("{}", ranking_json(&ranked).context("failed to serialize ranking")?);
        }
        OutputFormat::Table => print!("{}", ranking_table(&ranked)),
    }
    Ok(())
}

/// Ranks once and prints the flattened endpoint list a mining client should try in order.
pub async fn print_endpoints(selector: &PoolSelector, format: OutputFormat) -> Result<()> {
    let entries = flatten_endpoints(&selector.rank().await);
    debug!(endpoints = entries.len(), "printing endpoints");

    match format {
        OutputFormat::Json => {
            println!("{}", endpoints_json(&entries).context("failed to serialize endpoints")?);
        }
        OutputFormat::Table => print!("{}", endpoints_table(&entries)),
    }
    Ok(())
}
