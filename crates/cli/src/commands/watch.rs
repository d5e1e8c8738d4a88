use anyhow::Result;
use hopper_core::pools::PoolSelector;
use std::{future::Future, io, time::Duration};
use tokio::{signal, time::MissedTickBehavior};
use tracing::{error, info, warn};

use super::{print_ranking, OutputFormat};

/// Re-reads the account file and prints a fresh ranking every `interval` until Ctrl+C.
///
/// A failed reload keeps the previous pool list.
pub async fn watch(
    selector: &PoolSelector,
    interval: Duration,
    format: OutputFormat,
) -> Result<()> {
    watch_until(selector, interval, format, signal::ctrl_c()).await
}

/// Runs the watch loop until `shutdown` resolves.
///
/// `shutdown` is created once and polled across every pass, so a signal that lands while a
/// ranking pass is running is seen as soon as that pass ends.
pub async fn watch_until<S>(
    selector: &PoolSelector,
    interval: Duration,
    format: OutputFormat,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(interval_secs = interval.as_secs(), "watching pool ranking");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = selector.reload() {
                    warn!(error = %e, "keeping previous account list");
                }
                print_ranking(selector, format).await?;
                if format == OutputFormat::Table {
                    println!();
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!(error = %e, "Failed to install Ctrl+C handler");
                }
                info!("stopping watch");
                return Ok(());
            }
        }
    }
}
