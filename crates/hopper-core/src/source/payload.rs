//! Parsers for the two external payload formats.
//!
//! - Difficulty: a plain-text body holding one decimal number.
//! - Bulk stats: a JSON object with `rates` (`pool -> float`) and `recent_blocks`
//!   (`pool -> { "<unix timestamp>" -> probability }`). Unknown top-level keys are ignored.

use serde::Deserialize;
use std::collections::HashMap;

use crate::{
    source::FetchError,
    stats::{PoolStats, RoundShare, StatsSnapshot},
};

#[derive(Debug, Deserialize)]
struct BulkStatsPayload {
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    recent_blocks: HashMap<String, HashMap<String, f64>>,
}

/// Parses the difficulty endpoint's body.
///
/// # Errors
///
/// Returns [`FetchError::InvalidResponse`] unless the body is a finite, positive number.
pub fn parse_difficulty(body: &str) -> Result<f64, FetchError> {
    let trimmed = body.trim();
    let difficulty: f64 = trimmed.parse().map_err(|_| {
        FetchError::InvalidResponse(format!("difficulty is not a number: {trimmed:.64}"))
    })?;

    if !difficulty.is_finite() || difficulty <= 0.0 {
        return Err(FetchError::InvalidResponse(format!("difficulty out of range: {difficulty}")));
    }

    Ok(difficulty)
}

/// Parses the bulk stats endpoint's JSON body into a [`StatsSnapshot`].
///
/// Pools that appear only in `recent_blocks` get a zero rate; pools that appear only in
/// `rates` get an empty round history. Round entries whose timestamp key is not numeric are
/// dropped individually rather than failing the whole payload.
///
/// # Errors
///
/// Returns [`FetchError::InvalidResponse`] if the body is not a JSON object of that shape.
pub fn parse_bulk_stats(body: &str) -> Result<StatsSnapshot, FetchError> {
    let payload: BulkStatsPayload = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed stats payload: {e}")))?;

    let mut pools: HashMap<String, PoolStats> = HashMap::new();

    for (pool, rate) in payload.rates {
        pools.entry(pool).or_default().rate = rate;
    }

    for (pool, blocks) in payload.recent_blocks {
        let rounds: Vec<RoundShare> = blocks
            .into_iter()
            .filter_map(|(timestamp, probability)| match timestamp.trim().parse::<f64>() {
                Ok(ts) if ts.is_finite() && probability.is_finite() => {
                    Some(RoundShare { timestamp: ts, probability })
                }
                _ => {
                    tracing::debug!(
                        pool = %pool,
                        timestamp = %timestamp,
                        "skipping malformed round entry"
                    );
                    None
                }
            })
            .collect();

        let entry = pools.entry(pool).or_default();
        *entry = PoolStats::new(entry.rate, rounds);
    }

    Ok(StatsSnapshot::new(pools))
}
