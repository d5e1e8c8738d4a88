use hopper_core::pools::{EndpointEntry, RankedPool, ScoringVariant};
use serde::Serialize;
use std::fmt::Write;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

#[derive(Debug, Serialize)]
struct RankedPoolView<'a> {
    rank: usize,
    pool: &'a str,
    variant: ScoringVariant,
    utility: f64,
    priority: u32,
    fee: f64,
    donation: f64,
}

#[derive(Debug, Serialize)]
struct EndpointView<'a> {
    pool: &'a str,
    endpoint: &'a str,
    username: &'a str,
    password: &'a str,
}

pub fn ranking_json(ranked: &[RankedPool]) -> serde_json::Result<String> {
    let views: Vec<RankedPoolView<'_>> = ranked
        .iter()
        .enumerate()
        .map(|(index, pool)| RankedPoolView {
            rank: index + 1,
            pool: pool.name(),
            variant: pool.variant(),
            utility: pool.utility,
            priority: pool.priority(),
            fee: pool.descriptor.fee,
            donation: pool.account.donation,
        })
        .collect();
    serde_json::to_string_pretty(&views)
}

pub fn endpoints_json(entries: &[EndpointEntry]) -> serde_json::Result<String> {
    let views: Vec<EndpointView<'_>> = entries
        .iter()
        .map(|entry| EndpointView {
            pool: entry.pool,
            endpoint: entry.endpoint,
            username: &entry.username,
            password: &entry.password,
        })
        .collect();
    serde_json::to_string_pretty(&views)
}

pub fn ranking_table(ranked: &[RankedPool]) -> String {
    if ranked.is_empty() {
        return "No pools configured.\n".to_string();
    }

    let mut out = format!(
        "{:<4} {:<14} {:<13} {:>14} {:>8}\n",
        "#", "POOL", "VARIANT", "UTILITY", "PRIORITY"
    );
    for (index, pool) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<14} {:<13} {:>14.8} {:>8}",
            index + 1,
            pool.name(),
            pool.variant().as_str(),
            pool.utility,
            pool.priority()
        );
    }
    out
}

/// Passwords are never printed in table form.
pub fn endpoints_table(entries: &[EndpointEntry]) -> String {
    if entries.is_empty() {
        return "No endpoints available.\n".to_string();
    }

    let mut out = format!("{:<14} {:<30} {}\n", "POOL", "ENDPOINT", "USERNAME");
    for entry in entries {
        let _ = writeln!(out, "{:<14} {:<30} {}", entry.pool, entry.endpoint, entry.username);
    }
    out
}
