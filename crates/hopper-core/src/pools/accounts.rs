//! Account file parsing.
//!
//! One account per line, fields separated by runs of whitespace:
//!
//! ```text
//! # identity    username       password   [donation_percent]
//! mtred         worker.1       x          1.5
//! eligius       1BitcoinAddr   x
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Lines that are short, name a pool
//! missing from the catalog, carry an unparseable donation, or repeat an identity already
//! seen are skipped; none of these fails the load. Earlier lines get higher priority.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::pools::catalog;

/// Errors that make the account source unusable as a whole.
#[derive(Debug, Error)]
pub enum AccountsError {
    /// The account file could not be read
    #[error("failed to read account file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Credentials and preferences for one configured pool.
#[derive(Clone, PartialEq)]
pub struct Account {
    /// Pool identity, guaranteed to exist in the catalog
    pub pool: String,
    pub username: String,
    pub password: String,
    /// Fraction of rewards donated, in `[0, 1)`
    pub donation: f64,
    /// Tie-break rank; the first line of the file has the highest value
    pub priority: u32,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("pool", &self.pool)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("donation", &self.donation)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Parses account lines, skipping anything unusable.
#[must_use]
pub fn parse_accounts(text: &str) -> Vec<Account> {
    let mut seen = HashSet::new();
    let mut accounts = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [pool, username, password, rest @ ..] = fields.as_slice() else {
            warn!(line = line_no, "skipping account line with fewer than 3 fields");
            continue;
        };

        if catalog::lookup(pool).is_none() {
            debug!(line = line_no, pool = %pool, "skipping account for unknown pool");
            continue;
        }

        let donation = match rest.first() {
            None => 0.0,
            Some(raw) => match raw.parse::<f64>() {
                Ok(percent) if percent.is_finite() && (0.0..100.0).contains(&percent) => {
                    percent / 100.0
                }
                _ => {
                    warn!(
                        line = line_no,
                        pool = %pool,
                        donation = %raw,
                        "skipping account with invalid donation"
                    );
                    continue;
                }
            },
        };

        if !seen.insert(*pool) {
            warn!(line = line_no, pool = %pool, "skipping duplicate account");
            continue;
        }

        accounts.push(Account {
            pool: (*pool).to_string(),
            username: (*username).to_string(),
            password: (*password).to_string(),
            donation,
            priority: 0,
        });
    }

    let count = accounts.len();
    for (position, account) in accounts.iter_mut().enumerate() {
        account.priority = u32::try_from(count - position).unwrap_or(u32::MAX);
    }

    accounts
}

/// Reads and parses an account file.
///
/// # Errors
///
/// Returns [`AccountsError::Io`] if the file cannot be read. Individual bad lines are not
/// errors.
pub fn load_accounts_file(path: &Path) -> Result<Vec<Account>, AccountsError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| AccountsError::Io { path: path.to_path_buf(), source })?;
    let accounts = parse_accounts(&text);
    debug!(path = %path.display(), accounts = accounts.len(), "loaded account file");
    Ok(accounts)
}
