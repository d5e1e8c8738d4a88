//! Ranks configured pools by current utility and flattens the result into an ordered
//! endpoint list for a mining client.

use arc_swap::ArcSwap;
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, trace, warn};

use crate::{
    cache::DataCache,
    pools::{
        accounts::{load_accounts_file, parse_accounts, Account, AccountsError},
        catalog::{self, PoolDescriptor, ScoringVariant},
    },
    scoring::MarketView,
    stats::StatsSnapshot,
};

/// A catalog entry paired with the caller's account for it.
#[derive(Debug, Clone)]
pub struct ConfiguredPool {
    pub descriptor: &'static PoolDescriptor,
    pub account: Account,
}

/// One pool's position in a ranking pass.
#[derive(Debug, Clone)]
pub struct RankedPool {
    pub descriptor: &'static PoolDescriptor,
    pub account: Account,
    pub utility: f64,
}

impl RankedPool {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub fn priority(&self) -> u32 {
        self.account.priority
    }

    #[must_use]
    pub fn variant(&self) -> ScoringVariant {
        self.descriptor.variant
    }
}

/// One connectable endpoint with the credentials to use on it.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointEntry {
    pub pool: &'static str,
    pub endpoint: &'static str,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for EndpointEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointEntry")
            .field("pool", &self.pool)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Expands a ranking into endpoints, keeping rank order and each pool's own endpoint order.
#[must_use]
pub fn flatten_endpoints(ranked: &[RankedPool]) -> Vec<EndpointEntry> {
    ranked
        .iter()
        .flat_map(|pool| {
            pool.descriptor.endpoints.iter().map(move |&endpoint| EndpointEntry {
                pool: pool.descriptor.name,
                endpoint,
                username: pool.account.username.clone(),
                password: pool.account.password.clone(),
            })
        })
        .collect()
}

/// Owns the configured pool list and ranks it against a shared [`DataCache`].
///
/// The pool list sits behind an [`ArcSwap`], so [`reload`](Self::reload) can replace it while
/// ranking passes are running; each pass works on the list it started with.
pub struct PoolSelector {
    cache: Arc<DataCache>,
    accounts_path: Option<PathBuf>,
    pools: ArcSwap<Vec<ConfiguredPool>>,
}

impl PoolSelector {
    /// Loads the account file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read. Unusable lines are skipped.
    pub fn load(path: impl AsRef<Path>, cache: Arc<DataCache>) -> Result<Self, AccountsError> {
        let path = path.as_ref();
        let accounts = load_accounts_file(path)?;
        let selector = Self::from_accounts(accounts, cache);
        Ok(Self { accounts_path: Some(path.to_path_buf()), ..selector })
    }

    /// Parses accounts from in-memory text. [`reload`](Self::reload) is a no-op for such a
    /// selector.
    #[must_use]
    pub fn from_text(text: &str, cache: Arc<DataCache>) -> Self {
        Self::from_accounts(parse_accounts(text), cache)
    }

    /// Builds a selector from already-parsed accounts. Accounts naming unknown pools are
    /// dropped.
    #[must_use]
    pub fn from_accounts(accounts: Vec<Account>, cache: Arc<DataCache>) -> Self {
        let pools = Self::configure(accounts);
        info!(pools = pools.len(), "pool selector configured");
        Self { cache, accounts_path: None, pools: ArcSwap::from_pointee(pools) }
    }

    fn configure(accounts: Vec<Account>) -> Vec<ConfiguredPool> {
        accounts
            .into_iter()
            .filter_map(|account| {
                let Some(descriptor) = catalog::lookup(&account.pool) else {
                    warn!(pool = %account.pool, "dropping account for unknown pool");
                    return None;
                };
                Some(ConfiguredPool { descriptor, account })
            })
            .collect()
    }

    /// Re-reads the account file and swaps in the new pool list. Returns the number of
    /// configured pools.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read; the previous pool list stays active.
    pub fn reload(&self) -> Result<usize, AccountsError> {
        let Some(path) = &self.accounts_path else {
            return Ok(self.pools.load().len());
        };

        let pools = Self::configure(load_accounts_file(path)?);
        let count = pools.len();
        self.pools.store(Arc::new(pools));
        info!(pools = count, path = %path.display(), "reloaded accounts");
        Ok(count)
    }

    /// Currently configured pools in account-file order.
    #[must_use]
    pub fn pools(&self) -> Arc<Vec<ConfiguredPool>> {
        self.pools.load_full()
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<DataCache> {
        &self.cache
    }

    /// Scores every configured pool and returns them best first.
    ///
    /// Difficulty and stats are only touched if some pool uses the proportional model, and
    /// one snapshot of each is used for the whole pass. Ties on utility go to the higher
    /// priority.
    pub async fn rank(&self) -> Vec<RankedPool> {
        let pools = self.pools.load_full();

        let needs_market =
            pools.iter().any(|pool| pool.descriptor.variant == ScoringVariant::Proportional);
        let (difficulty, snapshot) = if needs_market {
            (self.cache.get_difficulty().await, self.cache.snapshot().await)
        } else {
            (0.0, Arc::new(StatsSnapshot::default()))
        };
        let now = self.cache.now();

        let mut ranked: Vec<RankedPool> = pools
            .iter()
            .map(|pool| {
                let stats = snapshot.get(pool.descriptor.name);
                let market = MarketView { difficulty, stats: &stats, now };
                let utility = pool.descriptor.variant.score(
                    pool.descriptor.fee,
                    pool.account.donation,
                    &market,
                );
                trace!(
                    pool = pool.descriptor.name,
                    variant = pool.descriptor.variant.as_str(),
                    rounds = stats.rounds.len(),
                    utility,
                    "scored pool"
                );
                RankedPool { descriptor: pool.descriptor, account: pool.account.clone(), utility }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.utility.total_cmp(&a.utility).then_with(|| b.priority().cmp(&a.priority()))
        });

        debug!(
            pools = ranked.len(),
            best = ranked.first().map(RankedPool::name),
            difficulty,
            "ranked pools"
        );
        ranked
    }

    /// Ranks and flattens in one step.
    pub async fn endpoints(&self) -> Vec<EndpointEntry> {
        flatten_endpoints(&self.rank().await)
    }
}
