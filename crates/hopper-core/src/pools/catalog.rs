//! Compiled-in knowledge about every supported pool.

use serde::{Deserialize, Serialize};

/// Which utility model applies to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringVariant {
    /// Payout has no exploitable round-timing advantage; only the fee matters.
    Flat,
    /// Proportional payout; scored from recent round history.
    Proportional,
}

impl ScoringVariant {
    /// Returns a static string representation for logs and output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Proportional => "proportional",
        }
    }
}

/// Static facts about one pool.
#[derive(Debug, PartialEq)]
pub struct PoolDescriptor {
    /// Identity used in the account file and the stats payload
    pub name: &'static str,
    /// `host:port` endpoints in preference order
    pub endpoints: &'static [&'static str],
    /// Fraction of rewards the pool keeps, in `[0, 1)`
    pub fee: f64,
    pub variant: ScoringVariant,
}

/// Every pool the ranking engine knows how to score.
pub static CATALOG: &[PoolDescriptor] = &[
    PoolDescriptor {
        name: "arsbitcoin",
        endpoints: &["arsbitcoin.com:8344"],
        fee: 0.0,
        variant: ScoringVariant::Proportional,
    },
    PoolDescriptor {
        name: "bitclockers",
        endpoints: &["pool.bitclockers.com:8332"],
        fee: 0.02,
        variant: ScoringVariant::Proportional,
    },
    PoolDescriptor {
        name: "bitcoins.lc",
        endpoints: &["bitcoins.lc:8080"],
        fee: 0.0,
        variant: ScoringVariant::Proportional,
    },
    PoolDescriptor {
        name: "btcguild",
        endpoints: &[
            "uscentral.btcguild.com:8332",
            "useast.btcguild.com:8332",
            "de1.btcguild.com:8332",
            "de2.btcguild.com:8332",
        ],
        fee: 0.0,
        variant: ScoringVariant::Proportional,
    },
    PoolDescriptor {
        name: "eligius",
        endpoints: &["srv3.mining.eligius.st:8337"],
        fee: 0.000_000_409_6,
        variant: ScoringVariant::Flat,
    },
    PoolDescriptor {
        name: "mineco.in",
        endpoints: &["mineco.in:3000"],
        fee: 0.0,
        variant: ScoringVariant::Proportional,
    },
    PoolDescriptor {
        name: "mtred",
        endpoints: &["173.193.21.69:8337"],
        fee: 0.0,
        variant: ScoringVariant::Proportional,
    },
];

/// Exact-match lookup of a pool by identity.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static PoolDescriptor> {
    CATALOG.iter().find(|descriptor| descriptor.name == name)
}
