//! Utility model: converts a pool's fee, the caller's donation and live statistics into a
//! dimensionless score used only for relative ranking.
//!
//! Two variants exist, picked per pool by its catalog entry:
//!
//! - **Flat**: `1 − fee − donation`. For payout schemes with no round-timing advantage.
//! - **Proportional**: for every recently completed round `i` the pool reported,
//!
//!   ```text
//!   shares_i   = effective_rate · (now − t_i) / 2^32
//!   progress_i = max(shares_i, 1) / difficulty
//!   utility    = Σ p_i · I(progress_i) · (1 − fee − donation)
//!   I(p)       = ∫_p^100 e^(p − x) / x dx
//!   ```
//!
//!   `I` is the expected reward of one more share submitted at round progress `p`, relative
//!   to solo work. `effective_rate` is the observed rate inflated by a swarm of hoppers
//!   assumed to be mining at the start of the round (see [`hopper_effective_rate`]).

use std::f64::consts::SQRT_2;

use crate::{pools::ScoringVariant, stats::PoolStats};

/// Hash rate (work units/second) of the hypothetical hopper swarm.
pub const HOPPER_BONUS: f64 = 100e9;

/// Upper integration bound standing in for infinity; the tail beyond it is negligible.
pub const PROGRESS_UPPER_BOUND: f64 = 100.0;

/// Smallest progress fed to the integral. Guards against NaN and underflowing progress.
pub const MIN_PROGRESS: f64 = 1e-9;

/// Marginal value credited to a round while the network difficulty is unknown.
pub const UNKNOWN_DIFFICULTY_VALUE: f64 = 1.0;

/// Absolute error requested from the integrator on each panel.
const PANEL_TOLERANCE: f64 = 1e-12;

/// Relative error above which an evaluation is logged.
const RELATIVE_TOLERANCE: f64 = 1e-8;

/// Work represented by one difficulty-1 share.
const SHARE_WORK: f64 = 4_294_967_296.0;

/// Inputs that change between ranking passes.
#[derive(Debug, Clone, Copy)]
pub struct MarketView<'a> {
    /// Network difficulty; `0.0`, negative or non-finite means "never fetched".
    pub difficulty: f64,
    pub stats: &'a PoolStats,
    /// Unix seconds.
    pub now: f64,
}

/// Score of a pool whose payout gives no timing advantage.
#[must_use]
pub fn utility_flat(fee: f64, donation: f64) -> f64 {
    1.0 - fee - donation
}

/// Worst-case pool rate once a hopper swarm of [`HOPPER_BONUS`] has joined the round.
///
/// Closed-form root of the balance between the swarm's share of the round reward and the
/// pool's own rate:
///
/// ```text
/// base = (√2 · √(50B² + 13Br + 50r²) − 10B + 10r) / 20
/// effective_rate = base + B
/// ```
///
/// `√2·√Q − 10B` is evaluated as `(26Br + 100r²) / (√(2Q) + 10B)`, which is the same quantity
/// without the cancellation that would otherwise swamp small rates. Negative, missing or
/// non-finite rates count as zero, for which the result is exactly `B`.
#[must_use]
pub fn hopper_effective_rate(rate: f64) -> f64 {
    let b = HOPPER_BONUS;
    let r = if rate.is_finite() && rate > 0.0 { rate } else { 0.0 };

    let q = 50.0 * b * b + 13.0 * b * r + 50.0 * r * r;
    let root_minus_10b = (26.0 * b * r + 100.0 * r * r) / (SQRT_2 * q.sqrt() + 10.0 * b);
    let base = (root_minus_10b + 10.0 * r) / 20.0;

    base + b
}

/// Marginal value `I(p) = ∫_p^100 e^(p − x) / x dx` of a share at round progress `p`.
///
/// Evaluated through the substitution `x = p·e^u`, which turns the integrand into the smooth,
/// bounded `e^(p − p·e^u)` over `[0, ln(100/p)]`. That range is split into unit-width panels,
/// each handed to the double-exponential integrator of the `quadrature` crate. Progress below
/// [`MIN_PROGRESS`] (including NaN) is clamped up to it; progress at or past the upper bound is
/// worth nothing.
#[must_use]
pub fn marginal_value(progress: f64) -> f64 {
    if progress >= PROGRESS_UPPER_BOUND {
        return 0.0;
    }
    let p = if progress > MIN_PROGRESS { progress } else { MIN_PROGRESS };

    let upper = (PROGRESS_UPPER_BOUND / p).ln();
    let integrand = |u: f64| (p - p * u.exp()).exp();

    // upper <= ln(100 / MIN_PROGRESS) < 26
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let panels = (upper.ceil() as u32).max(1);
    let width = upper / f64::from(panels);

    let (value, abs_error) = (0..panels).fold((0.0, 0.0), |(value, abs_error), panel| {
        let start = width * f64::from(panel);
        let output = quadrature::integrate(&integrand, start, start + width, PANEL_TOLERANCE);
        (value + output.integral, abs_error + output.error_estimate)
    });

    if abs_error > RELATIVE_TOLERANCE * value.abs() {
        tracing::debug!(progress = p, abs_error, "quadrature missed its tolerance");
    }
    value
}

/// Score of a proportional-payout pool from its recent round history.
///
/// An empty history scores `0.0`. While the network difficulty was never fetched every
/// round's progress is taken as zero and credited [`UNKNOWN_DIFFICULTY_VALUE`], so the score
/// degrades to `Σ p_i · (1 − fee − donation)` instead of being zeroed.
#[must_use]
pub fn utility_proportional(fee: f64, donation: f64, market: &MarketView<'_>) -> f64 {
    let difficulty = (market.difficulty.is_finite() && market.difficulty > 0.0)
        .then_some(market.difficulty);
    let effective_rate = hopper_effective_rate(market.stats.sanitized_rate());

    let utility: f64 = market
        .stats
        .rounds
        .iter()
        .map(|round| {
            let value = match difficulty {
                Some(difficulty) => {
                    let shares = effective_rate * (market.now - round.timestamp) / SHARE_WORK;
                    marginal_value(shares.max(1.0) / difficulty)
                }
                None => UNKNOWN_DIFFICULTY_VALUE,
            };
            round.probability * value
        })
        .sum();

    utility * utility_flat(fee, donation)
}

impl ScoringVariant {
    /// Scores a pool with this variant.
    #[must_use]
    pub fn score(self, fee: f64, donation: f64, market: &MarketView<'_>) -> f64 {
        match self {
            Self::Flat => utility_flat(fee, donation),
            Self::Proportional => utility_proportional(fee, donation, market),
        }
    }
}
