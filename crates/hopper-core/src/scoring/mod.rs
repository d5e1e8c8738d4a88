//! Pool scoring: flat and proportional utility models.

pub mod utility;

pub use utility::{
    hopper_effective_rate, marginal_value, utility_flat, utility_proportional, MarketView,
    HOPPER_BONUS, MIN_PROGRESS, UNKNOWN_DIFFICULTY_VALUE,
};
