// src/config.rs

use crate::cli::Args;

/// Trailing window length used by the reference scoring, in days (3 × 365)
pub const DEFAULT_WINDOW_DAYS: i64 = 1095;

/// Number of top-billed actors that count for a movie
pub const DEFAULT_TOP_BILLED: usize = 3;

/// Parameters shared by index construction and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FameConfig {
    /// Length of the lookback window. No calendar or leap-year adjustment.
    pub window_days: i64,
    pub top_billed: usize,
}

impl Default for FameConfig {
    fn default() -> Self {
        Self { window_days: DEFAULT_WINDOW_DAYS, top_billed: DEFAULT_TOP_BILLED }
    }
}

impl From<&Args> for FameConfig {
    fn from(args: &Args) -> Self {
        Self { window_days: args.window_days, top_billed: args.top_billed }
    }
}
