// src/billing.rs

use crate::model::CastCredit;

/// Returns up to `k` credits with the lowest billing order.
///
/// Equal orders keep their position in the cast list.
pub fn select_top_billed(cast: &[CastCredit], k: usize) -> Vec<&CastCredit> {
    let mut ranked: Vec<&CastCredit> = cast.iter().collect();
    // `sort_by_key` is stable, which is what breaks ties by list position
    ranked.sort_by_key(|credit| credit.order);
    ranked.truncate(k);
    ranked
}
