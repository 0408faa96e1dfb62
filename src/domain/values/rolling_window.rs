use crate::domain::entities::price_record::PriceRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Default number of days kept per city.
pub const DEFAULT_RETENTION_DAYS: usize = 90;

/// Merge `incoming` into `existing`, keyed by date.
///
/// Later records win on a date collision (incoming always beats existing).
/// The result is sorted ascending by date and holds at most
/// `retention_days` records, the oldest being dropped first. It replaces the
/// stored collection wholesale.
pub fn upsert(
    existing: Vec<PriceRecord>,
    incoming: Vec<PriceRecord>,
    retention_days: usize,
) -> Vec<PriceRecord> {
    let mut by_date: BTreeMap<NaiveDate, PriceRecord> = BTreeMap::new();
    for rec in existing.into_iter().chain(incoming) {
        by_date.insert(rec.date, rec);
    }

    let skip = by_date.len().saturating_sub(retention_days);
    by_date.into_values().skip(skip).collect()
}
