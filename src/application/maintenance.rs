use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::city_store::CityStore;
use crate::domain::values::city::CityName;
use crate::domain::values::rolling_window::upsert;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TrimSummary {
    pub files: usize,
    pub trimmed: usize,
    pub records_dropped: usize,
    /// Stored elements that could not be read as records, across all files.
    pub unreadable_records: usize,
    /// Files that could not be read or written, or hold unreadable
    /// elements; these are left as they were.
    pub failed: Vec<String>,
}

pub struct MaintenanceUseCase {
    store: Arc<dyn CityStore>,
    retention_days: usize,
}

impl MaintenanceUseCase {
    pub fn new(store: Arc<dyn CityStore>, retention_days: usize) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    /// Re-sort and trim every stored city to the retention window.
    pub fn trim_all(&self) -> Result<TrimSummary, DomainError> {
        let mut summary = TrimSummary::default();

        for slug in self.store.cities()? {
            summary.files += 1;
            let records = match self.store.load_records(&slug) {
                Ok(loaded) if loaded.skipped > 0 => {
                    tracing::warn!(
                        city = %slug,
                        unreadable = loaded.skipped,
                        "leaving file with unreadable records untouched"
                    );
                    summary.unreadable_records += loaded.skipped;
                    summary.failed.push(slug);
                    continue;
                }
                Ok(loaded) => loaded.records,
                Err(e) => {
                    tracing::warn!(city = %slug, error = %e, "skipping unreadable file");
                    summary.failed.push(slug);
                    continue;
                }
            };

            let before = records.len();
            let kept = upsert(records, vec![], self.retention_days);
            if let Err(e) = self.store.save(&slug, &kept) {
                tracing::error!(city = %slug, error = %e, "write failed");
                summary.failed.push(slug);
                continue;
            }

            let dropped = before - kept.len();
            if dropped > 0 {
                summary.trimmed += 1;
                summary.records_dropped += dropped;
                tracing::info!(city = %slug, kept = kept.len(), dropped, "trimmed");
            }
        }

        Ok(summary)
    }

    /// Stored records for `city`, oldest first, optionally only the newest `last`.
    pub fn history(
        &self,
        city: &CityName,
        last: Option<usize>,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        let records = upsert(self.store.load(&city.slug())?, vec![], usize::MAX);
        if records.is_empty() {
            return Err(DomainError::NotFound(format!("no stored prices for {city}")));
        }
        let skip = last.map_or(0, |n| records.len().saturating_sub(n));
        Ok(records.into_iter().skip(skip).collect())
    }
}
