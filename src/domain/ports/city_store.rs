use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;

/// A city's stored collection as read back, plus how many stored elements
/// could not be read as records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRecords {
    pub records: Vec<PriceRecord>,
    pub skipped: usize,
}

/// Persisted record collections, one per city slug.
pub trait CityStore: Send + Sync {
    /// Stored records for `slug`. A city with no collection yet yields an
    /// empty result; an unreadable or malformed collection is an error.
    fn load_records(&self, slug: &str) -> Result<LoadedRecords, DomainError>;

    /// Replace the collection for `slug` with `records`.
    fn save(&self, slug: &str, records: &[PriceRecord]) -> Result<(), DomainError>;

    /// Slugs of every stored collection, sorted.
    fn cities(&self) -> Result<Vec<String>, DomainError>;

    fn load(&self, slug: &str) -> Result<Vec<PriceRecord>, DomainError> {
        Ok(self.load_records(slug)?.records)
    }
}
