use crate::application::pacing::{Pacer, Pacing};
use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::city_store::CityStore;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::values::city::CityName;
use crate::domain::values::fetch_plan::{FetchPlan, FetchWhen};
use crate::domain::values::rolling_window::upsert;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

/// Which part of the cities list a run covers.
#[derive(Debug, Clone, Default)]
pub struct CitySelection {
    /// Start at this city (case-insensitive), skipping the ones before it.
    pub start_from: Option<String>,
    /// Only the first N cities (after `start_from`). `0` means all.
    pub sample: Option<usize>,
}

impl CitySelection {
    pub fn apply(&self, mut cities: Vec<CityName>) -> Result<Vec<CityName>, DomainError> {
        if let Some(start) = self.start_from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let wanted = start.to_lowercase();
            let index = cities
                .iter()
                .position(|c| c.as_str().to_lowercase() == wanted)
                .ok_or_else(|| {
                    DomainError::NotFound(format!("City '{start}' not found in cities list"))
                })?;
            cities.drain(..index);
        }
        if let Some(n) = self.sample.filter(|n| *n > 0) {
            cities.truncate(n);
        }
        Ok(cities)
    }
}

/// Outcome for one city in a run.
#[derive(Debug, Clone)]
pub struct CityReport {
    pub city: String,
    pub requested: usize,
    pub fetched: usize,
    pub missed: usize,
    /// Stored elements that could not be read back and were not carried over.
    pub unreadable: usize,
    pub error: Option<String>,
}

impl CityReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Tally printed at the end of a batch run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub plan: String,
    pub cities_total: usize,
    pub cities_ok: usize,
    pub cities_failed: usize,
    pub failed_cities: Vec<String>,
    pub requests: usize,
    pub records_fetched: usize,
    pub misses: usize,
    pub unreadable_records: usize,
    pub elapsed_secs: f64,
}

impl RunSummary {
    fn record(&mut self, report: &CityReport) {
        self.cities_total += 1;
        self.requests += report.requested;
        self.records_fetched += report.fetched;
        self.misses += report.missed;
        self.unreadable_records += report.unreadable;
        if report.is_ok() {
            self.cities_ok += 1;
        } else {
            self.cities_failed += 1;
            self.failed_cities.push(report.city.clone());
        }
    }
}

/// Fetch → upsert → save, city by city, one request in flight at a time.
pub struct RefreshUseCase {
    source: Arc<dyn PriceSource>,
    store: Arc<dyn CityStore>,
    retention_days: usize,
}

impl RefreshUseCase {
    pub fn new(
        source: Arc<dyn PriceSource>,
        store: Arc<dyn CityStore>,
        retention_days: usize,
    ) -> Self {
        Self {
            source,
            store,
            retention_days,
        }
    }

    pub async fn fetch_one(
        &self,
        city: &CityName,
        when: FetchWhen,
    ) -> Result<PriceRecord, DomainError> {
        Ok(self.source.fetch(city, when).await?)
    }

    /// Run `plan` for every city. Per-city failures are tallied, never raised.
    pub async fn run(
        &self,
        cities: &[CityName],
        plan: FetchPlan,
        pacing: Pacing,
        today: NaiveDate,
    ) -> RunSummary {
        let started = Instant::now();
        let targets = plan.targets(today);
        let mut pacer = Pacer::new(pacing.request_delay);
        let mut summary = RunSummary {
            plan: plan.to_string(),
            ..Default::default()
        };

        tracing::info!(
            source = self.source.name(),
            cities = cities.len(),
            plan = %plan,
            requests_per_city = targets.len(),
            "starting refresh"
        );

        for (idx, city) in cities.iter().enumerate() {
            if idx > 0 && !pacing.city_pause.is_zero() {
                tokio::time::sleep(pacing.city_pause).await;
            }
            tracing::info!("[{}/{}] {city}", idx + 1, cities.len());

            let report = self.refresh_city(city, &targets, &mut pacer).await;
            summary.record(&report);
        }

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        summary
    }

    /// Fetch every target for one city and merge the hits into its file.
    /// A city with no hits is left untouched and reported as failed.
    pub async fn refresh_city(
        &self,
        city: &CityName,
        targets: &[FetchWhen],
        pacer: &mut Pacer,
    ) -> CityReport {
        let slug = city.slug();
        let mut incoming = Vec::with_capacity(targets.len());
        let mut missed = 0;

        for (idx, when) in targets.iter().enumerate() {
            pacer.wait().await;
            match self.source.fetch(city, *when).await {
                Ok(rec) => incoming.push(rec),
                Err(miss) => {
                    missed += 1;
                    tracing::warn!(
                        city = %city,
                        when = %when,
                        reason = %miss,
                        "miss {}/{}",
                        idx + 1,
                        targets.len()
                    );
                }
            }
        }

        let mut report = CityReport {
            city: city.to_string(),
            requested: targets.len(),
            fetched: incoming.len(),
            missed,
            unreadable: 0,
            error: None,
        };

        if incoming.is_empty() {
            tracing::warn!(city = %city, "no data");
            report.error = Some("no data".into());
            return report;
        }

        let existing = match self.store.load_records(&slug) {
            Ok(loaded) => {
                if loaded.skipped > 0 {
                    tracing::warn!(
                        city = %city,
                        unreadable = loaded.skipped,
                        "unreadable stored records will not be carried over"
                    );
                }
                report.unreadable = loaded.skipped;
                loaded.records
            }
            Err(e) => {
                tracing::warn!(
                    city = %city,
                    error = %e,
                    "stored records unreadable, starting fresh"
                );
                vec![]
            }
        };

        let merged = upsert(existing, incoming, self.retention_days);
        match self.store.save(&slug, &merged) {
            Ok(()) => {
                tracing::info!(
                    city = %city,
                    fetched = report.fetched,
                    stored = merged.len(),
                    "updated"
                );
            }
            Err(e) => {
                tracing::error!(city = %city, error = %e, "write failed");
                report.error = Some(e.to_string());
            }
        }
        report
    }
}
