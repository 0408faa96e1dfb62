pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::maintenance::{MaintenanceUseCase, TrimSummary};
use crate::application::pacing::Pacing;
use crate::application::refresh::{CitySelection, RefreshUseCase, RunSummary};
use crate::config::{Config, API_KEY_ENV};
use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::city_store::CityStore;
use crate::domain::ports::price_source::PriceSource;
use crate::domain::values::city::CityName;
use crate::domain::values::fetch_plan::{FetchPlan, FetchWhen};
use crate::infrastructure::feeds::rapidapi::RapidApiSource;
use crate::infrastructure::fs::cities_list::load_cities;
use crate::infrastructure::fs::json_store::JsonCityStore;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

pub struct GoldRates {
    refresh_uc: Option<RefreshUseCase>,
    maintenance_uc: MaintenanceUseCase,
    cities_path: PathBuf,
}

impl GoldRates {
    pub fn new(config: Config) -> Result<Self, DomainError> {
        let store: Arc<dyn CityStore> = Arc::new(JsonCityStore::new(&config.data_dir));
        let source = match &config.api {
            Some(api) => {
                let source: Arc<dyn PriceSource> = Arc::new(RapidApiSource::new(api)?);
                Some(source)
            }
            None => None,
        };

        Ok(Self::with_providers(&config, source, store))
    }

    pub fn with_providers(
        config: &Config,
        source: Option<Arc<dyn PriceSource>>,
        store: Arc<dyn CityStore>,
    ) -> Self {
        Self {
            refresh_uc: source
                .map(|source| RefreshUseCase::new(source, store.clone(), config.retention_days)),
            maintenance_uc: MaintenanceUseCase::new(store, config.retention_days),
            cities_path: config.cities_path.clone(),
        }
    }

    fn refresher(&self) -> Result<&RefreshUseCase, DomainError> {
        self.refresh_uc.as_ref().ok_or_else(|| {
            DomainError::Config(format!("{API_KEY_ENV} environment variable is not set"))
        })
    }

    /// The configured cities list with `selection` applied.
    pub fn cities(&self, selection: &CitySelection) -> Result<Vec<CityName>, DomainError> {
        selection.apply(load_cities(&self.cities_path)?)
    }

    /// Batch refresh. Credentials and the cities list are checked before any
    /// request is made; after that, per-city failures only show up in the
    /// summary.
    pub async fn refresh(
        &self,
        plan: FetchPlan,
        selection: &CitySelection,
        pacing: Pacing,
    ) -> Result<RunSummary, DomainError> {
        let refresher = self.refresher()?;
        let cities = self.cities(selection)?;
        Ok(refresher
            .run(&cities, plan, pacing, Utc::now().date_naive())
            .await)
    }

    /// Single fetch, nothing is stored.
    pub async fn fetch_one(
        &self,
        city: &CityName,
        when: FetchWhen,
    ) -> Result<PriceRecord, DomainError> {
        self.refresher()?.fetch_one(city, when).await
    }

    pub fn trim_all(&self) -> Result<TrimSummary, DomainError> {
        self.maintenance_uc.trim_all()
    }

    pub fn history(
        &self,
        city: &CityName,
        last: Option<usize>,
    ) -> Result<Vec<PriceRecord>, DomainError> {
        self.maintenance_uc.history(city, last)
    }
}
