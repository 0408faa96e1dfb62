//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use goldrates::config::Config;
use goldrates::domain::entities::price_record::PriceRecord;
use goldrates::domain::error::DomainError;
use goldrates::domain::ports::city_store::{CityStore, LoadedRecords};
use goldrates::domain::ports::price_source::{Miss, PriceSource};
use goldrates::domain::values::city::CityName;
use goldrates::domain::values::fetch_plan::FetchWhen;
use goldrates::infrastructure::fs::json_store::JsonCityStore;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(date: NaiveDate, price_22k: f64) -> PriceRecord {
    PriceRecord::new(date, price_22k, price_22k + 600.0)
}

/// Config rooted in a temp dir, with the given cities list written out.
pub fn config_in(dir: &Path, cities: &[&str], retention_days: usize) -> Config {
    let cities_path = dir.join("cities_list.txt");
    std::fs::write(&cities_path, cities.join("\n")).unwrap();
    Config {
        data_dir: dir.join("data").join("cities"),
        cities_path,
        retention_days,
        api: None,
    }
}

/// In-memory price source. Anything not registered is a miss.
#[derive(Default)]
pub struct FakeSource {
    prices: Mutex<HashMap<(String, FetchWhen), PriceRecord>>,
    calls: Mutex<Vec<(String, FetchWhen)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, city: &str, when: FetchWhen, rec: PriceRecord) -> Self {
        self.prices
            .lock()
            .unwrap()
            .insert((city.to_string(), when), rec);
        self
    }

    pub fn calls(&self) -> Vec<(String, FetchWhen)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, city: &CityName, when: FetchWhen) -> Result<PriceRecord, Miss> {
        self.calls
            .lock()
            .unwrap()
            .push((city.as_str().to_string(), when));
        self.prices
            .lock()
            .unwrap()
            .get(&(city.as_str().to_string(), when))
            .cloned()
            .ok_or_else(|| Miss::MissingField("Status_code".into()))
    }
}

/// JSON store whose writes fail for chosen slugs.
pub struct FlakyStore {
    inner: JsonCityStore,
    fail_saves: HashSet<String>,
}

impl FlakyStore {
    pub fn new(dir: &Path, fail_saves: &[&str]) -> Self {
        Self {
            inner: JsonCityStore::new(dir),
            fail_saves: fail_saves.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CityStore for FlakyStore {
    fn load_records(&self, slug: &str) -> Result<LoadedRecords, DomainError> {
        self.inner.load_records(slug)
    }

    fn save(&self, slug: &str, records: &[PriceRecord]) -> Result<(), DomainError> {
        if self.fail_saves.contains(slug) {
            return Err(DomainError::Persistence(format!("{slug}: disk full")));
        }
        self.inner.save(slug, records)
    }

    fn cities(&self) -> Result<Vec<String>, DomainError> {
        self.inner.cities()
    }
}
