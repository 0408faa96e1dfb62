use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::city_store::{CityStore, LoadedRecords};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One pretty-printed JSON array per city at `{dir}/{slug}.json`.
pub struct JsonCityStore {
    dir: PathBuf,
}

impl JsonCityStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.json"))
    }

    fn persistence_error(path: &Path, e: impl std::fmt::Display) -> DomainError {
        DomainError::Persistence(format!("{}: {e}", path.display()))
    }
}

impl CityStore for JsonCityStore {
    fn load_records(&self, slug: &str) -> Result<LoadedRecords, DomainError> {
        let path = self.path_for(slug);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadedRecords::default()),
            Err(e) => return Err(Self::persistence_error(&path, e)),
        };

        let doc: Value =
            serde_json::from_str(&raw).map_err(|e| Self::persistence_error(&path, e))?;
        let Value::Array(items) = doc else {
            return Err(Self::persistence_error(&path, "expected a JSON array"));
        };

        let mut loaded = LoadedRecords {
            records: Vec::with_capacity(items.len()),
            skipped: 0,
        };
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<PriceRecord>(item) {
                Ok(rec) => loaded.records.push(rec),
                Err(e) => {
                    loaded.skipped += 1;
                    tracing::warn!(
                        path = %path.display(),
                        index,
                        error = %e,
                        "unreadable record"
                    );
                }
            }
        }
        Ok(loaded)
    }

    fn save(&self, slug: &str, records: &[PriceRecord]) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::persistence_error(&self.dir, e))?;

        let path = self.path_for(slug);
        let tmp = self.dir.join(format!(".{slug}.json.tmp"));
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| Self::persistence_error(&path, e))?;

        fs::write(&tmp, body).map_err(|e| Self::persistence_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Self::persistence_error(&path, e)
        })?;

        tracing::debug!(path = %path.display(), records = records.len(), "saved city file");
        Ok(())
    }

    fn cities(&self) -> Result<Vec<String>, DomainError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(Self::persistence_error(&self.dir, e)),
        };

        let mut slugs: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(String::from))
            .filter(|stem| !stem.starts_with('.'))
            .collect();
        slugs.sort();
        Ok(slugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(day: u32, price: f64) -> PriceRecord {
        PriceRecord::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), price, price + 1.0)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        assert_eq!(store.load_records("chennai").unwrap(), LoadedRecords::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path().join("data").join("cities"));
        let records = vec![rec(1, 10.0), rec(2, 20.0)];
        store.save("chennai", &records).unwrap();
        assert_eq!(store.load("chennai").unwrap(), records);
        assert!(!dir.path().join("data/cities/.chennai.json.tmp").exists());
    }

    #[test]
    fn test_file_layout_matches_site_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        store.save("mumbai", &[rec(5, 6000.0)]).unwrap();

        let raw = fs::read_to_string(store.path_for("mumbai")).unwrap();
        assert!(raw.starts_with("[\n  {"));
        let doc: Value = serde_json::from_str(&raw).unwrap();
        let obj = doc[0].as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["22k", "24k", "currency", "date", "status_code", "timestamp", "unit"]
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        fs::write(store.path_for("pune"), "{not json").unwrap();
        assert!(matches!(store.load("pune"), Err(DomainError::Persistence(_))));
    }

    #[test]
    fn test_non_array_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        fs::write(store.path_for("pune"), r#"{"date": "2024-01-01"}"#).unwrap();
        assert!(matches!(store.load("pune"), Err(DomainError::Persistence(_))));
    }

    #[test]
    fn test_bad_elements_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        let good = serde_json::to_value(rec(3, 1.0)).unwrap();
        let doc = serde_json::json!([good, "junk", {"date": "2024-01-04"}]);
        fs::write(store.path_for("kochi"), doc.to_string()).unwrap();

        let loaded = store.load_records("kochi").unwrap();
        assert_eq!(loaded.skipped, 2);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_loads_records_written_by_older_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        let raw = r#"[
  {
    "date": "2025-08-12",
    "timestamp": "2025-08-12T06:00:01.120000",
    "22k": "9200",
    "24k": "10037",
    "currency": "INR",
    "unit": "1 Gram",
    "status_code": 200
  },
  {
    "date": "2025-08-13 ",
    "timestamp": "2025-08-13T06:00:01.120000",
    "22k": 9210.0,
    "24k": 10047.0,
    "currency": null,
    "unit": "1 Gram",
    "status_code": "200"
  },
  {
    "date": "2025-08-14",
    "timestamp": "2025-08-14T06:00:01",
    "22k": 9275.0,
    "24k": 10118.0,
    "currency": "INR",
    "unit": "1 Gram",
    "status_code": 200
  }
]"#;
        fs::write(store.path_for("chennai"), raw).unwrap();

        let loaded = store.load_records("chennai").unwrap();
        assert_eq!(loaded.skipped, 0);
        let prices: Vec<f64> = loaded.records.iter().map(|r| r.price_22k).collect();
        assert_eq!(prices, vec![9200.0, 9210.0, 9275.0]);

        store.save("chennai", &loaded.records).unwrap();
        assert_eq!(store.load("chennai").unwrap(), loaded.records);
    }

    #[test]
    fn test_cities_lists_json_stems() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCityStore::new(dir.path());
        assert!(store.cities().unwrap().is_empty());

        store.save("surat", &[]).unwrap();
        store.save("agra", &[]).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join(".agra.json.tmp"), "x").unwrap();
        assert_eq!(store.cities().unwrap(), vec!["agra", "surat"]);
    }
}
