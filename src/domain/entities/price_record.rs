use crate::domain::values::lenient;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_UNIT: &str = "1 Gram";

/// One observation of gold prices for one city on one calendar date.
///
/// Field names on the wire match the per-city files the site reads
/// (`date`, `timestamp`, `22k`, `24k`, `currency`, `unit`, `status_code`).
///
/// Reading is lenient about how older files spelled values: prices and
/// `status_code` may be numeric strings, `currency`/`unit` may be null, and
/// `date` may carry padding or a time part. Writing always emits numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(deserialize_with = "lenient::deserialize_date")]
    pub date: NaiveDate,
    /// When the fetch happened (UTC). Not part of the record's identity.
    #[serde(rename = "timestamp")]
    pub observed_at: NaiveDateTime,
    #[serde(rename = "22k", deserialize_with = "lenient::deserialize_price")]
    pub price_22k: f64,
    #[serde(rename = "24k", deserialize_with = "lenient::deserialize_price")]
    pub price_24k: f64,
    #[serde(default = "default_currency", deserialize_with = "currency_or_default")]
    pub currency: String,
    #[serde(default = "default_unit", deserialize_with = "unit_or_default")]
    pub unit: String,
    #[serde(
        default = "default_status_code",
        deserialize_with = "lenient::deserialize_status_code"
    )]
    pub status_code: i64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_status_code() -> i64 {
    200
}

fn currency_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::deserialize_opt_text(d)?.unwrap_or_else(default_currency))
}

fn unit_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::deserialize_opt_text(d)?.unwrap_or_else(default_unit))
}

impl PriceRecord {
    pub fn new(date: NaiveDate, price_22k: f64, price_24k: f64) -> Self {
        Self {
            date,
            observed_at: Utc::now().naive_utc(),
            price_22k,
            price_24k,
            currency: default_currency(),
            unit: default_unit(),
            status_code: default_status_code(),
        }
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        if let Some(c) = currency.filter(|c| !c.trim().is_empty()) {
            self.currency = c;
        }
        self
    }

    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        if let Some(u) = unit.filter(|u| !u.trim().is_empty()) {
            self.unit = u;
        }
        self
    }

    pub fn with_status_code(mut self, status_code: i64) -> Self {
        self.status_code = status_code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_site_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rec = PriceRecord::new(date, 6100.0, 6650.5);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["date"], "2024-03-01");
        assert_eq!(value["22k"], 6100.0);
        assert_eq!(value["24k"], 6650.5);
        assert_eq!(value["currency"], "INR");
        assert_eq!(value["unit"], "1 Gram");
        assert_eq!(value["status_code"], 200);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_reads_existing_file_entry() {
        let raw = r#"{
            "date": "2025-08-14",
            "timestamp": "2025-08-14T06:01:22.481230",
            "22k": 9275.0,
            "24k": 10118.0,
            "currency": "INR",
            "unit": "1 Gram",
            "status_code": 200
        }"#;
        let rec: PriceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2025, 8, 14).unwrap());
        assert_eq!(rec.price_24k, 10118.0);
    }

    #[test]
    fn test_reads_entry_with_string_values() {
        let raw = r#"{
            "date": "2025-08-13 ",
            "timestamp": "2025-08-13T06:01:22.481230",
            "22k": "9200",
            "24k": "10037.50",
            "currency": null,
            "unit": null,
            "status_code": "200"
        }"#;
        let rec: PriceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2025, 8, 13).unwrap());
        assert_eq!(rec.price_22k, 9200.0);
        assert_eq!(rec.price_24k, 10037.5);
        assert_eq!(rec.currency, DEFAULT_CURRENCY);
        assert_eq!(rec.unit, DEFAULT_UNIT);
        assert_eq!(rec.status_code, 200);

        let written = serde_json::to_value(&rec).unwrap();
        assert_eq!(written["22k"], 9200.0);
        assert_eq!(written["status_code"], 200);
    }

    #[test]
    fn test_missing_status_code_reads_as_ok() {
        let raw = r#"{"date": "2025-08-13", "timestamp": "2025-08-13T06:01:22",
                      "22k": 1, "24k": 2}"#;
        let rec: PriceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.status_code, 200);
        assert_eq!(rec.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_null_price_is_rejected() {
        let raw = r#"{"date": "2025-08-13", "timestamp": "2025-08-13T06:01:22",
                      "22k": null, "24k": 2, "status_code": 200}"#;
        assert!(serde_json::from_str::<PriceRecord>(raw).is_err());
    }

    #[test]
    fn test_blank_currency_keeps_default() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rec = PriceRecord::new(date, 1.0, 2.0)
            .with_currency(Some("  ".into()))
            .with_unit(None);
        assert_eq!(rec.currency, DEFAULT_CURRENCY);
        assert_eq!(rec.unit, DEFAULT_UNIT);
    }
}
