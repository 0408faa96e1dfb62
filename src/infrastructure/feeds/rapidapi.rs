use crate::config::ApiConfig;
use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::price_source::{Miss, PriceSource};
use crate::domain::values::city::CityName;
use crate::domain::values::fetch_plan::FetchWhen;
use crate::domain::values::lenient;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashMap;

const CURRENT_PATH: &str = "/gold_price_india_city_value/";
const HISTORICAL_PATH: &str = "/gold_historical_price_india_city_value/";

/// Gold price feed backed by the RapidAPI "gold-silver-live-price-india" API.
/// One request per fetch, no retries; pacing is the caller's job.
pub struct RapidApiSource {
    api_key: String,
    api_host: String,
    base_url: String,
    client: reqwest::Client,
}

impl RapidApiSource {
    pub fn new(cfg: &ApiConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent("goldrates/0.1")
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            api_key: cfg.api_key.clone(),
            api_host: cfg.api_host.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

/// Body shared by the current and historical endpoints. Prices live under
/// `"{City}_22k"` / `"{City}_24k"` and land in `fields`.
#[derive(Debug, serde::Deserialize)]
struct CityValueResponse {
    #[serde(rename = "Status_code", default)]
    status_code: Option<Value>,
    #[serde(rename = "Currency", default)]
    currency: Option<Value>,
    #[serde(rename = "Unit", default)]
    unit: Option<Value>,
    #[serde(rename = "Requested_Date", default)]
    requested_date: Option<Value>,
    #[serde(rename = "Price_Date(Today)", default)]
    price_date_today: Option<Value>,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

#[async_trait]
impl PriceSource for RapidApiSource {
    fn name(&self) -> &str {
        "rapidapi"
    }

    async fn fetch(&self, city: &CityName, when: FetchWhen) -> Result<PriceRecord, Miss> {
        let path = match when {
            FetchWhen::Today => CURRENT_PATH,
            FetchWhen::On(_) => HISTORICAL_PATH,
        };

        let mut req = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .header("city", city_header(city)?);
        if let FetchWhen::On(date) = when {
            req = req.header(
                "required-date-yyyy-mm-dd",
                date.format("%Y-%m-%d").to_string(),
            );
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Miss::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(Miss::HttpStatus(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Miss::Transport(e.to_string()))?;

        parse_body(&body, city, when, Utc::now().date_naive())
    }
}

/// Header values must be Latin-1; anything outside it is dropped.
fn city_header(city: &CityName) -> Result<HeaderValue, Miss> {
    let bytes: Vec<u8> = city
        .as_str()
        .chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect();
    HeaderValue::from_bytes(&bytes).map_err(|e| Miss::Request(format!("city header: {e}")))
}

/// Map an upstream body to a record. `today` is used for the current-price
/// endpoint when the body carries no usable `Price_Date(Today)`.
fn parse_body(
    body: &str,
    city: &CityName,
    when: FetchWhen,
    today: NaiveDate,
) -> Result<PriceRecord, Miss> {
    let data: CityValueResponse =
        serde_json::from_str(body).map_err(|e| Miss::Decode(e.to_string()))?;

    let status_code = data
        .status_code
        .as_ref()
        .and_then(lenient::integer)
        .ok_or_else(|| Miss::MissingField("Status_code".into()))?;
    if status_code != 200 {
        return Err(Miss::UpstreamStatus(status_code));
    }

    let price = |suffix: &str| {
        let key = format!("{city}_{suffix}");
        data.fields
            .get(&key)
            .and_then(lenient::number)
            .ok_or(Miss::MissingField(key))
    };
    let price_22k = price("22k")?;
    let price_24k = price("24k")?;

    let date = match when {
        FetchWhen::On(requested) => as_date(&data.requested_date).unwrap_or(requested),
        FetchWhen::Today => as_date(&data.price_date_today).unwrap_or(today),
    };

    Ok(PriceRecord::new(date, price_22k, price_24k)
        .with_currency(as_text(&data.currency))
        .with_unit(as_text(&data.unit))
        .with_status_code(status_code))
}

fn as_text(value: &Option<Value>) -> Option<String> {
    value.as_ref()?.as_str().map(|s| s.trim().to_string())
}

fn as_date(value: &Option<Value>) -> Option<NaiveDate> {
    lenient::date(value.as_ref()?.as_str()?)
}
