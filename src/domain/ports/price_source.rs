use crate::domain::entities::price_record::PriceRecord;
use crate::domain::values::city::CityName;
use crate::domain::values::fetch_plan::FetchWhen;
use async_trait::async_trait;
use thiserror::Error;

/// Why a fetch produced no record. Always non-fatal to the caller: a miss
/// only means there is nothing to store for that city and date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Miss {
    /// The request could not be built (e.g. unusable city header).
    #[error("request error: {0}")]
    Request(String),
    /// Connection failure or timeout.
    #[error("transport error: {0}")]
    Transport(String),
    /// Transport-level status other than 200.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// Body is not a JSON object.
    #[error("decode error: {0}")]
    Decode(String),
    /// The body's own `Status_code` is not 200.
    #[error("upstream status {0}")]
    UpstreamStatus(i64),
    /// A required field is absent or not numeric.
    #[error("missing or non-numeric field `{0}`")]
    MissingField(String),
}

/// Source of one city's gold price for one day.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Make exactly one upstream request and normalize the answer.
    async fn fetch(&self, city: &CityName, when: FetchWhen) -> Result<PriceRecord, Miss>;
}
