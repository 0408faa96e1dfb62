use crate::domain::error::DomainError;
use crate::domain::values::city::CityName;
use std::path::Path;

/// Read the cities list: UTF-8, one city per line, blank lines ignored,
/// a leading byte-order mark tolerated. A missing file is a configuration
/// error.
pub fn load_cities(path: &Path) -> Result<Vec<CityName>, DomainError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Config(format!("cannot read cities list {}: {e}", path.display()))
    })?;
    Ok(parse_cities(&raw))
}

pub fn parse_cities(raw: &str) -> Vec<CityName> {
    raw.lines().filter_map(|line| CityName::new(line).ok()).collect()
}
