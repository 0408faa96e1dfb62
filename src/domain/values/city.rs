use std::fmt;
use std::str::FromStr;

/// A city exactly as it appears in the cities list. The upstream API keys
/// its price fields on this spelling, so it is kept verbatim (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    pub fn new(raw: &str) -> Result<Self, String> {
        let name = raw.trim().trim_start_matches('\u{feff}').trim();
        if name.is_empty() {
            return Err("City name must not be empty".to_string());
        }
        Ok(CityName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe stem for the city's data file.
    /// `"Port Blair (Andaman)"` becomes `"port_blair_andaman"`.
    pub fn slug(&self) -> String {
        slugify(&self.0)
    }
}

pub fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' => '_',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CityName::new(s)
    }
}
