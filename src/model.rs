use std::collections::HashMap;

/// Field names read from WOD station metadata. Everything downstream looks
/// fields up through these, never through inline literals.
pub mod fields {
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const STATION_ID: &str = "Originators Station ID";
    pub const CAST: &str = "CAST";
    pub const NODC_CRUISE_ID: &str = "NODC Cruise ID";
    pub const ORIGINATORS_CRUISE_ID: &str = "Originators Cruise ID";
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const DAY: &str = "Day";
    pub const TIME: &str = "Time";
}

/// One station's key/value block. Later values for a key replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rec = Record::new();
        for (k, v) in iter {
            rec.insert(k, v);
        }
        rec
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waypoint {
    pub lat: String,
    pub lon: String,
    pub name: String,
    pub description: String,
    pub time: Option<String>, // ISO-8601, UTC
    pub symbol: String,
}
