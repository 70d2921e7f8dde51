use serde::{Deserialize, Serialize, Serializer};

/// The four raw text fields pulled out of one listing fragment,
/// exactly as the catalog displays them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFields {
    pub name: String,
    pub price: String,
    pub area: String,
    pub location: String,
}

/// One row of the record store.
///
/// `index` is assigned by the collector and never rewritten afterwards,
/// not even by deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "Index")]
    pub index: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl ListingRecord {
    pub fn new(index: u64, fields: ListingFields) -> Self {
        Self {
            index,
            name: fields.name,
            price: fields.price,
            area: fields.area,
            location: fields.location,
        }
    }

    /// Identity used by the deduplicator.
    pub fn identity(&self) -> (String, String) {
        (self.name.clone(), self.location.clone())
    }
}

/// Typed view of a listing produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Price")]
    pub price: u64,
    #[serde(rename = "Area", serialize_with = "shortest_float")]
    pub area: f64,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl NormalizedRecord {
    pub fn price_per_sqm(&self) -> Option<f64> {
        if self.area > 0.0 {
            Some(self.price as f64 / self.area)
        } else {
            None
        }
    }
}

// 85.0 is written as "85", 85.5 as "85.5".
fn shortest_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
