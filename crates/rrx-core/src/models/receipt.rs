//! Railway receipt record model.

use serde::{Deserialize, Serialize};

/// Display labels of the seven RR fields, in output order.
pub const FIELD_NAMES: [&str; 7] = [
    "RR No",
    "RR Date",
    "Station From",
    "Station To",
    "No. of Wagon",
    "Total Freight",
    "Actual Weight",
];

/// One freight record pulled from a railway receipt.
///
/// Values are kept exactly as matched: no numeric parsing, no date
/// normalization. A missing field is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedRecord {
    #[serde(rename = "RR No")]
    pub rr_no: String,

    #[serde(rename = "RR Date")]
    pub rr_date: String,

    #[serde(rename = "Station From")]
    pub station_from: String,

    #[serde(rename = "Station To")]
    pub station_to: String,

    #[serde(rename = "No. of Wagon")]
    pub no_of_wagon: String,

    #[serde(rename = "Total Freight")]
    pub total_freight: String,

    #[serde(rename = "Actual Weight")]
    pub actual_weight: String,
}

impl ExtractedRecord {
    /// Field values in [`FIELD_NAMES`] order.
    pub fn values(&self) -> [&str; 7] {
        [
            self.rr_no.as_str(),
            self.rr_date.as_str(),
            self.station_from.as_str(),
            self.station_to.as_str(),
            self.no_of_wagon.as_str(),
            self.total_freight.as_str(),
            self.actual_weight.as_str(),
        ]
    }

    /// Look a value up by its display label.
    pub fn get(&self, label: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .position(|name| *name == label)
            .map(|idx| self.values()[idx])
    }

    /// Build a record from a loosely-typed JSON object.
    ///
    /// Strings are copied, numbers and booleans are rendered as text, and
    /// anything else (or a missing key) leaves the field empty.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let text = |label: &str| -> String {
            match object.get(label) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                Some(serde_json::Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            }
        };

        Self {
            rr_no: text(FIELD_NAMES[0]),
            rr_date: text(FIELD_NAMES[1]),
            station_from: text(FIELD_NAMES[2]),
            station_to: text(FIELD_NAMES[3]),
            no_of_wagon: text(FIELD_NAMES[4]),
            total_freight: text(FIELD_NAMES[5]),
            actual_weight: text(FIELD_NAMES[6]),
        }
    }
}
