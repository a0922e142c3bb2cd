//! Rule-based field extractors for railway receipts.

pub mod patterns;

pub use patterns::*;

use regex::Regex;
use tracing::trace;

use crate::models::receipt::FIELD_NAMES;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<String>;
}

/// A labeled field with a primary pattern and an optional fallback.
///
/// The fallback runs only when the primary finds nothing in the whole text.
pub struct LabeledField {
    /// Display label of the field.
    pub label: &'static str,
    primary: &'static Regex,
    fallback: Option<&'static Regex>,
}

impl LabeledField {
    pub fn new(label: &'static str, primary: &'static Regex) -> Self {
        Self {
            label,
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: &'static Regex) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl FieldExtractor for LabeledField {
    fn extract_all(&self, text: &str) -> Vec<String> {
        let found = capture_all(self.primary, text);
        if !found.is_empty() {
            return found;
        }

        match self.fallback {
            Some(fallback) => {
                let found = capture_all(fallback, text);
                trace!("{}: primary found nothing, fallback found {}", self.label, found.len());
                found
            }
            None => found,
        }
    }
}

fn capture_all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Index of the mandatory wagon-count field in [`FIELD_NAMES`] order.
pub const WAGON_FIELD: usize = 4;

/// The seven field rules, in [`FIELD_NAMES`] order.
pub fn field_rules() -> [LabeledField; 7] {
    [
        LabeledField::new(FIELD_NAMES[0], &RR_NO),
        LabeledField::new(FIELD_NAMES[1], &RR_DATE),
        LabeledField::new(FIELD_NAMES[2], &STATION_FROM),
        LabeledField::new(FIELD_NAMES[3], &STATION_TO),
        LabeledField::new(FIELD_NAMES[4], &NO_OF_WAGON).with_fallback(&WAGON_BARE),
        LabeledField::new(FIELD_NAMES[5], &TOTAL_FREIGHT).with_fallback(&FREIGHT_BARE),
        LabeledField::new(FIELD_NAMES[6], &ACTUAL_WEIGHT),
    ]
}
