//! Label patterns for railway receipt fields.
//!
//! Every pattern is case-insensitive and captures the value in group 1.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // RR number: alphanumerics plus '-' and '/'
    pub static ref RR_NO: Regex = Regex::new(
        r"(?i)RR\s*No[:\-]?\s*([A-Z0-9\-/]+)"
    ).unwrap();

    // RR date: D/M/Y with '/', '-' or '.' separators
    pub static ref RR_DATE: Regex = Regex::new(
        r"(?i)RR\s*Date[:\-]?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})"
    ).unwrap();

    // Stations: greedy run of word characters and whitespace, may span lines
    pub static ref STATION_FROM: Regex = Regex::new(
        r"(?i)Station\s*From[:\-]?\s*([\w\s]+)"
    ).unwrap();

    pub static ref STATION_TO: Regex = Regex::new(
        r"(?i)Station\s*To[:\-]?\s*([\w\s]+)"
    ).unwrap();

    // Wagon count
    pub static ref NO_OF_WAGON: Regex = Regex::new(
        r"(?i)No\.?\s*of\s*Wagons?[:\-]?\s*(\d+)"
    ).unwrap();

    pub static ref WAGON_BARE: Regex = Regex::new(
        r"(?i)Wagons?\s*[:\-]?\s*(\d+)"
    ).unwrap();

    // Freight amount with optional rupee marker
    pub static ref TOTAL_FREIGHT: Regex = Regex::new(
        r"(?i)Total\s*Freight[:\-]?\s*(?:₹|Rs\.?)?\s?([\d,]+(?:\.\d{1,2})?)"
    ).unwrap();

    pub static ref FREIGHT_BARE: Regex = Regex::new(
        r"(?i)Freight\s*[:\-]?\s*(?:₹|Rs\.?)?\s?([\d,]+(?:\.\d{1,2})?)"
    ).unwrap();

    // Weight
    pub static ref ACTUAL_WEIGHT: Regex = Regex::new(
        r"(?i)Actual\s*Weight[:\-]?\s*([\d,]+(?:\.\d{1,2})?)"
    ).unwrap();

    // First '{' through last '}' of a model reply
    pub static ref JSON_SPAN: Regex = Regex::new(
        r"(?s)\{.*\}"
    ).unwrap();
}
