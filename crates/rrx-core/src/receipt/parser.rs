//! Pattern-based receipt parser with positional zipping.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::receipt::{ExtractedRecord, FIELD_NAMES};

use super::rules::{FieldExtractor, WAGON_FIELD, field_rules};

/// Warning reported when a document yields no records.
pub const NO_RECORDS_WARNING: &str =
    "No data found using regex or 'No. of Wagon' field was missing.";

/// Result of pattern extraction.
#[derive(Debug, Clone, Default)]
pub struct PatternExtraction {
    /// Extracted records, in positional order.
    pub records: Vec<ExtractedRecord>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse receipt records from document text.
    fn parse(&self, text: &str) -> PatternExtraction;
}

/// Per-field match lists for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatches {
    columns: [Vec<String>; 7],
}

impl FieldMatches {
    /// Scan the whole text once per field.
    pub fn scan(text: &str) -> Self {
        let columns = field_rules().map(|rule| rule.extract_all(text));
        Self { columns }
    }

    /// Matches for a field label, in document order.
    pub fn column(&self, label: &str) -> &[String] {
        FIELD_NAMES
            .iter()
            .position(|name| *name == label)
            .map(|idx| self.columns[idx].as_slice())
            .unwrap_or(&[])
    }

    /// Number of positional rows: the longest column, at least one.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    /// Pair the i-th match of every field into record i.
    ///
    /// Rows without a wagon count are skipped; other fields default to
    /// empty. Fields that occur unevenly shift against each other.
    pub fn zip(&self) -> Vec<ExtractedRecord> {
        let mut records = Vec::new();

        for i in 0..self.row_count() {
            let cell = |col: usize| self.columns[col].get(i).cloned().unwrap_or_default();

            let no_of_wagon = cell(WAGON_FIELD);
            if no_of_wagon.is_empty() {
                continue;
            }

            records.push(ExtractedRecord {
                rr_no: cell(0),
                rr_date: cell(1),
                station_from: cell(2),
                station_to: cell(3),
                no_of_wagon,
                total_freight: cell(5),
                actual_weight: cell(6),
            });
        }

        records
    }
}

/// Extract every RR record from document text.
pub fn extract_records(text: &str) -> Vec<ExtractedRecord> {
    FieldMatches::scan(text).zip()
}

/// Regex receipt parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ReceiptParser for PatternExtractor {
    fn parse(&self, text: &str) -> PatternExtraction {
        let start = Instant::now();

        info!("Parsing receipt from {} characters of text", text.len());

        let matches = FieldMatches::scan(text);
        for label in FIELD_NAMES {
            debug!("{}: {} match(es)", label, matches.column(label).len());
        }

        let records = matches.zip();
        let mut warnings = Vec::new();
        if records.is_empty() {
            warnings.push(NO_RECORDS_WARNING.to_string());
        }

        debug!("Extracted {} record(s)", records.len());

        PatternExtraction {
            records,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SINGLE: &str = "RR No: RR123, RR Date: 01/02/2024, Station From: Delhi, \
                          Station To: Mumbai, No. of Wagon: 5, Total Freight: 1200.50, \
                          Actual Weight: 3000";

    #[test]
    fn test_no_labels_no_records() {
        assert!(extract_records("").is_empty());
        assert!(extract_records("Invoice 42\nNothing relevant here.").is_empty());
    }

    #[test]
    fn test_single_complete_record() {
        let records = extract_records(SINGLE);

        assert_eq!(
            records,
            vec![ExtractedRecord {
                rr_no: "RR123".to_string(),
                rr_date: "01/02/2024".to_string(),
                station_from: "Delhi".to_string(),
                station_to: "Mumbai".to_string(),
                no_of_wagon: "5".to_string(),
                total_freight: "1200.50".to_string(),
                actual_weight: "3000".to_string(),
            }]
        );
    }

    #[test]
    fn test_record_skipped_without_wagon() {
        let text = "RR No: A1, Station From: Agra, Total Freight: 100";
        assert!(extract_records(text).is_empty());
    }

    #[test]
    fn test_wagon_is_anchor_for_each_row() {
        // Three RR numbers, one wagon: only row 0 survives.
        let text = "RR No: A1 No. of Wagon: 3 RR No: A2 RR No: A3";
        let records = extract_records(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rr_no, "A1");
        assert_eq!(records[0].no_of_wagon, "3");
    }

    #[test]
    fn test_two_wagons_one_rr_no() {
        let text = "RR No: RR1\nNo. of Wagon: 10\nNo. of Wagon: 20\n";
        let records = extract_records(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rr_no, "RR1");
        assert_eq!(records[0].no_of_wagon, "10");
        assert_eq!(records[1].rr_no, "");
        assert_eq!(records[1].no_of_wagon, "20");
    }

    #[test]
    fn test_uneven_fields_shift_positionally() {
        // The first receipt has no station; the second receipt's station
        // lands in row 0.
        let text = "RR No: R1, No. of Wagon: 1.\n\
                    RR No: R2, Station To: Pune, No. of Wagon: 2.";
        let records = extract_records(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rr_no, "R1");
        assert_eq!(records[0].station_to, "Pune");
        assert_eq!(records[1].rr_no, "R2");
        assert_eq!(records[1].station_to, "");
    }

    #[test]
    fn test_fallback_is_document_wide() {
        // One primary wagon match disables the fallback for every row.
        let text = "No. of Wagon: 7\nWagons: 8\nWagons: 9";
        let matches = FieldMatches::scan(text);
        assert_eq!(matches.column("No. of Wagon").to_vec(), vec!["7".to_string()]);

        // Without any primary match the bare form is used throughout.
        let text = "Wagons: 8\nWagon - 9";
        let records = extract_records(text);
        let wagons: Vec<&str> = records.iter().map(|r| r.no_of_wagon.as_str()).collect();
        assert_eq!(wagons, vec!["8", "9"]);
    }

    #[test]
    fn test_freight_fallback() {
        let text = "No. of Wagon: 2 Freight: Rs. 5,000";
        let records = extract_records(text);
        assert_eq!(records[0].total_freight, "5,000");

        let text = "No. of Wagon: 2 Total Freight: 700 Freight: 5,000";
        let records = extract_records(text);
        assert_eq!(records[0].total_freight, "700");
    }

    #[test]
    fn test_labels_case_insensitive() {
        for label in ["rr no:", "RR NO:", "Rr No:"] {
            let text = format!("{} X9, no. of wagon: 4", label);
            let records = extract_records(&text);
            assert_eq!(records.len(), 1, "label {:?}", label);
            assert_eq!(records[0].rr_no, "X9");
        }
    }

    #[test]
    fn test_station_over_capture_preserved() {
        let text = "Station From: Delhi\nStation To: Mumbai\nNo. of Wagon: 5";
        let records = extract_records(text);

        assert_eq!(records[0].station_from, "Delhi\nStation To");
        assert_eq!(records[0].station_to, "Mumbai\nNo");
    }

    #[test]
    fn test_row_count_minimum_one() {
        let matches = FieldMatches::scan("");
        assert_eq!(matches.row_count(), 1);
        assert!(matches.zip().is_empty());
        assert!(matches.column("Unknown").is_empty());
    }

    #[test]
    fn test_parser_warns_on_empty_result() {
        let result = PatternExtractor::new().parse("nothing to see");
        assert!(result.records.is_empty());
        assert_eq!(result.warnings, vec![NO_RECORDS_WARNING.to_string()]);

        let result = PatternExtractor::new().parse(SINGLE);
        assert_eq!(result.records.len(), 1);
        assert!(result.warnings.is_empty());
    }
}
