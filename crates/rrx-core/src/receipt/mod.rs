//! Railway receipt field extraction.
//!
//! Two extractors share the [`ExtractedRecord`](crate::ExtractedRecord) model:
//! a regex extractor that zips per-field matches by position, and a model
//! extractor that delegates to a chat-completion backend.

pub mod model;
mod parser;
pub mod rules;

pub use model::{ModelExtraction, ModelExtractor, ModelReply, build_prompt, parse_reply};
pub use parser::{
    FieldMatches, NO_RECORDS_WARNING, PatternExtraction, PatternExtractor, ReceiptParser,
    extract_records,
};
