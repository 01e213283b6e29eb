//! Recruta Import - Parecer import pipeline.
//!
//! A parecer file goes through:
//! - text extraction (PDF or plain text)
//! - label-based field parsing, with the filename convention as fallback
//! - identity reconciliation against existing candidates, clients and jobs
//! - persistence as a pipeline link plus an assessment log entry

mod error;
mod extractor;
mod fields;
mod filename;
mod importer;
mod reconciler;

pub use error::{ImportError, ImportResult};
pub use extractor::{FileTextExtractor, PdfTextExtractor, PlainTextExtractor, TextExtractor};
pub use fields::{extract_fields, ExtractedFields, LineField, LINE_FIELDS};
pub use filename::{infer_from_filename, FilenameInference, FilenameRules};
pub use importer::{collect_files, FileOutcome, ImportOptions, ImportReport, ImportedFile, Importer};
pub use reconciler::{parse_age, Reconciler};
