//! kasboek-ingest: statement loading (delimited text and PDF text) into raw rows.

pub mod csv_loader;
pub mod pdf;

pub use csv_loader::{CsvOptions, encoding_for_label, load_csv, parse_csv};
pub use pdf::{PDF_POSITIONS, PDF_TYPE_POSITION, PdfStatement, load_pdf, parse_statement_text};
