//! kasboek-banks: bank profiles, the conversion pipeline and the xlsx exporter

pub mod convert;
pub mod export;
pub mod profiles;

pub use convert::{Conversion, ConversionReport, Converter};
pub use export::{SUMMARY_SHEET, TRANSACTIONS_SHEET, export};
pub use profiles::{ProfileRegistry, builtin_profiles};
