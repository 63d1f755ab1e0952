//! Bank profiles: per-bank layout plus the quirks that bank needs.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::{
    DEFAULT_DEBIT_MARKER, DEFAULT_NAME_DELIMITER, normalize_amount_sign, normalize_iban,
    normalize_names,
};
use crate::record::{ColumnPositions, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Csv,
    Pdf,
}

impl SourceFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Pdf => "pdf",
        }
    }
}

/// Backfill missing names from the description's leading token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameBackfill {
    #[serde(default = "default_name_delimiter")]
    pub delimiter: char,
}

impl Default for NameBackfill {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_NAME_DELIMITER,
        }
    }
}

/// Take the amount's sign from a separate debit/credit column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountSign {
    pub type_position: usize,
    #[serde(default = "default_debit_markers")]
    pub debit_markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quirks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backfill_names: Option<NameBackfill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive_amount_sign: Option<AmountSign>,
}

/// Everything the pipeline needs to know about one bank's export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    pub name: String,
    #[serde(default)]
    pub format: SourceFormat,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_decimal")]
    pub decimal: char,
    /// WHATWG encoding label, e.g. `utf-8` or `windows-1252`
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub has_header: bool,
    pub positions: ColumnPositions,
    #[serde(default)]
    pub quirks: Quirks,
}

impl BankProfile {
    /// Reject settings the CSV reader cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("bank profile has an empty name"));
        }
        if !self.delimiter.is_ascii() {
            return Err(Error::invalid(format!(
                "{}: delimiter {:?} must be a single ASCII character",
                self.name, self.delimiter
            )));
        }
        if self.decimal != '.' && self.decimal != ',' {
            return Err(Error::invalid(format!(
                "{}: decimal separator must be '.' or ',', got {:?}",
                self.name, self.decimal
            )));
        }
        Ok(())
    }

    /// Run this bank's normalizers over freshly loaded rows.
    ///
    /// Sign derivation runs first because it also drops blank rows; IBANs are
    /// filled last so the mapper never sees a missing one.
    pub fn normalize(&self, rows: &mut Vec<RawRow>) -> Result<()> {
        if let Some(sign) = &self.quirks.derive_amount_sign {
            debug!("{}: deriving amount sign from column {}", self.name, sign.type_position);
            normalize_amount_sign(
                rows,
                self.positions.amount,
                sign.type_position,
                &sign.debit_markers,
                self.decimal,
            )?;
        }

        if let Some(backfill) = &self.quirks.backfill_names {
            debug!("{}: backfilling names split on {:?}", self.name, backfill.delimiter);
            normalize_names(
                rows,
                self.positions.name,
                self.positions.description,
                backfill.delimiter,
            )?;
        }

        normalize_iban(rows, self.positions.iban)
    }
}

fn default_delimiter() -> char {
    ';'
}

fn default_decimal() -> char {
    ','
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_name_delimiter() -> char {
    DEFAULT_NAME_DELIMITER
}

fn default_debit_markers() -> Vec<String> {
    vec![DEFAULT_DEBIT_MARKER.to_string()]
}
