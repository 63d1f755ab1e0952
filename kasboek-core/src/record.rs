//! Row and record types flowing through a conversion.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::number::parse_number;

/// Placeholder written when a row carries no counterparty IBAN.
pub const UNKNOWN_IBAN: &str = "Unknown IBAN";
/// Placeholder written when neither a name nor a description is available.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A single untyped cell of a raw statement row.
///
/// Loaders produce `Text` for every field; only the amount column is ever
/// turned into a `Number`, by whichever step signs or reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Missing,
    Text(String),
    Number(Decimal),
}

impl Cell {
    /// Build a text cell; blank input becomes `Missing`.
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Read the cell as an amount, parsing text with `decimal` as the
    /// decimal separator.
    pub fn as_amount(&self, decimal: char) -> Option<Decimal> {
        match self {
            Cell::Missing => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_number(s, decimal),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

/// One raw statement row, positionally indexed with no schema of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is missing.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_missing)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `position`, or `OutOfRange` naming `row` (1-based).
    pub fn cell(&self, row: usize, position: usize) -> Result<&Cell> {
        self.cells.get(position).ok_or(Error::OutOfRange {
            row,
            position,
            width: self.cells.len(),
        })
    }

    pub fn cell_mut(&mut self, row: usize, position: usize) -> Result<&mut Cell> {
        let width = self.cells.len();
        self.cells.get_mut(position).ok_or(Error::OutOfRange {
            row,
            position,
            width,
        })
    }
}

impl<C: Into<Cell>> FromIterator<C> for RawRow {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Zero-based positions of the five canonical fields within a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPositions {
    pub date: usize,
    pub name: usize,
    pub amount: usize,
    pub description: usize,
    pub iban: usize,
}

/// Canonical transaction, the common export shape for every bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "IBAN")]
    pub iban: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Negative = expense, positive = income
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Description")]
    pub description: String,
}

impl TransactionRecord {
    /// Column headers in canonical field order.
    pub const HEADERS: [&'static str; 5] = ["Date", "IBAN", "Name", "Amount", "Description"];

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_missing() {
        assert_eq!(Cell::text("   "), Cell::Missing);
        assert_eq!(Cell::text(" NL01 "), Cell::Text("NL01".to_string()));
    }

    #[test]
    fn test_text_amount_uses_separator() {
        assert_eq!(Cell::text("+12.50").as_amount('.'), Some(Decimal::new(1250, 2)));
        assert_eq!(Cell::text("+12,50").as_amount(','), Some(Decimal::new(1250, 2)));
        assert_eq!(Cell::text("groceries").as_amount(','), None);
        assert_eq!(Cell::Number(Decimal::from(3)).as_amount(','), Some(Decimal::from(3)));
    }

    #[test]
    fn test_cell_out_of_range_reports_width() {
        let row: RawRow = ["a", "b"].into_iter().collect();
        match row.cell(3, 7) {
            Err(Error::OutOfRange { row, position, width }) => {
                assert_eq!((row, position, width), (3, 7, 2));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_record_serializes_with_canonical_headers() {
        let record = TransactionRecord {
            date: "01-01-2024".to_string(),
            iban: "NL01X".to_string(),
            name: "Alice".to_string(),
            amount: Decimal::from(-20),
            description: "refund".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        for header in TransactionRecord::HEADERS {
            assert!(json.get(header).is_some(), "missing {header}");
        }
        assert!(record.is_expense());
    }
}
