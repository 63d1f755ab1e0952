//! Column mapper: picks the five canonical fields out of raw rows.

use crate::error::{Error, Result};
use crate::record::{Cell, ColumnPositions, RawRow, TransactionRecord};

/// Map raw rows onto canonical transaction records.
///
/// Every position must exist in every row; a short row fails the whole
/// mapping with `OutOfRange` instead of being truncated. Missing text cells
/// become empty strings, while a missing or non-numeric amount is `Invalid`.
/// Text amounts are read with `decimal` as the decimal separator.
pub fn map_columns(
    rows: &[RawRow],
    positions: &ColumnPositions,
    decimal: char,
) -> Result<Vec<TransactionRecord>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| map_row(index + 1, row, positions, decimal))
        .collect()
}

fn map_row(
    row_no: usize,
    row: &RawRow,
    positions: &ColumnPositions,
    decimal: char,
) -> Result<TransactionRecord> {
    let date = row.cell(row_no, positions.date)?;
    let iban = row.cell(row_no, positions.iban)?;
    let name = row.cell(row_no, positions.name)?;
    let amount_cell = row.cell(row_no, positions.amount)?;
    let description = row.cell(row_no, positions.description)?;

    let amount = amount_cell.as_amount(decimal).ok_or_else(|| {
        Error::invalid(format!(
            "row {row_no}: amount {} in column {} is not a number",
            describe(amount_cell),
            positions.amount
        ))
    })?;

    Ok(TransactionRecord {
        date: owned_text(date),
        iban: owned_text(iban),
        name: owned_text(name),
        amount,
        description: owned_text(description),
    })
}

fn owned_text(cell: &Cell) -> String {
    cell.as_text().map(|s| s.into_owned()).unwrap_or_default()
}

fn describe(cell: &Cell) -> String {
    match cell.as_text() {
        Some(text) => format!("{text:?}"),
        None => "(missing)".to_string(),
    }
}
