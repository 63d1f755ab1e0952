//! Row normalizers applied before column mapping.
//!
//! Each normalizer checks every row against its positions before touching any
//! cell, so a failed call leaves the rows as they were.

use log::debug;

use crate::error::{Error, Result};
use crate::record::{Cell, RawRow, UNKNOWN_IBAN, UNKNOWN_NAME};

/// Default delimiter separating the counterparty from the rest of a description.
pub const DEFAULT_NAME_DELIMITER: char = '>';
/// Default marker of a debit in a separate debit/credit column.
pub const DEFAULT_DEBIT_MARKER: &str = "Debit";

/// Replace missing or blank IBANs with [`UNKNOWN_IBAN`].
pub fn normalize_iban(rows: &mut [RawRow], iban_position: usize) -> Result<()> {
    ensure_width(rows, &[iban_position])?;

    let mut replaced = 0usize;
    for (index, row) in rows.iter_mut().enumerate() {
        let cell = row.cell_mut(index + 1, iban_position)?;
        if is_blank(cell) {
            *cell = Cell::Text(UNKNOWN_IBAN.to_string());
            replaced += 1;
        }
    }

    debug!("normalize_iban: {replaced} of {} rows set to {UNKNOWN_IBAN:?}", rows.len());
    Ok(())
}

/// Backfill missing names with the part of the description before `delimiter`.
///
/// Rows without a description get [`UNKNOWN_NAME`].
pub fn normalize_names(
    rows: &mut [RawRow],
    name_position: usize,
    description_position: usize,
    delimiter: char,
) -> Result<()> {
    ensure_width(rows, &[name_position, description_position])?;

    let mut backfilled = 0usize;
    for (index, row) in rows.iter_mut().enumerate() {
        let row_no = index + 1;
        if !is_blank(row.cell(row_no, name_position)?) {
            continue;
        }

        let name = row
            .cell(row_no, description_position)?
            .as_text()
            .and_then(|desc| leading_token(&desc, delimiter))
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        *row.cell_mut(row_no, name_position)? = Cell::Text(name);
        backfilled += 1;
    }

    debug!("normalize_names: backfilled {backfilled} of {} rows", rows.len());
    Ok(())
}

/// Drop blank rows, then sign each amount by its debit/credit column.
///
/// A type cell equal to one of `debit_markers` makes the amount negative,
/// anything else makes it positive. Text amounts are read with `decimal` as
/// the decimal separator.
pub fn normalize_amount_sign(
    rows: &mut Vec<RawRow>,
    amount_position: usize,
    type_position: usize,
    debit_markers: &[String],
    decimal: char,
) -> Result<()> {
    let before = rows.len();
    rows.retain(|row| !row.is_blank());
    if rows.len() != before {
        debug!("normalize_amount_sign: dropped {} blank rows", before - rows.len());
    }

    ensure_width(rows, &[amount_position, type_position])?;

    // Parse everything first so an invalid amount leaves no row half-signed.
    let mut signed = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let row_no = index + 1;
        let amount = row.cell(row_no, amount_position)?.as_amount(decimal).ok_or_else(|| {
            Error::invalid(format!(
                "row {row_no}: amount in column {amount_position} is missing or not a number"
            ))
        })?;

        let is_debit = row
            .cell(row_no, type_position)?
            .as_text()
            .is_some_and(|kind| debit_markers.iter().any(|m| m.as_str() == kind.trim()));

        signed.push(if is_debit { -amount.abs() } else { amount.abs() });
    }

    for (index, (row, amount)) in rows.iter_mut().zip(signed).enumerate() {
        *row.cell_mut(index + 1, amount_position)? = Cell::Number(amount);
    }

    Ok(())
}

fn leading_token(description: &str, delimiter: char) -> Option<String> {
    let token = description.split(delimiter).next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn is_blank(cell: &Cell) -> bool {
    cell.as_text().is_none_or(|text| text.trim().is_empty())
}

fn ensure_width(rows: &[RawRow], positions: &[usize]) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        for &position in positions {
            row.cell(index + 1, position)?;
        }
    }
    Ok(())
}
