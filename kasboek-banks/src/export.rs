//! Two-sheet xlsx export.
//!
//! The workbook is built in memory and written through a temp file in the
//! destination directory, then renamed over `output`. A failure at any step
//! leaves nothing at `output`.

use std::io::Write;
use std::path::Path;

use kasboek_core::{AggregateRow, Error, IncomeExpenses, Result, TransactionRecord};
use log::info;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tempfile::NamedTempFile;

pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const SUMMARY_SHEET: &str = "Income & Expenses";

const AMOUNT_FORMAT: &str = "#,##0.00";

/// Write both tables to `output` as one workbook.
pub fn export(
    transactions: &[TransactionRecord],
    summary: &IncomeExpenses,
    output: &Path,
) -> Result<()> {
    let buffer = build_workbook(transactions, &summary.rows())
        .map_err(|e| Error::io(output, std::io::Error::other(e)))?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(output, e))?;
    tmp.write_all(&buffer).map_err(|e| Error::io(output, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(output, e))?;
    tmp.persist(output).map_err(|e| Error::io(output, e.error))?;

    info!(
        "wrote {} transactions and {} summary rows to {}",
        transactions.len(),
        summary.len(),
        output.display()
    );
    Ok(())
}

/// Serialize the workbook to xlsx bytes.
pub fn build_workbook(
    transactions: &[TransactionRecord],
    summary: &[AggregateRow],
) -> std::result::Result<Vec<u8>, XlsxError> {
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(AMOUNT_FORMAT);
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(TRANSACTIONS_SHEET)?;
        write_header(sheet, &TransactionRecord::HEADERS, &header)?;

        for (i, txn) in transactions.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &txn.date)?;
            sheet.write_string(row, 1, &txn.iban)?;
            sheet.write_string(row, 2, &txn.name)?;
            sheet.write_number_with_format(row, 3, to_number(txn.amount), &money)?;
            sheet.write_string(row, 4, &txn.description)?;
        }
        sheet.autofit();
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_header(sheet, &AggregateRow::HEADERS, &header)?;

        // Padding cells are left unwritten so they read back empty.
        for (i, agg) in summary.iter().enumerate() {
            let row = (i + 1) as u32;
            if let Some(name) = &agg.income_name {
                sheet.write_string(row, 0, name)?;
            }
            if let Some(amount) = agg.income_amount {
                sheet.write_number_with_format(row, 1, to_number(amount), &money)?;
            }
            if let Some(name) = &agg.expense_name {
                sheet.write_string(row, 2, name)?;
            }
            if let Some(amount) = agg.expense_amount {
                sheet.write_number_with_format(row, 3, to_number(amount), &money)?;
            }
        }
        sheet.autofit();
    }

    workbook.save_to_buffer()
}

fn write_header(
    sheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn to_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
