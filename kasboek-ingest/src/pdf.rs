//! PDF statement adapter (text extraction + line regex).
//!
//! Expected extracted-text rows:
//!   02-01-2024   Albert Heijn 1234>Amsterdam      Af    12,50
//!   05-01-2024   Salaris januari                  Bij   2.450,00
//!
//! Statement PDFs carry no counterparty IBAN or name column, so both come out
//! missing and are left to the profile's normalizers.

use std::io::ErrorKind;
use std::path::Path;

use kasboek_core::{Cell, ColumnPositions, Error, RawRow, Result, parse_number};
use log::{debug, warn};
use regex::Regex;

/// Layout of the rows produced by [`parse_statement_text`].
pub const PDF_POSITIONS: ColumnPositions = ColumnPositions {
    date: 0,
    name: 1,
    amount: 2,
    description: 3,
    iban: 4,
};
/// Column holding the `Af`/`Bij` (debit/credit) marker.
pub const PDF_TYPE_POSITION: usize = 5;

/// Rows recovered from a statement's text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdfStatement {
    pub rows: Vec<RawRow>,
    /// Dated lines that did not match the transaction pattern.
    pub skipped: usize,
}

/// Extract the text of every page.
pub fn extract_pdf_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::invalid(format!("reading {}: {e}", path.display())),
    })?;

    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| Error::invalid(format!("extracting text from {}: {e}", path.display())))
}

/// Parse extracted statement text into raw rows laid out as
/// `[date, name, amount, description, iban, type]`.
pub fn parse_statement_text(text: &str) -> Result<PdfStatement> {
    let dated_re = Regex::new(r"^\s*\d{2}-\d{2}-\d{4}\b")
        .map_err(|e| Error::invalid(e.to_string()))?;
    let txn_re = Regex::new(concat!(
        r"^\s*(?P<date>\d{2}-\d{2}-\d{4})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<kind>Af|Bij|Debit|Credit)\s+",
        r"(?P<amount>\d{1,3}(?:\.\d{3})*,\d{2})\s*$"
    ))
    .map_err(|e| Error::invalid(e.to_string()))?;

    let mut out = PdfStatement::default();
    for line in text.lines() {
        let Some(caps) = txn_re.captures(line) else {
            if dated_re.is_match(line) {
                warn!("skipping unrecognised statement line: {}", line.trim());
                out.skipped += 1;
            }
            continue;
        };

        let Some(amount) = parse_number(&caps["amount"], ',') else {
            out.skipped += 1;
            continue;
        };

        out.rows.push(RawRow::new(vec![
            Cell::text(&caps["date"]),
            Cell::Missing,
            Cell::Number(amount),
            Cell::text(&caps["desc"]),
            Cell::Missing,
            Cell::text(&caps["kind"]),
        ]));
    }

    debug!(
        "pdf statement: {} rows, {} skipped lines",
        out.rows.len(),
        out.skipped
    );

    if out.rows.is_empty() {
        return Err(Error::invalid("no transactions found in statement text"));
    }
    Ok(out)
}

/// Extract and parse a statement PDF in one step.
pub fn load_pdf(path: impl AsRef<Path>) -> Result<PdfStatement> {
    let text = extract_pdf_text(path)?;
    parse_statement_text(&text)
}
