//! Delimited statement loading.
//!
//! Bytes are decoded with the profile's encoding, split with the profile's
//! delimiter, and every field becomes a text [`Cell`]. Amounts are parsed
//! later, at the amount position only, with the profile's decimal separator.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use encoding_rs::Encoding;
use kasboek_core::{BankProfile, Cell, Error, RawRow, Result};
use log::debug;

/// Reader settings derived from a bank profile.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub has_header: bool,
}

impl CsvOptions {
    pub fn from_profile(profile: &BankProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            delimiter: profile.delimiter as u8,
            encoding: encoding_for_label(&profile.encoding)?,
            has_header: profile.has_header,
        })
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: encoding_rs::UTF_8,
            has_header: false,
        }
    }
}

/// Resolve an encoding label. `ansi` is accepted as windows-1252, which is
/// what Windows-exported statements mean by it.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("ansi") {
        return Ok(encoding_rs::WINDOWS_1252);
    }
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::invalid(format!("unknown encoding {label:?}")))
}

/// Load a statement file into raw rows.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::invalid(format!("reading {}: {e}", path.display())),
    })?;

    let rows = parse_csv(&bytes, options)
        .map_err(|e| match e {
            Error::Invalid(msg) => Error::invalid(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse statement bytes into raw rows. An input without data rows is `Invalid`.
pub fn parse_csv(bytes: &[u8], options: &CsvOptions) -> Result<Vec<RawRow>> {
    let (text, _, had_errors) = options.encoding.decode(bytes);
    if had_errors {
        return Err(Error::invalid(format!(
            "content is not valid {}",
            options.encoding.name()
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| Error::invalid(format!("record {}: {e}", index + 1)))?;
        rows.push(record.iter().map(Cell::text).collect::<RawRow>());
    }

    if rows.iter().all(RawRow::is_blank) {
        return Err(Error::invalid("no transaction rows found"));
    }
    Ok(rows)
}
