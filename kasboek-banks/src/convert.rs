//! Conversion pipeline: load → normalize → map → aggregate → export.

use std::path::{Path, PathBuf};

use kasboek_core::{
    BankProfile, IncomeExpenses, RawRow, Result, SourceFormat, TransactionRecord, ZeroSumPolicy,
    aggregate, map_columns,
};
use kasboek_ingest::{CsvOptions, load_csv, load_pdf};
use log::{debug, info};

use crate::export::export;

/// Mapped transactions plus their income/expense summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub transactions: Vec<TransactionRecord>,
    pub summary: IncomeExpenses,
}

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub bank: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub transactions: usize,
    pub income_groups: usize,
    pub expense_groups: usize,
    /// Source lines the loader could not read as transactions (PDF only).
    pub skipped_lines: usize,
}

/// Runs one bank's statement through the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    profile: &'a BankProfile,
    zero_sum: ZeroSumPolicy,
}

impl<'a> Converter<'a> {
    pub fn new(profile: &'a BankProfile) -> Self {
        Self {
            profile,
            zero_sum: ZeroSumPolicy::default(),
        }
    }

    pub fn with_zero_sum(mut self, policy: ZeroSumPolicy) -> Self {
        self.zero_sum = policy;
        self
    }

    /// Load the input's raw rows and count of skipped source lines.
    pub fn load(&self, input: &Path) -> Result<(Vec<RawRow>, usize)> {
        match self.profile.format {
            SourceFormat::Csv => {
                let options = CsvOptions::from_profile(self.profile)?;
                Ok((load_csv(input, &options)?, 0))
            }
            SourceFormat::Pdf => {
                let statement = load_pdf(input)?;
                Ok((statement.rows, statement.skipped))
            }
        }
    }

    /// Normalize, map and aggregate already loaded rows.
    pub fn transform(&self, mut rows: Vec<RawRow>) -> Result<Conversion> {
        self.profile.normalize(&mut rows)?;
        let transactions = map_columns(&rows, &self.profile.positions, self.profile.decimal)?;
        debug!("{}: mapped {} transactions", self.profile.name, transactions.len());

        let summary = aggregate(&transactions, self.zero_sum);
        Ok(Conversion {
            transactions,
            summary,
        })
    }

    /// Export a finished conversion to `output` and describe the result.
    ///
    /// The caller is responsible for `output`'s parent directory existing.
    pub fn write(
        &self,
        conversion: &Conversion,
        input: &Path,
        output: &Path,
        skipped_lines: usize,
    ) -> Result<ConversionReport> {
        export(&conversion.transactions, &conversion.summary, output)?;

        let report = ConversionReport {
            bank: self.profile.name.clone(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            transactions: conversion.transactions.len(),
            income_groups: conversion.summary.income_groups().count(),
            expense_groups: conversion.summary.expense_groups().count(),
            skipped_lines,
        };
        info!(
            "{}: converted {} -> {}",
            report.bank,
            report.input.display(),
            report.output.display()
        );
        Ok(report)
    }

    /// Convert `input` into a workbook at `output`.
    ///
    /// Nothing is written unless loading and transforming both succeed.
    pub fn run(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let (rows, skipped_lines) = self.load(input)?;
        let conversion = self.transform(rows)?;
        self.write(&conversion, input, output, skipped_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{ing, ing_pdf, sns};
    use kasboek_core::{ColumnPositions, Error, Quirks, UNKNOWN_IBAN};
    use kasboek_ingest::{parse_csv, parse_statement_text};
    use rust_decimal::Decimal;

    fn plain_profile() -> BankProfile {
        BankProfile {
            name: "plain".to_string(),
            format: SourceFormat::Csv,
            delimiter: ';',
            decimal: ',',
            encoding: "utf-8".to_string(),
            has_header: false,
            positions: ColumnPositions {
                date: 0,
                name: 1,
                amount: 2,
                description: 3,
                iban: 4,
            },
            quirks: Quirks::default(),
        }
    }

    #[test]
    fn test_transform_alice_scenario() {
        let rows = vec![
            RawRow::from_iter(["01-01-2024", "Alice", "100", "groceries", "NL01X"]),
            RawRow::from_iter(["01-01-2024", "Alice", "-20", "refund", "NL01X"]),
        ];
        let profile = plain_profile();
        let conversion = Converter::new(&profile).transform(rows).unwrap();

        assert_eq!(conversion.transactions.len(), 2);
        let income: Vec<_> = conversion.summary.income_groups().collect();
        assert_eq!(income.len(), 1);
        assert_eq!((income[0].name.as_str(), income[0].iban.as_str()), ("Alice", "NL01X"));
        assert_eq!(income[0].amount, Decimal::from(80));
    }

    #[test]
    fn test_transform_fills_unknown_iban() {
        let rows = vec![RawRow::from_iter(["01-01-2024", "Bob", "-5", "coffee", ""])];
        let profile = plain_profile();
        let conversion = Converter::new(&profile).transform(rows).unwrap();
        assert_eq!(conversion.transactions[0].iban, UNKNOWN_IBAN);
    }

    #[test]
    fn test_ing_signs_from_type_column() {
        let row = |kind: &str| {
            RawRow::from_iter([
                "20240102", "Albert Heijn", "NL01INGB", "NL02RABO", "BA", kind, "12,50", "Betaalautomaat", "Pas 001",
            ])
        };
        let profile = ing();
        let conversion = Converter::new(&profile)
            .transform(vec![row("Debit"), row("Credit")])
            .unwrap();

        assert_eq!(conversion.transactions[0].amount, Decimal::new(-1250, 2));
        assert_eq!(conversion.transactions[1].amount, Decimal::new(1250, 2));
        assert!(conversion.summary.is_empty());
    }

    #[test]
    fn test_sns_short_row_is_out_of_range() {
        let rows = vec![RawRow::from_iter(["01-01-2024", "x", "NL01", ""])];
        let profile = sns();
        let err = Converter::new(&profile).transform(rows).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }), "got {err:?}");
    }

    #[test]
    fn test_only_amount_column_is_numeric() {
        let profile = plain_profile();
        let options = CsvOptions::from_profile(&profile).unwrap();
        let rows = parse_csv(b"01-01-2024;12,50;7,00;1.000;NL01\n", &options).unwrap();

        let conversion = Converter::new(&profile).transform(rows).unwrap();
        let record = &conversion.transactions[0];
        assert_eq!(record.name, "12,50");
        assert_eq!(record.amount, Decimal::from(7));
        assert_eq!(record.description, "1.000");
        assert_eq!(record.iban, "NL01");
    }

    #[test]
    fn test_pdf_statement_through_ing_pdf_profile() {
        let text = r#"
Datum        Omschrijving                          Af/Bij   Bedrag
02-01-2024   Albert Heijn 1234>Amsterdam           Af       12,50
05-01-2024   Salaris januari                       Bij      2.450,00
"#;
        let statement = parse_statement_text(text).unwrap();
        let profile = ing_pdf();
        let conversion = Converter::new(&profile).transform(statement.rows).unwrap();

        let txns = &conversion.transactions;
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].name, "Albert Heijn 1234");
        assert_eq!(txns[0].amount, Decimal::new(-1250, 2));
        assert_eq!(txns[0].description, "Albert Heijn 1234>Amsterdam");
        assert_eq!(txns[1].name, "Salaris januari");
        assert_eq!(txns[1].amount, Decimal::new(245000, 2));
        assert!(txns.iter().all(|t| t.iban == UNKNOWN_IBAN));

        let income: Vec<_> = conversion.summary.income_groups().collect();
        let expense: Vec<_> = conversion.summary.expense_groups().collect();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salaris januari");
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].amount, Decimal::new(-1250, 2));
    }
}
