//! Built-in bank profiles and the registry that resolves them by name.
//!
//! Column positions are zero-based and match each bank's standard export.

use std::collections::BTreeMap;

use kasboek_core::{
    AmountSign, BankProfile, ColumnPositions, Error, NameBackfill, Quirks, Result, SourceFormat,
};
use kasboek_ingest::{PDF_POSITIONS, PDF_TYPE_POSITION};

/// ING "Af Bij" CSV export. Amounts are unsigned; the sign lives in column 5.
pub fn ing() -> BankProfile {
    BankProfile {
        name: "ing".to_string(),
        format: SourceFormat::Csv,
        delimiter: ';',
        decimal: ',',
        encoding: "utf-8".to_string(),
        has_header: true,
        positions: ColumnPositions {
            date: 0,
            name: 1,
            amount: 6,
            description: 8,
            iban: 3,
        },
        quirks: Quirks {
            backfill_names: None,
            derive_amount_sign: Some(AmountSign {
                type_position: 5,
                debit_markers: vec!["Debit".to_string(), "Af".to_string()],
            }),
        },
    }
}

/// Rabobank CSV export (windows-1252, comma separated, quoted amounts).
pub fn rabo() -> BankProfile {
    BankProfile {
        name: "rabo".to_string(),
        format: SourceFormat::Csv,
        delimiter: ',',
        decimal: ',',
        encoding: "windows-1252".to_string(),
        has_header: true,
        positions: ColumnPositions {
            date: 4,
            name: 9,
            amount: 6,
            description: 19,
            iban: 8,
        },
        quirks: Quirks::default(),
    }
}

/// SNS CSV export. No header row, and card payments leave the name empty.
pub fn sns() -> BankProfile {
    BankProfile {
        name: "sns".to_string(),
        format: SourceFormat::Csv,
        delimiter: ';',
        decimal: ',',
        encoding: "utf-8".to_string(),
        has_header: false,
        positions: ColumnPositions {
            date: 0,
            name: 3,
            amount: 10,
            description: 17,
            iban: 2,
        },
        quirks: Quirks {
            backfill_names: Some(NameBackfill { delimiter: '>' }),
            derive_amount_sign: None,
        },
    }
}

/// ING PDF statement, read through the text adapter.
pub fn ing_pdf() -> BankProfile {
    BankProfile {
        name: "ing-pdf".to_string(),
        format: SourceFormat::Pdf,
        delimiter: ';',
        decimal: ',',
        encoding: "utf-8".to_string(),
        has_header: false,
        positions: PDF_POSITIONS,
        quirks: Quirks {
            backfill_names: Some(NameBackfill { delimiter: '>' }),
            derive_amount_sign: Some(AmountSign {
                type_position: PDF_TYPE_POSITION,
                debit_markers: vec!["Af".to_string(), "Debit".to_string()],
            }),
        },
    }
}

pub fn builtin_profiles() -> Vec<BankProfile> {
    vec![ing(), rabo(), sns(), ing_pdf()]
}

/// Profiles by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, BankProfile>,
}

impl ProfileRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for profile in builtin_profiles() {
            registry.profiles.insert(profile.name.clone(), profile);
        }
        registry
    }

    /// Add or replace a profile after validating it.
    pub fn insert(&mut self, profile: BankProfile) -> Result<()> {
        profile.validate()?;
        self.profiles
            .insert(profile.name.trim().to_lowercase(), profile);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&BankProfile> {
        self.profiles
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| {
                Error::invalid(format!(
                    "unknown bank {name:?} (known: {})",
                    self.names().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BankProfile> {
        self.profiles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for profile in builtin_profiles() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(registry.get("ING").unwrap().positions.amount, 6);
        assert_eq!(registry.get(" sns ").unwrap().positions.description, 17);
    }

    #[test]
    fn test_unknown_bank_lists_known_names() {
        let err = ProfileRegistry::builtin().get("abn").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("abn"));
        assert!(msg.contains("rabo"));
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut registry = ProfileRegistry::builtin();
        let mut custom = rabo();
        custom.name = "Rabo".to_string();
        custom.encoding = "utf-8".to_string();
        registry.insert(custom).unwrap();

        assert_eq!(registry.get("rabo").unwrap().encoding, "utf-8");
        assert_eq!(registry.names().count(), 4);
    }

    #[test]
    fn test_only_variant_banks_carry_quirks() {
        assert!(rabo().quirks.backfill_names.is_none());
        assert!(rabo().quirks.derive_amount_sign.is_none());
        assert!(sns().quirks.backfill_names.is_some());
        assert!(ing().quirks.derive_amount_sign.is_some());
    }
}
