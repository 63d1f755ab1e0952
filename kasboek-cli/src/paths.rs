use anyhow::{Context, Result};
use kasboek_core::{Error, SourceFormat};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PathsSection;

/// Statements live at `<data_dir>/<year>/<month>.<ext>`, workbooks go to
/// `<results_dir>/<year>/<name>.xlsx`.
#[derive(Debug, Clone)]
pub struct FileLayout {
    data_dir: PathBuf,
    results_dir: PathBuf,
}

impl FileLayout {
    pub fn new(paths: &PathsSection) -> Self {
        Self {
            data_dir: paths.data_dir.clone(),
            results_dir: paths.results_dir.clone(),
        }
    }

    /// Path of an existing statement file.
    pub fn input_path(&self, year: i32, month: &str, format: SourceFormat) -> Result<PathBuf> {
        let path = self
            .data_dir
            .join(year.to_string())
            .join(format!("{}.{}", month.trim(), format.extension()));
        if !path.exists() {
            return Err(Error::NotFound { path }.into());
        }
        Ok(path)
    }

    /// Output path for `name` under the year directory. Nothing is created.
    pub fn output_path(&self, year: i32, name: &str) -> PathBuf {
        self.results_dir
            .join(year.to_string())
            .join(format!("{name}.xlsx"))
    }
}

/// Create the directory `path` will be written into.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display())),
        None => Ok(()),
    }
}

/// Default workbook name: `<bank>-<month>`, or `<bank>-<input stem>`.
pub fn output_name(bank: &str, month: Option<&str>, input: &Path) -> String {
    let suffix = month
        .map(|m| m.trim().to_string())
        .or_else(|| input.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "statement".to_string());
    format!("{bank}-{suffix}")
}
