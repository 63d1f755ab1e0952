use std::path::{Path, PathBuf};
use std::process::Command;

const BUILD_ID_VAR: &str = "KASBOEK_BUILD_SHA";

fn main() {
    let workspace = workspace_root();
    let git_dir = workspace.join(".git");

    println!("cargo:rerun-if-env-changed={BUILD_ID_VAR}");
    if git_dir.exists() {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
    }

    // Release packaging sets the id explicitly; otherwise ask git.
    let id = std::env::var(BUILD_ID_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| describe(&workspace))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={BUILD_ID_VAR}={id}");
}

fn workspace_root() -> PathBuf {
    std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(".."))
}

/// `git describe --always --dirty`, e.g. `v0.1.0-3-g1a2b3c4-dirty` or `1a2b3c4`.
fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let id = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!id.is_empty()).then_some(id)
}
