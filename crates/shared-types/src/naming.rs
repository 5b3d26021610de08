//! File-name helpers for storage keys and received file names.

use std::path::{Path, PathBuf};

/// Makes a safe file name: keeps the final path component, then only
/// `A-Z a-z 0-9 - . _ @ #` and space, then trims.
///
/// Message ids such as `<abc@host>` become `abc@host`.
pub fn sanitize_file_name(name: &str) -> String {
    let last = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    last.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '@' | '#' | ' '))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Full path in `dir` for `file_name` that does not exist yet, adding `.1`,
/// `.2`, ... when needed. Only the final component of `file_name` is used.
pub fn unique_file_name(dir: &Path, file_name: &str) -> PathBuf {
    let base = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let mut candidate = dir.join(&base);
    let mut suffix = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{}.{}", base, suffix));
        suffix += 1;
    }
    candidate
}
