use std::path::{Path, PathBuf};

/// Absolute paths pass through; relative ones are taken from `working_directory`.
pub fn resolve_file(path: impl AsRef<Path>, working_directory: Option<&Path>) -> PathBuf {
    let path = path.as_ref();
    match working_directory {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path.to_path_buf(),
    }
}
