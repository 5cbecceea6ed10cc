//! Data directory resolution.

use std::env;
use std::fs;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "MILBASE_DATA_DIR";

#[derive(thiserror::Error, Debug)]
pub enum PathError {
    #[error("could not determine a local data directory for this platform")]
    NoDataDir,
    #[error("failed to create {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Resolve the directory that holds the store.
///
/// Resolution order:
/// 1. `explicit` (the `--data-dir` flag)
/// 2. `MILBASE_DATA_DIR` environment variable
/// 3. `<platform data dir>/milbase`
///
/// The directory is created when missing.
pub fn data_root(explicit: Option<PathBuf>) -> Result<PathBuf, PathError> {
    let root = match explicit {
        Some(path) => path,
        None => match env::var_os(DATA_DIR_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::data_local_dir().ok_or(PathError::NoDataDir)?.join("milbase"),
        },
    };

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let want = tmp.path().join("nested").join("milbase");
        let got = data_root(Some(want.clone())).unwrap();
        assert_eq!(got, want);
        assert!(want.is_dir());
    }
}
