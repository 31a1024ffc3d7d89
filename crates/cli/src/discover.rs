use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Find every Python source file under the test root (.gitignore aware)
pub fn python_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Test root is not a directory: {}", root.display());
    }

    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true);

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let Some(file_type) = entry.file_type() else {
                    continue;
                };
                if !file_type.is_file() {
                    continue;
                }
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) == Some("py") {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }

    files.sort();
    log::info!(
        "Found {} test source files under {}",
        files.len(),
        root.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_nested_python_files_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pool")).unwrap();
        fs::write(root.join("pool/create.py"), "").unwrap();
        fs::write(root.join("aggregation.py"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = python_files(root).unwrap();
        assert_eq!(
            files,
            vec![root.join("aggregation.py"), root.join("pool/create.py")]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(python_files(&temp.path().join("gone")).is_err());
    }
}
