use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// List files changed relative to a reference branch
///
/// Runs `git diff <reference> --name-only --relative` in the repository root
/// and joins the reported paths back onto it.
pub fn changed_files(repo_root: &Path, reference: &str) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .arg("diff")
        .arg(reference)
        .arg("--name-only")
        .arg("--relative")
        .output()
        .context("Failed to run git diff")?;

    if !output.status.success() {
        bail!(
            "git diff {} failed: {}",
            reference,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files: Vec<PathBuf> = stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| repo_root.join(line))
        .collect();

    log::info!(
        "{} files changed against {} in {}",
        files.len(),
        reference,
        repo_root.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(root: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(root)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn test_changed_files_lists_the_diff() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        git(root, &["init", "-q"]);
        git(root, &["config", "user.email", "tagscope@example.com"]);
        git(root, &["config", "user.name", "tagscope"]);
        fs::write(root.join("a.txt"), "one\n").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "init"]);
        fs::write(root.join("a.txt"), "two\n").unwrap();

        let files = changed_files(root, "HEAD").unwrap();
        assert_eq!(files, vec![root.join("a.txt")]);
    }

    #[test]
    fn test_unknown_reference_is_an_error() {
        let temp = TempDir::new().unwrap();
        git(temp.path(), &["init", "-q"]);

        assert!(changed_files(temp.path(), "no-such-ref").is_err());
    }
}
