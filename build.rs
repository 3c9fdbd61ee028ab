use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const HASH_VAR: &str = "BLURMASK_GIT_HASH";

fn main() {
    println!("cargo:rerun-if-env-changed={HASH_VAR}");

    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());

    // Source tarballs have no git metadata; packagers can pin the hash instead.
    let hash = env::var(HASH_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| git(&manifest_dir, &["describe", "--always", "--dirty", "--abbrev=7"]))
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env={HASH_VAR}={hash}");

    if let Some(git_dir) = git(&manifest_dir, &["rev-parse", "--absolute-git-dir"]) {
        let git_dir = PathBuf::from(git_dir);
        for watched in ["HEAD", "index", "refs", "packed-refs"] {
            rerun_if_exists(&git_dir.join(watched));
        }
    }
}

/// Runs git in `dir` and returns trimmed stdout, or `None` on any failure.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn rerun_if_exists(path: &Path) {
    if path.exists() {
        println!("cargo:rerun-if-changed={}", path.display());
    }
}
