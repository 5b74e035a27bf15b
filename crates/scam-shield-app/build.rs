use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let version_path = workspace_root().join("VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let raw = fs::read_to_string(&version_path).expect("VERSION file should be readable");
    let version = raw.trim();
    assert!(
        is_release_version(version),
        "VERSION must look like MAJOR.MINOR.PATCH, got {version:?}"
    );

    println!("cargo:rustc-env=SCAM_SHIELD_VERSION={version}");
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .expect("crate should live under <root>/crates/")
}

fn is_release_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}
