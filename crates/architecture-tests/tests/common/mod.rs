//! Shared helpers for architecture tests.
//!
//! Sources are split into production code and test code so that rules about
//! secrets and key files are only enforced where they matter.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A Rust source file under `crates/`.
pub struct Source {
    /// Path relative to the workspace root, with `/` separators.
    pub relative: String,
    pub content: String,
}

impl Source {
    /// Whether the whole file is test code (`tests/` directories, `*_tests.rs`).
    pub fn is_test_file(&self) -> bool {
        self.relative.contains("/tests/") || self.relative.ends_with("_tests.rs")
    }

    /// The part of the file before its `#[cfg(test)]` module, or nothing for test files.
    pub fn production_code(&self) -> &str {
        if self.is_test_file() {
            return "";
        }
        match self.content.find("#[cfg(test)]") {
            Some(end) => &self.content[..end],
            None => &self.content,
        }
    }

    /// 1-based line numbers of production lines containing `needle`.
    pub fn production_lines_with(&self, needle: &str) -> Vec<usize> {
        self.production_code()
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim_start().starts_with("//") && line.contains(needle))
            .map(|(index, _)| index + 1)
            .collect()
    }
}

/// Find the workspace root by looking for Cargo.toml with [workspace].
pub fn find_workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let mut dir = manifest_dir.as_path();
    loop {
        if let Ok(content) = std::fs::read_to_string(dir.join("Cargo.toml"))
            && content.contains("[workspace]")
        {
            return dir.to_path_buf();
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => return manifest_dir,
        }
    }
}

/// Every `.rs` file under `crates/<name>/`, skipping build output.
pub fn crate_sources(name: &str) -> Vec<Source> {
    let root = find_workspace_root();
    let crate_dir = root.join("crates").join(name);
    assert!(crate_dir.exists(), "crate not found at {}", crate_dir.display());

    walkdir::WalkDir::new(&crate_dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .filter_map(|e| {
            let content = std::fs::read_to_string(e.path()).ok()?;
            Some(Source {
                relative: relative_path(&root, e.path()),
                content,
            })
        })
        .collect()
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
