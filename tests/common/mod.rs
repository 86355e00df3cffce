#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub use svcrun_test_utils::init_tracing;

/// Create `path` (and its parents) relative to `root`.
pub fn mkdir(root: &Path, path: &str) {
    fs::create_dir_all(root.join(path)).unwrap();
}

/// Write `contents` to `path` relative to `root`, creating parents.
pub fn write_file(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, contents).unwrap();
}
