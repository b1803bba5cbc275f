use clean_node_modules::{CleanError, CleanOptions, Cleaner, Remover, RetryPolicy};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn fast_options() -> CleanOptions {
    CleanOptions {
        retry: RetryPolicy::new(3, Duration::ZERO),
        ..CleanOptions::default()
    }
}

fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Remembers every path it was asked to remove.
#[derive(Default)]
struct RecordingRemover {
    calls: RefCell<Vec<PathBuf>>,
}

impl Remover for RecordingRemover {
    fn remove_all(&self, path: &Path) -> io::Result<()> {
        self.calls.borrow_mut().push(path.to_path_buf());
        fs::remove_dir_all(path)
    }
}

#[test]
fn test_removes_node_modules_and_keeps_sources() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("proj/node_modules/pkg/file.js"), b"module.exports = 1;");
    write_file(&root.join("proj/src/index.js"), b"require('pkg');");

    let report = Cleaner::new(fast_options()).run(root).unwrap();

    assert!(!root.join("proj/node_modules").exists());
    assert!(root.join("proj/src/index.js").exists());
    assert_eq!(report.removed, vec![root.join("proj/node_modules")]);
    assert!(!report.has_failures());
}

#[test]
fn test_nested_node_modules_is_not_a_separate_match() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("a/node_modules/node_modules/dep/index.js"), b"");

    let cleaner = Cleaner::with_remover(fast_options(), RecordingRemover::default());
    let report = cleaner.run(root).unwrap();

    assert_eq!(report.removed, vec![root.join("a/node_modules")]);
    assert_eq!(
        *cleaner.remover().calls.borrow(),
        vec![root.join("a/node_modules")]
    );
    assert!(!root.join("a").join("node_modules").exists());
    assert!(root.join("a").exists());
}

#[test]
fn test_every_target_in_tree_is_removed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let targets = [
        root.join("node_modules"),
        root.join("apps/web/node_modules"),
        root.join("apps/api/node_modules"),
        root.join("packages/ui/deep/nested/node_modules"),
    ];
    for target in &targets {
        write_file(&target.join("lodash/index.js"), b"");
    }
    write_file(&root.join("apps/web/package.json"), b"{}");
    write_file(&root.join("packages/ui/node_modules.txt"), b"not a directory");

    let mut report = Cleaner::new(fast_options()).run(root).unwrap();
    report.removed.sort();

    let mut expected = targets.to_vec();
    expected.sort();
    assert_eq!(report.removed, expected);
    for target in &targets {
        assert!(!target.exists(), "{} still exists", target.display());
    }
    assert!(root.join("apps/web/package.json").exists());
    assert!(root.join("packages/ui/node_modules.txt").exists());
}

#[test]
fn test_file_named_node_modules_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("proj/node_modules"), b"just a file");

    let report = Cleaner::new(fast_options()).run(root).unwrap();

    assert!(report.is_empty());
    assert!(root.join("proj/node_modules").is_file());
}

#[test]
fn test_empty_tree_is_a_clean_run() {
    let temp_dir = TempDir::new().unwrap();

    let report = Cleaner::new(fast_options()).run(temp_dir.path()).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.display_status(), "Directories removed: 0");
}

#[test]
fn test_missing_root_returns_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("gone");

    let cleaner = Cleaner::with_remover(fast_options(), RecordingRemover::default());
    let result = cleaner.run(&missing);

    match result {
        Err(CleanError::RootUnavailable { path, source }) => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected RootUnavailable, got {:?}", other),
    }
    assert!(cleaner.remover().calls.borrow().is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let locked = root.join("locked");
    write_file(&locked.join("node_modules/pkg.js"), b"");
    write_file(&root.join("open/node_modules/pkg.js"), b"");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root bypasses permission bits.
    let readable = fs::read_dir(&locked).is_ok();

    let result = Cleaner::new(fast_options()).run(root);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = result.unwrap();

    assert!(!root.join("open/node_modules").exists());
    if !readable {
        assert_eq!(report.skipped, vec![locked.clone()]);
        assert!(locked.join("node_modules").exists());
    }
}
