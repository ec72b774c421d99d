use copycure::actions::{DeleteError, DeletionMode, DeletionPolicy, Disposition};
use copycure::config::ScanOptions;
use copycure::error::CopyCureError;
use copycure::index::IndexMode;
use copycure::scan;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Options for scanning `root` with the durable store kept outside the tree.
fn options(root: &Path, store: &TempDir, mode: IndexMode) -> ScanOptions {
    ScanOptions {
        root: root.to_path_buf(),
        exclude: Vec::new(),
        delete_empty: false,
        no_confirm: true,
        list_only: false,
        mode,
        database: store.path().join("copycure.db"),
    }
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// a.txt = b.txt = "hello", c.txt = "world"
fn hello_tree() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello");
    write(dir.path(), "b.txt", "hello");
    write(dir.path(), "c.txt", "world");
    dir
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_no_confirm_removes_one_copy() {
    let dir = hello_tree();
    let store = tempdir().unwrap();
    let mut opts = options(dir.path(), &store, IndexMode::Sql);
    opts.delete_empty = true;

    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.files_deleted, 1);
    assert_eq!(summary.report(), "1 duplicates found, 1 files were removed.");

    // Which copy survives depends on enumeration order
    let a = dir.path().join("a.txt").exists();
    let b = dir.path().join("b.txt").exists();
    assert!(a ^ b, "exactly one of a.txt/b.txt must survive");
    assert!(dir.path().join("c.txt").exists());
}

#[test]
fn test_small_files_ignored_by_default() {
    let dir = hello_tree();
    let store = tempdir().unwrap();
    let opts = options(dir.path(), &store, IndexMode::Sql);

    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    assert_eq!(summary.files_seen, 0);
    assert_eq!(summary.duplicates_found, 0);
    assert_eq!(file_names(dir.path()), vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn test_empty_files_flagged_only_with_delete_empty() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", "");
    write(dir.path(), "empty2", "");
    write(dir.path(), "ten1", "0123456789");
    write(dir.path(), "ten2", "0123456789");
    let store = tempdir().unwrap();

    let mut opts = options(dir.path(), &store, IndexMode::Mem);
    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();
    assert_eq!(summary.duplicates_found, 0);
    assert_eq!(file_names(dir.path()).len(), 4);

    opts.delete_empty = true;
    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();
    assert_eq!(summary.duplicates_found, 2);
    assert_eq!(summary.files_deleted, 2);
    assert_eq!(file_names(dir.path()).len(), 2);
}

#[test]
fn test_list_only_leaves_tree_unchanged() {
    let dir = hello_tree();
    let store = tempdir().unwrap();
    let mut opts = options(dir.path(), &store, IndexMode::Sql);
    opts.delete_empty = true;
    opts.list_only = true;

    let mut listing = Vec::new();
    let policy = DeletionPolicy::new(opts.deletion_mode()).with_listing(&mut listing);
    let summary = scan(&opts, policy, None).unwrap();

    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.files_deleted, 0);
    assert_eq!(file_names(dir.path()), vec!["a.txt", "b.txt", "c.txt"]);

    let listed = String::from_utf8(listing).unwrap();
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("a.txt") || lines[0].ends_with("b.txt"));
    assert_eq!(PathBuf::from(lines[0]), summary.duplicates[0].path);
}

#[test]
fn test_excluded_path_is_never_flagged() {
    let dir = hello_tree();
    let store = tempdir().unwrap();
    let mut opts = options(dir.path(), &store, IndexMode::Sql);
    opts.delete_empty = true;
    opts.exclude = vec!["b.txt".to_string()];

    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    assert_eq!(summary.duplicates_found, 0);
    assert_eq!(summary.files_seen, 2);
    assert_eq!(file_names(dir.path()), vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn test_excluded_directory_contents_untouched() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/original.bin", "shared content across dirs");
    write(dir.path(), ".git/objects/copy.bin", "shared content across dirs");
    write(dir.path(), "venv/lib/copy.bin", "shared content across dirs");
    let store = tempdir().unwrap();

    let mut opts = options(dir.path(), &store, IndexMode::Mem);
    opts.exclude = vec![".git/".to_string(), "venv/".to_string()];
    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    assert_eq!(summary.duplicates_found, 0);
    assert!(dir.path().join(".git/objects/copy.bin").exists());
    assert!(dir.path().join("venv/lib/copy.bin").exists());
}

#[test]
fn test_second_run_finds_nothing() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(dir.path(), &format!("copy{i}.dat"), "identical payload bytes");
    }
    write(dir.path(), "nested/deeper/copy.dat", "identical payload bytes");
    write(dir.path(), "unique.dat", "something else entirely");
    let store = tempdir().unwrap();
    let opts = options(dir.path(), &store, IndexMode::Sql);

    let first = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();
    assert_eq!(first.duplicates_found, 5);
    assert_eq!(first.files_deleted, 5);

    let second = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();
    assert_eq!(second.duplicates_found, 0);
    assert_eq!(second.files_seen, 2);
}

#[test]
fn test_sql_and_mem_agree() {
    let store = tempdir().unwrap();
    let mut counts = Vec::new();
    for mode in [IndexMode::Sql, IndexMode::Mem] {
        let dir = tempdir().unwrap();
        write(dir.path(), "one/a.log", "line one\nline two\n");
        write(dir.path(), "two/a.log", "line one\nline two\n");
        write(dir.path(), "three/a.log", "line one\nline two\n");
        write(dir.path(), "three/b.log", "a different log file");

        let opts = options(dir.path(), &store, mode);
        let mut listing = Vec::new();
        let policy = DeletionPolicy::new(DeletionMode::ListOnly).with_listing(&mut listing);
        let summary = scan(&opts, policy, None).unwrap();
        counts.push((summary.files_seen, summary.duplicates_found));
    }
    assert_eq!(counts, vec![(4, 2), (4, 2)]);
}

#[test]
fn test_sql_records_original_path() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/report.pdf", "pretend this is a pdf");
    write(dir.path(), "y/report.pdf", "pretend this is a pdf");
    let store = tempdir().unwrap();
    let opts = options(dir.path(), &store, IndexMode::Sql);

    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    let record = &summary.duplicates[0];
    assert!(matches!(record.disposition, Disposition::Deleted));
    let original = record.original.as_ref().expect("sql index records the original");
    assert!(original.exists());
    assert!(!record.path.exists());
}

#[test]
fn test_missing_root_is_a_scan_error() {
    let dir = tempdir().unwrap();
    let store = tempdir().unwrap();
    let opts = options(&dir.path().join("nope"), &store, IndexMode::Mem);

    let err = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap_err();
    assert!(matches!(err, CopyCureError::Scan(_)));
}

#[test]
fn test_unwritable_store_is_an_init_error() {
    let dir = hello_tree();
    let store = tempdir().unwrap();
    let mut opts = options(dir.path(), &store, IndexMode::Sql);
    opts.database = store.path().join("missing/dir/copycure.db");

    let err = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap_err();
    assert!(matches!(err, CopyCureError::IndexInit(_)));
    assert!(err.to_string().starts_with("Error initializing database: "));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_counted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello duplicate world");
    write(dir.path(), "b.txt", "hello duplicate world");
    // The link's own size is its target's length, so it passes the size filter
    std::os::unix::fs::symlink(
        dir.path().join("target-that-does-not-exist.bin"),
        dir.path().join("dangling"),
    )
    .unwrap();
    let store = tempdir().unwrap();
    let opts = options(dir.path(), &store, IndexMode::Sql);

    let summary = scan(&opts, DeletionPolicy::new(DeletionMode::NoConfirm), None).unwrap();

    assert_eq!(summary.files_seen, 3);
    assert_eq!(summary.checksum_failures, 1);
    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.files_deleted, 1);
    assert!(dir.path().join("dangling").symlink_metadata().is_ok());
}

#[test]
fn test_failed_deletion_is_not_counted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello duplicate world");
    write(dir.path(), "b.txt", "hello duplicate world");
    let store = tempdir().unwrap();
    let mut opts = options(dir.path(), &store, IndexMode::Mem);
    opts.no_confirm = false;

    // Something else removes the file while the operator is being asked
    let policy = DeletionPolicy::new(opts.deletion_mode()).with_confirm(|p: &Path| {
        fs::remove_file(p).unwrap();
        true
    });
    let summary = scan(&opts, policy, None).unwrap();

    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.files_deleted, 0);
    assert!(matches!(
        summary.duplicates[0].disposition,
        Disposition::Failed(DeleteError::NotFound(_))
    ));
    assert!(!summary.duplicates[0].disposition.is_deleted());
}
