use classdupe::duplicates::{
    AcceptedDuplicates, CheckConfig, CheckError, ClasspathPhase, DuplicateCheck, Verdict,
};
use classdupe::error::ExitCode;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use zip::write::FileOptions;

fn class_dir(root: &Path, name: &str, classes: &[&str]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for class in classes {
        let path = dir.join(class);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap().write_all(b"\xCA\xFE\xBA\xBE").unwrap();
    }
    dir
}

fn jar(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let path = root.join(name);
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    for file in files {
        writer.start_file(*file, FileOptions::default()).unwrap();
        writer.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
    }
    writer.finish().unwrap();
    path
}

#[test]
fn test_directories_sharing_a_class() {
    let dir = tempdir().unwrap();
    let a = class_dir(dir.path(), "dirA", &["com/x/Foo.class"]);
    let b = class_dir(dir.path(), "dirB", &["com/x/Foo.class"]);

    let outcome = DuplicateCheck::new(CheckConfig::default())
        .run(&[ClasspathPhase::new("main", [a.clone(), b.clone()])])
        .unwrap();

    let conflicts = &outcome.phases[0].conflicts;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, "com/x/Foo.class");
    let entries: Vec<_> = conflicts[0].entries.iter().cloned().collect();
    assert_eq!(
        entries,
        vec![a.to_string_lossy().into_owned(), b.to_string_lossy().into_owned()]
    );
    assert_eq!(outcome.verdict, Verdict::Fail);
}

#[test]
fn test_archives_manifest_ignored_by_default() {
    let dir = tempdir().unwrap();
    let first = jar(dir.path(), "lib-1.0.jar", &["META-INF/MANIFEST.MF", "a/B.class"]);
    let second = jar(dir.path(), "lib-2.0.jar", &["META-INF/MANIFEST.MF", "a/B.class"]);

    let outcome = DuplicateCheck::new(CheckConfig::default())
        .run(&[ClasspathPhase::new("main", [first, second])])
        .unwrap();

    let conflicts = &outcome.phases[0].conflicts;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, "a/B.class");
}

#[test]
fn test_accepted_group_suppresses_conflict() {
    let dir = tempdir().unwrap();
    let mongo = jar(dir.path(), "mongo-3.6.1.jar", &["Driver.class"]);
    let fongo = jar(dir.path(), "fongo-2.2.jar", &["Driver.class"]);

    let config = CheckConfig::default()
        .with_accepted(AcceptedDuplicates::new([["mongo-3.6.1", "fongo-2.2"]]));
    let outcome = DuplicateCheck::new(config)
        .run(&[ClasspathPhase::new("main", [mongo, fongo])])
        .unwrap();

    assert_eq!(outcome.verdict, Verdict::Pass);
    assert_eq!(outcome.conflict_count(), 0);
    assert_eq!(outcome.phases[0].summary.suppressed, 1);
    assert!(outcome.message.is_none());
}

#[test]
fn test_unreadable_archive_aborts_run() {
    let dir = tempdir().unwrap();
    let good = jar(dir.path(), "good-1.0.jar", &["a/A.class"]);
    let broken = dir.path().join("broken-1.0.jar");
    fs::write(&broken, b"PK\x03\x04 truncated").unwrap();

    let mut check = DuplicateCheck::new(CheckConfig::default());
    let err = check
        .run(&[ClasspathPhase::new("main", [good, broken])])
        .unwrap_err();

    match err {
        CheckError::Scan { phase, source } => {
            assert_eq!(phase, "main");
            assert!(source.to_string().contains("broken-1.0.jar"));
        }
        other => panic!("Expected Scan error, got {:?}", other),
    }
}

#[test]
fn test_ignore_failures_keeps_report() {
    let dir = tempdir().unwrap();
    let a = class_dir(dir.path(), "a", &["X.class"]);
    let b = class_dir(dir.path(), "b", &["X.class"]);
    let phases = [ClasspathPhase::new("test", [a, b])];

    let strict = DuplicateCheck::new(CheckConfig::default()).run(&phases).unwrap();
    let lenient = DuplicateCheck::new(CheckConfig::default().with_ignore_failures(true))
        .run(&phases)
        .unwrap();

    assert_eq!(ExitCode::from_verdict(strict.verdict), ExitCode::ConflictsFound);
    assert_eq!(ExitCode::from_verdict(lenient.verdict), ExitCode::Success);
    assert_eq!(strict.message, lenient.message);
}

#[test]
fn test_phases_checked_independently() {
    let dir = tempdir().unwrap();
    let main_classes = class_dir(dir.path(), "main", &["app/App.class"]);
    let test_classes = class_dir(dir.path(), "test", &["app/App.class"]);

    // The same class in main and test only collides where both are on the classpath.
    let phases = [
        ClasspathPhase::new("main", [main_classes.clone()]),
        ClasspathPhase::new("test", [main_classes, test_classes]),
    ];
    let outcome = DuplicateCheck::new(CheckConfig::default().with_threads(2))
        .run(&phases)
        .unwrap();

    assert_eq!(outcome.phases[0].name, "main");
    assert!(!outcome.phases[0].has_conflicts());
    assert_eq!(outcome.phases[1].name, "test");
    assert!(outcome.phases[1].has_conflicts());

    let message = outcome.message.unwrap();
    assert!(message.starts_with("There are conflicting files in the following phases"));
    assert!(message.contains("\n\ntest\n    "));
    assert!(!message.contains("\n\nmain\n"));
}

#[test]
fn test_mixed_directory_and_archive() {
    let dir = tempdir().unwrap();
    let classes = class_dir(dir.path(), "classes", &["com/x/Foo.class", "com/x/Own.class"]);
    let lib = jar(dir.path(), "x-1.0.jar", &["com/x/Foo.class", "com/x/Lib.class"]);

    let outcome = DuplicateCheck::new(CheckConfig::default())
        .run(&[ClasspathPhase::new("main", [classes, lib])])
        .unwrap();

    let summary = &outcome.phases[0].summary;
    assert_eq!(summary.directories, 1);
    assert_eq!(summary.archives, 1);
    assert_eq!(summary.indexed_files, 4);
    assert_eq!(outcome.conflict_count(), 1);
}
