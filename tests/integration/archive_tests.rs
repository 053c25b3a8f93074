use classdupe::duplicates::ClasspathIndex;
use classdupe::scanner::{ClasspathEntry, EntryIndexer, EntryKind, PathFilter};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::write::FileOptions;

fn write_zip(path: &Path, entries: &[&str]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for name in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, FileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
        }
    }
    writer.finish().unwrap();
}

#[test]
fn test_zip_and_uppercase_jar_are_archives() {
    let dir = tempdir().unwrap();
    let zip = dir.path().join("bundle.zip");
    let upper = dir.path().join("LEGACY.JAR");
    write_zip(&zip, &["a/A.class"]);
    write_zip(&upper, &["a/A.class"]);

    let filter = PathFilter::with_defaults();
    let indexer = EntryIndexer::new(&filter);
    assert_eq!(indexer.index(&ClasspathEntry::new(&zip)).unwrap().kind, EntryKind::Archive);
    assert_eq!(indexer.index(&ClasspathEntry::new(&upper)).unwrap().kind, EntryKind::Archive);
}

#[test]
fn test_archive_directory_records_not_indexed() {
    let dir = tempdir().unwrap();
    let jar = dir.path().join("dirs-1.0.jar");
    write_zip(&jar, &["com/", "com/x/", "com/x/Foo.class"]);

    let filter = PathFilter::with_defaults();
    let indexed = EntryIndexer::new(&filter).index(&ClasspathEntry::new(&jar)).unwrap();
    assert_eq!(indexed.files, vec!["com/x/Foo.class"]);
}

#[test]
fn test_module_and_package_info_ignored() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("one-1.0.jar");
    let second = dir.path().join("two-1.0.jar");
    let shared = ["module-info.class", "com/x/package-info.class", "META-INF/versions/9/X.class"];
    write_zip(&first, &shared);
    write_zip(&second, &shared);

    let index = ClasspathIndex::build(
        &[ClasspathEntry::new(&first), ClasspathEntry::new(&second)],
        &PathFilter::with_defaults(),
    )
    .unwrap();

    assert!(index.is_empty());
    assert_eq!(index.collisions().count(), 0);
}

#[test]
fn test_nested_module_info_is_not_ignored() {
    // Only the top-level module descriptor is excluded.
    let dir = tempdir().unwrap();
    let jar = dir.path().join("shaded-1.0.jar");
    write_zip(&jar, &["shaded/module-info.class"]);

    let filter = PathFilter::with_defaults();
    let indexed = EntryIndexer::new(&filter).index(&ClasspathEntry::new(&jar)).unwrap();
    assert_eq!(indexed.files, vec!["shaded/module-info.class"]);
}

#[test]
fn test_custom_rules_replace_defaults() {
    let dir = tempdir().unwrap();
    let classes = dir.path().join("classes");
    for rel in ["gen/Stub.class", "META-INF/X.class", "app/App.class"] {
        let path = classes.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"\xCA\xFE\xBA\xBE").unwrap();
    }

    let filter = PathFilter::new(["^gen/.*"].as_slice(), ["exe"].as_slice()).unwrap();
    let indexed = EntryIndexer::new(&filter).index(&ClasspathEntry::new(&classes)).unwrap();
    assert_eq!(indexed.files, vec!["META-INF/X.class", "app/App.class"]);
}

#[test]
fn test_same_archive_listed_twice_is_not_a_conflict() {
    let dir = tempdir().unwrap();
    let jar = dir.path().join("lib-1.0.jar");
    write_zip(&jar, &["a/A.class"]);

    let index = ClasspathIndex::build(
        &[ClasspathEntry::new(&jar), ClasspathEntry::new(&jar)],
        &PathFilter::with_defaults(),
    )
    .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.collisions().count(), 0);
}

#[test]
fn test_skipped_entries_do_not_abort() {
    let dir = tempdir().unwrap();
    let jar = dir.path().join("lib-1.0.jar");
    write_zip(&jar, &["a/A.class"]);
    let native = dir.path().join("libjni.so");
    fs::write(&native, b"\x7fELF").unwrap();
    let archive = dir.path().join("dist.tar");
    fs::write(&archive, b"ustar").unwrap();

    let index = ClasspathIndex::build(
        &[
            ClasspathEntry::new(dir.path().join("missing-1.0.jar")),
            ClasspathEntry::new(&native),
            ClasspathEntry::new(&archive),
            ClasspathEntry::new(&jar),
        ],
        &PathFilter::with_defaults(),
    )
    .unwrap();

    let stats = index.stats();
    assert_eq!(stats.entries, 4);
    assert_eq!(stats.archives, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.unrecognized, 1);
    assert_eq!(index.len(), 1);
}
