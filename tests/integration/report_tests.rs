use classdupe::duplicates::{CheckConfig, ClasspathPhase, DuplicateCheck};
use classdupe::output::ReportBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn class_dir(root: &Path, name: &str, classes: &[&str]) -> PathBuf {
    let dir = root.join(name);
    for class in classes {
        let path = dir.join(class);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"\xCA\xFE\xBA\xBE").unwrap();
    }
    dir
}

#[test]
fn test_group_view_reports_each_entry_set_once() {
    let dir = tempdir().unwrap();
    let shared = ["p/A.class", "p/B.class", "p/C.class"];
    let a = class_dir(dir.path(), "a", &shared);
    let b = class_dir(dir.path(), "b", &shared);

    let outcome = DuplicateCheck::new(CheckConfig::default())
        .run(&[ClasspathPhase::new("main", [a.clone(), b.clone()])])
        .unwrap();

    let expected = format!(
        "There are conflicting files in the following phases (run with --verbose for details):\n\nmain\n    {}, {}",
        a.display(),
        b.display()
    );
    assert_eq!(outcome.message.unwrap(), expected);
}

#[test]
fn test_entry_view_lists_all_shared_paths() {
    let dir = tempdir().unwrap();
    let a = class_dir(dir.path(), "a", &["p/A.class", "p/B.class"]);
    let b = class_dir(dir.path(), "b", &["p/B.class"]);
    let c = class_dir(dir.path(), "c", &["p/A.class"]);

    let outcome = DuplicateCheck::new(CheckConfig::default())
        .run(&[ClasspathPhase::new("main", [a.clone(), b, c])])
        .unwrap();
    let text = ReportBuilder::new(&outcome.phases[0].conflicts).render_by_entry();

    let header = format!("    Found duplicate classes in {}:", a.display());
    let section: Vec<&str> = text
        .lines()
        .skip_while(|line| *line != header)
        .take(3)
        .collect();
    assert_eq!(section[1], "        p/A.class");
    assert_eq!(section[2], "        p/B.class");
}

#[test]
fn test_report_is_idempotent_and_order_independent() {
    let dir = tempdir().unwrap();
    let a = class_dir(dir.path(), "a", &["X.class", "Y.class"]);
    let b = class_dir(dir.path(), "b", &["X.class"]);
    let c = class_dir(dir.path(), "c", &["Y.class", "X.class"]);

    let forward = [ClasspathPhase::new("main", [a.clone(), b.clone(), c.clone()])];
    let backward = [ClasspathPhase::new("main", [c, b, a])];

    let mut check = DuplicateCheck::new(CheckConfig::default());
    let first = check.run(&forward).unwrap().message;
    let second = check.run(&forward).unwrap().message;
    let reversed = check.run(&backward).unwrap().message;

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(first, reversed);
}
