use classdupe::cli::{Cli, Commands};
use classdupe::config::{Config, ConfigError};
use classdupe::duplicates::{ClasspathPhase, DuplicateCheck, Verdict};
use clap::Parser;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::write::FileOptions;

fn jar(path: &Path, files: &[&str]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for file in files {
        writer.start_file(*file, FileOptions::default()).unwrap();
        writer.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_config_file_accepts_duplicates() {
    let dir = tempdir().unwrap();
    let mongo = dir.path().join("mongodb-driver-3.6.1.jar");
    let fongo = dir.path().join("fongo-2.2.0-RC2.jar");
    jar(&mongo, &["com/mongodb/Mongo.class"]);
    jar(&fongo, &["com/mongodb/Mongo.class"]);

    let config_path = dir.path().join("classdupe.toml");
    fs::write(
        &config_path,
        "accepted_duplicates = [[\"mongodb-driver-3.6.1\", \"fongo-2.2.0-RC2\"]]\n",
    )
    .unwrap();

    let check_config = Config::load(Some(config_path.as_path()))
        .unwrap()
        .validate()
        .unwrap();
    let outcome = DuplicateCheck::new(check_config)
        .run(&[ClasspathPhase::new("test", [mongo, fongo])])
        .unwrap();

    assert_eq!(outcome.verdict, Verdict::Pass);
}

#[test]
fn test_config_file_replaces_ignore_rules() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a-1.0.jar");
    let second = dir.path().join("b-1.0.jar");
    jar(&first, &["module-info.class"]);
    jar(&second, &["module-info.class"]);

    let config_path = dir.path().join("strict.toml");
    fs::write(&config_path, "ignored_files = []\n").unwrap();

    let check_config = Config::load(Some(config_path.as_path()))
        .unwrap()
        .validate()
        .unwrap();
    let outcome = DuplicateCheck::new(check_config)
        .run(&[ClasspathPhase::new("main", [first, second])])
        .unwrap();

    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.phases[0].conflicts[0].path, "module-info.class");
}

#[test]
fn test_cli_flags_extend_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("classdupe.toml");
    fs::write(&config_path, "accepted_duplicates = [[\"a\", \"b\"]]\n").unwrap();
    let config_arg = config_path.to_string_lossy().into_owned();

    let cli = Cli::try_parse_from([
        "classdupe",
        "check",
        "--config",
        config_arg.as_str(),
        "--accept",
        "c,d",
        "--ignore-failures",
    ])
    .unwrap();
    let Commands::Check(args) = cli.command else {
        panic!("Expected Check command");
    };

    let mut config = Config::load(args.config.as_deref()).unwrap();
    config.merge_check_args(&args);

    assert_eq!(config.accepted_duplicates.len(), 2);
    let check_config = config.validate().unwrap();
    assert_eq!(check_config.accepted.len(), 2);
    assert!(check_config.ignore_failures);
}

#[test]
fn test_invalid_pattern_names_pattern() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("classdupe.toml");
    fs::write(&config_path, "ignored_files = [\"[a-\"]\n").unwrap();

    let err = Config::load(Some(config_path.as_path()))
        .unwrap()
        .validate()
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidPattern(_)));
    assert!(err.to_string().contains("[a-"));
}

#[test]
fn test_effective_config_round_trips_through_toml() {
    let config = Config {
        accepted_duplicates: vec![vec!["x-1.0".to_string(), "y-1.0".to_string()]],
        ignore_failures: true,
        ..Config::default()
    };
    let text = config.to_toml().unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
