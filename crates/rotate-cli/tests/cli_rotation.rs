//! End-to-end runs of the CLI over scratch directories

use std::fs;
use std::path::Path;

use clap::Parser;
use rotate_cli::{execute, Cli, CliError};
use rotate_planner::Outcome;
use tempfile::TempDir;

const WEEK: &[&str] = &[
    "2014-06-24",
    "2014-06-25",
    "2014-06-26",
    "2014-06-27",
    "2014-06-28",
    "2014-06-29",
    "2014-06-30",
];

fn populate(root: &Path) {
    for name in WEEK {
        fs::create_dir(root.join(name)).unwrap();
    }
    fs::write(root.join("notes.txt"), b"").unwrap();
}

fn survivors(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Parse arguments with an empty configuration file so host files are ignored
fn cli(config: &Path, args: &[&str]) -> Cli {
    let config = config.to_string_lossy().into_owned();
    let mut argv = vec!["rotate-backups".to_string(), "-c".to_string(), config];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

fn empty_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("rotate-backups.toml");
    fs::write(&path, "").unwrap();
    path
}

#[tokio::test]
async fn test_rotate_from_command_line() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    populate(root.path());

    let location = root.path().to_string_lossy().into_owned();
    let cli = cli(&empty_config(&scratch), &["--daily", "3", "--weekly", "1", &location]);
    let outcome = execute(&cli).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.metrics.removed, 4);
    assert_eq!(outcome.metrics.preserved, 3);
    assert_eq!(
        survivors(root.path()),
        vec!["2014-06-28", "2014-06-29", "2014-06-30", "notes.txt"]
    );
}

#[tokio::test]
async fn test_dry_run_removes_nothing() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    populate(root.path());

    let location = root.path().to_string_lossy().into_owned();
    let cli = cli(&empty_config(&scratch), &["-n", "-d", "1", "--format", "json", &location]);
    let outcome = execute(&cli).await.unwrap();

    assert!(outcome.is_success());
    assert!(outcome.reports[0].dry_run);
    assert_eq!(outcome.reports[0].removed_count(), 6);
    assert_eq!(survivors(root.path()).len(), WEEK.len() + 1);
}

#[tokio::test]
async fn test_rotate_configured_locations() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    fs::create_dir(root.path().join("laptop")).unwrap();
    fs::create_dir(root.path().join("server")).unwrap();
    populate(&root.path().join("laptop"));
    populate(&root.path().join("server"));

    let config = scratch.path().join("rotate-backups.toml");
    fs::write(
        &config,
        format!(
            "[locations.\"{}/*\"]\ndaily = \"2 - 1\"\nexclude = [\"2014-06-24\"]\n",
            root.path().display()
        ),
    )
    .unwrap();

    let outcome = execute(&cli(&config, &["-P"])).await.unwrap();
    assert_eq!(outcome.reports.len(), 2);
    assert!(outcome.is_success());

    for host in ["laptop", "server"] {
        assert_eq!(
            survivors(&root.path().join(host)),
            vec!["2014-06-24", "2014-06-30", "notes.txt"]
        );
    }
}

#[tokio::test]
async fn test_empty_scheme_touches_nothing() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    populate(root.path());

    let location = root.path().to_string_lossy().into_owned();
    let err = execute(&cli(&empty_config(&scratch), &[&location]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
    assert_eq!(survivors(root.path()).len(), WEEK.len() + 1);
}

#[tokio::test]
async fn test_invalid_config_file() {
    let scratch = TempDir::new().unwrap();
    let config = scratch.path().join("rotate-backups.toml");
    fs::write(&config, "[locations.\"/srv\"]\ndaily = [1, 2]\n").unwrap();

    let err = execute(&cli(&config, &[])).await.unwrap_err();
    assert!(matches!(err, CliError::Toml(_)));
}

#[tokio::test]
async fn test_missing_location_fails_the_run() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    populate(root.path());

    let present = root.path().to_string_lossy().into_owned();
    let missing = root.path().join("missing").to_string_lossy().into_owned();
    let outcome = execute(&cli(&empty_config(&scratch), &["-d", "7", &missing, &present]))
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.reports[0].outcome, Outcome::Aborted);
    assert_eq!(outcome.reports[1].outcome, Outcome::Completed);
    assert_eq!(outcome.metrics.aborted_locations, 1);
}
