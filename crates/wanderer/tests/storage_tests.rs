//! Host state persisted across kernel restarts

use pretty_assertions::assert_eq;
use wanderer::{ComputerStatus, JsonFileStorage, Kernel, Shell};

fn boot(path: &std::path::Path) -> Kernel {
    let storage = JsonFileStorage::open(path).unwrap();
    let mut kernel = Kernel::builder()
        .storage(Box::new(storage))
        .build()
        .unwrap();
    kernel.boot().unwrap();
    kernel
}

#[test]
fn missing_file_starts_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let kernel = boot(&dir.path().join("state.json"));

    assert_eq!(kernel.env("PATH"), Some("/bin"));
    assert_eq!(kernel.env("HOME"), Some("/home/user"));
    assert_eq!(kernel.status(), ComputerStatus::On);
}

#[test]
fn exports_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut kernel = boot(&path);
        let mut shell = Shell::new(&kernel);
        shell.execute_line(&mut kernel, "export PATH=/bin:/opt").unwrap();
        kernel.shutdown().unwrap();
    }

    let kernel = boot(&path);
    assert_eq!(kernel.env("PATH"), Some("/bin:/opt"));
}

#[test]
fn shutdown_records_off_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut kernel = boot(&path);
    kernel.shutdown().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["computerStatus"], serde_json::json!(0));
    assert_eq!(value["envs"]["USER"], serde_json::json!("user"));
}

#[test]
fn filesystem_is_rebuilt_on_boot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut kernel = boot(&path);
    let mut shell = Shell::new(&kernel);
    shell.execute_line(&mut kernel, "touch scratch").unwrap();
    kernel.shutdown().unwrap();

    let kernel = boot(&path);
    let home = kernel
        .fs()
        .find_folder(&["home".to_string(), "user".to_string()])
        .unwrap();
    assert!(home.files.is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(JsonFileStorage::open(&path).is_err());
}
