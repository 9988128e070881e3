//! Exit status and messages of the installed binaries.

use std::process::Command;

use ensemble_plots::cli::MISSING_CONFIG_MESSAGE;
use test_utils::temp_test_dir;

// ============================================================================
// Missing arguments
// ============================================================================

#[test]
fn test_plot_salinity_without_config_exits_1() {
    let output = Command::new(env!("CARGO_BIN_EXE_plot-salinity"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ERROR] -- Config file not provided!"), "stdout: {}", stdout);
    assert_eq!(stdout.trim(), MISSING_CONFIG_MESSAGE);
}

#[test]
fn test_plot_postage_ssh_without_config_exits_1() {
    let output = Command::new(env!("CARGO_BIN_EXE_plot-postage-ssh"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), MISSING_CONFIG_MESSAGE);
}

// ============================================================================
// Other failures
// ============================================================================

#[test]
fn test_unreadable_config_exits_1() {
    let dir = temp_test_dir();
    let output = Command::new(env!("CARGO_BIN_EXE_plot-salinity"))
        .arg(dir.path().join("absent.ini"))
        .arg("20210101")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_day_index_exits_1() {
    let output = Command::new(env!("CARGO_BIN_EXE_plot-salinity"))
        .args(["config.ini", "20210101", "first"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
