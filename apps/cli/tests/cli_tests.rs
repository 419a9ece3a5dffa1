//! drone-cli 端到端测试
//!
//! 通过管道输入驱动 REPL；每个测试使用独立的临时配置文件。

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn drone_cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("drone-cli").unwrap();
    cmd.arg("--config").arg(config_dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_lists_controllers() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("local"))
        .stdout(predicate::str::contains("pose"))
        .stdout(predicate::str::contains("stream"));
}

#[test]
fn test_local_session() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["local", "--delay-ms", "0"])
        .write_stdin("forward\ntakeoff\nup\n\nstatus\nhover\nquit\nforward\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Simple Drone Controller initialized!"))
        .stdout(predicate::str::contains("Drone must be flying to move!"))
        .stdout(predicate::str::contains("Drone taking off..."))
        .stdout(predicate::str::contains("Moving up 1.0m"))
        .stdout(predicate::str::contains("  Position: (0.00, 0.00, 3.00)"))
        .stdout(predicate::str::contains("Unknown command: hover"))
        .stdout(predicate::str::ends_with("Exiting drone controller...\n"));
}

#[test]
fn test_local_end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["local", "--delay-ms", "0"])
        .write_stdin("takeoff\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Drone taking off..."));
}

#[test]
fn test_local_step_override() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["local", "--delay-ms", "0", "--step", "0.5"])
        .write_stdin("takeoff\nleft\nstatus\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Moving left 0.5m"))
        .stdout(predicate::str::contains("  Position: (-0.50, 0.00, 2.00)"));
}

#[test]
fn test_pose_over_memory_bus() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["pose", "--transport", "memory", "--delay-ms", "0"])
        .write_stdin("takeoff\nforward\nhover\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Drone Controller initialized!"))
        .stdout(predicate::str::contains("Moving drone to position: (0.00, 0.00, 3.00)"))
        .stdout(predicate::str::contains("Moving drone to position: (0.00, 1.00, 3.00)"))
        .stdout(predicate::str::contains("Hovering at current position"))
        .stdout(predicate::str::contains("Unknown command: status"));
}

#[test]
fn test_stream_bounded_count() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["stream", "--transport", "memory", "--rate", "200", "--count", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Streaming on /cmd_vel at 200 Hz"))
        .stdout(predicate::str::contains("Stream stopped after 3 message(s)"));
}

#[test]
fn test_stream_rejects_out_of_range_rate() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["stream", "--transport", "memory", "--rate", "1e-300", "--count", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid frequency_hz"));
}

#[test]
fn test_config_set_repairs_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[motion]\nstep = -1.0\n").unwrap();

    drone_cli(&dir)
        .args(["config", "set", "motion.step", "0.5"])
        .assert()
        .success();

    drone_cli(&dir)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("motion.step = 0.5"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    drone_cli(&dir)
        .args(["config", "set", "motion.step", "0.25"])
        .assert()
        .success();

    drone_cli(&dir)
        .args(["config", "get", "motion.step"])
        .assert()
        .success()
        .stdout("0.25\n");

    drone_cli(&dir)
        .args(["config", "set", "motion.step", "-3"])
        .assert()
        .failure();

    drone_cli(&dir)
        .args(["config", "get", "motion.step"])
        .assert()
        .success()
        .stdout("0.25\n");
}

#[test]
fn test_config_file_drives_local_controller() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[motion]\nstep = 2.0\ncommand_delay_ms = 0\n",
    )
    .unwrap();

    drone_cli(&dir)
        .arg("local")
        .write_stdin("takeoff\nright\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Moving right 2.0m"));
}
