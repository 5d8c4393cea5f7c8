use std::{path::PathBuf, process::Command};

fn level(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("levels")
        .join(name)
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_roguepilot"))
        .args(args)
        .output()
        .expect("failed to launch the roguepilot binary")
}

#[test]
fn arena_decision_attacks_adjacent_monster() {
    let arena = level("arena.toml");
    let tuning = level("tuning.toml");
    let output = run(&[
        arena.to_str().expect("utf-8 path"),
        "--config",
        tuning.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "action: attack 1 0\n");
}

#[test]
fn json_output_includes_requested_route() {
    let arena = level("arena.toml");
    let output = run(&[
        arena.to_str().expect("utf-8 path"),
        "--format",
        "json",
        "--route-to",
        "4,2",
    ]);

    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(report["action"]["Attack"]["dx"], 1);
    assert_eq!(report["route"][0]["x"], 3);
    assert_eq!(report["route"][0]["y"], 1);
}

#[test]
fn missing_level_file_fails() {
    let output = run(&["does-not-exist.toml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read level file"));
}
