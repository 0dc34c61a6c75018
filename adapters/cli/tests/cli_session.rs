use std::{fs, process::Command};

fn nova_siege() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nova-siege"));
    let _ = command.env_remove("RUST_LOG").args(["--log-level", "warn"]);
    command
}

#[test]
fn short_session_prints_summary() {
    let output = nova_siege()
        .args(["--ticks", "240", "--seed", "7"])
        .output()
        .expect("failed to launch nova-siege");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("state: Playing"), "{stdout}");
    assert!(stdout.contains("wave: "), "{stdout}");
    assert!(stdout.contains("ticks: 240"), "{stdout}");
}

#[test]
fn same_seed_replays_identically() {
    let run = || {
        nova_siege()
            .args(["--ticks", "1500", "--seed", "99"])
            .output()
            .expect("failed to launch nova-siege")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_overrides_defaults() {
    let directory = std::env::temp_dir().join(format!("nova-siege-cli-{}", std::process::id()));
    fs::create_dir_all(&directory).expect("temp dir");
    let path = directory.join("session.toml");
    fs::write(&path, "tick_ms = 0\n").expect("write config");

    let output = nova_siege()
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to launch nova-siege");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid session configuration"), "{stderr}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = nova_siege()
        .args(["--config", "/nonexistent/nova-siege.toml"])
        .output()
        .expect("failed to launch nova-siege");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}
