use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nbody_simulation_brute"))
        .args(args)
        .output()
        .expect("failed to launch binary")
}

fn assert_usage_error(args: &[&str]) {
    let out = run_cli(args);
    assert_eq!(out.status.code(), Some(1), "args {:?}", args);
    assert!(out.stdout.is_empty(), "args {:?} wrote to stdout", args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "no usage message for {:?}: {}", args, stderr);
}

#[test]
fn missing_count_is_usage_error() {
    assert_usage_error(&[]);
}

#[test]
fn zero_count_is_usage_error() {
    assert_usage_error(&["0"]);
}

#[test]
fn non_numeric_count_is_usage_error() {
    assert_usage_error(&["lots"]);
    assert_usage_error(&["-3"]);
}

#[test]
fn prints_elapsed_time() {
    let out = run_cli(&["4", "--workers", "2", "--seed", "9"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let line = stdout.trim();
    let secs = line
        .strip_prefix("Elapsed time: ")
        .and_then(|s| s.strip_suffix(" seconds"))
        .unwrap_or_else(|| panic!("unexpected output {:?}", line));
    let (_, decimals) = secs.split_once('.').expect("no decimal point");
    assert_eq!(decimals.len(), 6);
    assert!(secs.parse::<f64>().unwrap() >= 0.0);
}

#[test]
fn threads_backend_from_cli() {
    let out = run_cli(&["3", "--backend", "threads", "--strict-workers"]);
    assert!(out.status.success());
}
