use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ring_builder() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ring-builder"))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn run_script(temp: &TempDir, script: &str, extra_args: &[&str]) -> Output {
    let script_path = temp.path().join("session.ring");
    write_file(&script_path, script);

    ring_builder()
        .arg("session")
        .arg("--script")
        .arg(&script_path)
        .args(extra_args)
        .env_remove("RING_BUILDER_LOG")
        .output()
        .expect("ring-builder should run")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn last_json(output: &Output) -> Value {
    let lines = stdout_lines(output);
    let line = lines
        .iter()
        .rev()
        .find(|line| line.starts_with('{'))
        .expect("stdout should contain a JSON line");
    serde_json::from_str(line).expect("JSON line should parse")
}

#[test]
fn bounds_command_prints_radius_scaled_table() {
    let output = ring_builder()
        .args(["bounds", "--radius", "4"])
        .output()
        .expect("ring-builder should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let table: Value = serde_json::from_slice(&output.stdout).expect("bounds JSON");
    let magnet = &table["entries"]["Scaling FFA magnet"];
    assert_eq!(magnet.as_array().map(Vec::len), Some(7));
    assert_eq!(magnet[2]["upper"], 1.0);
    assert_eq!(magnet[4]["upper"], 0.1);
    assert_eq!(table["radius"], 4.0);
}

#[test]
fn bounds_command_honours_fixed_variant_from_config() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config_path = temp.path().join("config.json");
    write_file(&config_path, r#"{ "bounds": { "variant": "fixed" } }"#);

    let output = ring_builder()
        .args(["bounds", "--radius", "4", "--ring-space", "2", "--config"])
        .arg(&config_path)
        .output()
        .expect("ring-builder should run");

    assert!(output.status.success());
    let table: Value = serde_json::from_slice(&output.stdout).expect("bounds JSON");
    assert_eq!(table["entries"]["RF more"][1]["upper"], 5.0);
    assert_eq!(table["entries"]["Drift"][0]["upper"], std::f64::consts::PI);
}

#[test]
fn non_numeric_radius_exits_with_input_validation_code() {
    let output = ring_builder()
        .args(["bounds", "--radius", "wide"])
        .output()
        .expect("ring-builder should run");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("ERROR: [INPUT.NOT_NUMERIC] 'wide' must be numerical"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = ring_builder()
        .arg("launch")
        .output()
        .expect("ring-builder should run");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("INPUT.CLI_USAGE"));
}

#[test]
fn drift_add_and_delete_restores_ring_space() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_script(
        &temp,
        "# radius five ring\nradius 5\nskip\nadd drift 1.0\nlog\ndelete\nstatus\n",
        &[],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"Drift, angle: 1.0".to_string()));
    assert!(lines.contains(&"removed: Drift, angle: 1.0".to_string()));

    let status = last_json(&output);
    assert_eq!(status["phase"], "building_ring");
    assert_eq!(status["elements"], 0);
    let ring_space = status["ring_space"].as_f64().expect("ring space is a number");
    assert!((ring_space - std::f64::consts::TAU * 5.0).abs() < 1e-12);
}

#[test]
fn cell_replay_is_logged_as_one_entry() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_script(
        &temp,
        "radius 5\ncell\nadd drift 0.2\nadd multipole 1 0.1 0.1 1 | 0.5\nfinalize\nadd cell\nreplay\nlog\nstatus\n",
        &[],
    );

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.iter().filter(|line| line.as_str() == "Cell").count(), 2);

    let status = last_json(&output);
    assert_eq!(status["entries"], 2);
    assert_eq!(status["elements"], 4);
    assert_eq!(status["cell"]["finalized"], true);
    assert!(status["available"]
        .as_array()
        .expect("available kinds")
        .contains(&Value::from("cell")));
}

#[test]
fn failing_lines_are_reported_and_the_script_continues() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_script(
        &temp,
        "radius 5\nskip\ndelete\nadd drift abc\nadd drift 0.5\nstatus\n",
        &[],
    );

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 3: ERROR: [STATE.EMPTY] ring is already empty"));
    assert!(stderr.contains("line 4: ERROR: [INPUT.NOT_NUMERIC] 'abc' must be numerical"));
    assert_eq!(last_json(&output)["elements"], 1);
}

#[test]
fn fail_fast_stops_at_the_first_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_script(&temp, "skip\nradius 5\nstatus\n", &["--fail-fast"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("STATE.NO_RADIUS"));
    assert!(stdout_lines(&output).is_empty());
}

#[test]
fn run_without_engine_is_an_engine_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_script(
        &temp,
        "radius 5\nbeam proton 1.2 0 0 0 0 0 0\nskip\nadd drift 0.5\nrun\n",
        &[],
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ENGINE.NOT_CONFIGURED"));
}

#[cfg(unix)]
#[test]
fn run_lays_out_engine_output_and_skips_probes() {
    let temp = TempDir::new().expect("tempdir should be created");
    let engine_path = temp.path().join("engine.sh");
    write_file(
        &engine_path,
        r#"#!/bin/sh
cat > request.json
echo '[{"name":"LOCAL_CARTESIAN_OFFSET","start_position":[5.0,0.0,0.0],"end_position":[0.0,5.0,0.0]},{"name":"PROBE1","start_position":[0.0,5.0,0.0],"end_position":[0.0,5.0,0.0]}]'
"#,
    );

    let script_path = temp.path().join("session.ring");
    write_file(
        &script_path,
        "radius 5\nbeam muon 1.5 0 0 0 0 0 0\nskip\nadd drift 1.5707963267948966\nrun\n",
    );

    let output = ring_builder()
        .current_dir(temp.path())
        .args(["session", "--engine", "sh", "--engine-arg"])
        .arg(&engine_path)
        .arg("--script")
        .arg(&script_path)
        .output()
        .expect("ring-builder should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let run = last_json(&output);
    let regions = run["layout"]["regions"].as_array().expect("regions");
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0]["colour"], "blue");
    assert_eq!(run["placed"].as_array().map(Vec::len), Some(2));
    assert_eq!(run["layout"]["legend"][0], "---key---");

    let request: Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("request.json")).expect("engine saw the request"),
    )
    .expect("request is JSON");
    assert_eq!(request["beam"]["species"], "MUON");
    assert_eq!(request["elements"][0]["type_name"], "LOCAL_CARTESIAN_OFFSET");
}
