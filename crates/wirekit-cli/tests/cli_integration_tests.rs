//! Runs the `wirekit` binary against temporary source trees

#![allow(non_snake_case)]

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MODEL: &str = r#"
use wirekit::prelude::*;

#[wire_message]
#[derive(Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[wire_service(name = "Plotter")]
pub struct PlotService;
"#;

fn wirekit(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wirekit"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wirekit")
}

fn write_model(dir: &Path, source: &str) {
    std::fs::write(dir.join("model.rs"), source).unwrap();
}

#[test]
fn generate___writes_units_to_output_directory() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);

    let output = wirekit(temp.path(), &["generate", "-i", "model.rs", "-o", "gen"]);

    assert!(output.status.success(), "{output:?}");
    let point = std::fs::read_to_string(temp.path().join("gen/Point.g.rs")).unwrap();
    assert!(point.starts_with("// @generated"));
    assert!(temp.path().join("gen/Plotter.g.rs").is_file());
}

#[test]
fn generate___config_file___supplies_inputs_and_output() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);
    std::fs::write(
        temp.path().join("wirekit.toml"),
        "inputs = [\"model.rs\"]\nout_dir = \"out\"\nruntime_path = \"::wirekit_core\"\n",
    )
    .unwrap();

    let output = wirekit(temp.path(), &["generate"]);

    assert!(output.status.success(), "{output:?}");
    let point = std::fs::read_to_string(temp.path().join("out/Point.g.rs")).unwrap();
    assert!(point.contains(":: wirekit_core :: Message"));
}

#[test]
fn generate___without_output___fails() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);

    let output = wirekit(temp.path(), &["generate", "-i", "model.rs"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No output directory"));
}

#[test]
fn check___failing_message___exits_non_zero() {
    let temp = TempDir::new().unwrap();
    write_model(
        temp.path(),
        "#[wire_message] pub struct Pixel { pub red: u8 }\n#[wire_message] pub struct Ok { pub id: u64 }",
    );

    let output = wirekit(temp.path(), &["check", "-i", "model.rs"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ok       Ok.g"));
    assert!(stdout.contains("failed   Pixel.red"));
}

#[test]
fn check___clean_model___succeeds() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);

    let output = wirekit(temp.path(), &["check", "-i", "model.rs"]);

    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 ok, 0 skipped, 0 failed"));
}

#[test]
fn describe___json___prints_descriptor_array() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);

    let output = wirekit(temp.path(), &["describe", "-i", "model.rs", "--json"]);

    assert!(output.status.success(), "{output:?}");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["schema_name"], "Point");
    assert_eq!(json[0]["fields"][1]["name"], "y");
    assert_eq!(json[0]["fields"][1]["number"], 2);
}

#[test]
fn describe___text___prints_message_blocks() {
    let temp = TempDir::new().unwrap();
    write_model(temp.path(), MODEL);

    let output = wirekit(temp.path(), &["describe", "-i", "model.rs"]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "message Point {\n  int32 x = 1;\n  int32 y = 2;\n}\n"
    );
}

#[test]
fn no_inputs___fails_with_hint() {
    let temp = TempDir::new().unwrap();

    let output = wirekit(temp.path(), &["check"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input files"));
}
