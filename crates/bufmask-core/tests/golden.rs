use std::fs;
use std::path::{Path, PathBuf};

use bufmask_core::{InputFormat, Layout, decode_file};
use serde_json::Value;

fn golden_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn load_expected_report(dir: &str) -> Value {
    let expected_path = golden_dir(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str, input_name: &str) {
    let root = golden_dir(dir);
    let input = root.join(input_name);
    let layout = Layout::load(&root.join("layout.json")).expect("load layout");
    let expected = load_expected_report(dir);

    let format = InputFormat::from_path(&input);
    let mut actual = decode_file(&input, format, &layout).expect("decode input");
    actual.input.path = expected["input"]["path"]
        .as_str()
        .expect("expected input path")
        .to_string();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    assert_eq!(actual_value, expected, "golden mismatch in {dir}");
}

#[test]
fn golden_telemetry_hex() {
    run_golden("tests/golden/telemetry_hex", "input.hex");
}

#[test]
fn golden_binary_unnamed() {
    run_golden("tests/golden/binary_unnamed", "input.bin");
}

#[test]
fn golden_telemetry_hex_rejects_short_payload() {
    let report = load_expected_report("tests/golden/telemetry_hex");
    assert_eq!(report["summary"]["rejected_total"], 1);
    assert_eq!(report["rejections"][0]["line"], 4);
}
