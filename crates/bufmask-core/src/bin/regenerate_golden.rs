use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bufmask_core::{InputFormat, Layout, decode_file};

const INPUT_NAMES: [&str; 2] = ["input.hex", "input.bin"];

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(input) = INPUT_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.exists())
        else {
            continue;
        };
        let layout = path.join("layout.json");
        regenerate_one(&input, &layout, &path.join("expected_report.json"))?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, layout: &Path, output: &Path) -> Result<(), String> {
    let layout = Layout::load(layout)
        .map_err(|err| format!("failed to load {}: {}", layout.display(), err))?;
    let report = decode_file(input, InputFormat::from_path(input), &layout)
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
