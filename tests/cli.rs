use assert_cmd::Command;
use blurmask::draw::Image;
use predicates::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn blurmask_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blurmask").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn write_red_png(dir: &Path, size: i32) -> PathBuf {
    let image = Image::render((size, size), 1.0, |ctx| {
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.paint()
    })
    .unwrap();
    let path = dir.join("input.png");
    image.write_png(&mut File::create(&path).unwrap()).unwrap();
    path
}

fn write_script(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("script.json");
    std::fs::write(&path, json).unwrap();
    path
}

const HORIZONTAL_SWIPE: &str = r#"[
    {"line_width": 4.0},
    {"begin": {"x": 0.0, "y": 10.0}},
    {"move": {"x": 20.0, "y": 10.0}},
    "end"
]"#;

#[test]
fn blurmask_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    blurmask_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--script"))
        .stdout(predicate::str::contains("blurred or masked"));
}

#[test]
fn blurmask_version_includes_build_hash() {
    let temp = TempDir::new().unwrap();
    blurmask_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains(format!(
            "({})",
            env!("BLURMASK_GIT_HASH")
        )));
}

#[test]
fn missing_input_fails_with_context() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "[]");
    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(temp.path().join("nope.png"))
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn invalid_mode_is_rejected() {
    let temp = TempDir::new().unwrap();
    let input = write_red_png(temp.path(), 20);
    let script = write_script(temp.path(), "[]");
    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .args(["--mode", "smudge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mode"));
}

#[test]
fn solid_mask_swipe_is_exported() {
    let temp = TempDir::new().unwrap();
    let input = write_red_png(temp.path(), 20);
    let script = write_script(temp.path(), HORIZONTAL_SWIPE);
    let output = temp.path().join("out").join("edited.png");

    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .args(["--color", "blue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edited.png"));

    let exported = Image::from_png(&mut File::open(&output).unwrap(), 1.0).unwrap();
    assert_eq!(exported.pixel_width(), 20);
    assert_eq!(exported.pixel(10, 10), Some([0, 0, 255, 255]));
    assert_eq!(exported.pixel(10, 2), Some([255, 0, 0, 255]));
}

#[test]
fn display_size_rescales_script_coordinates() {
    let temp = TempDir::new().unwrap();
    let input = write_red_png(temp.path(), 40);
    let script = write_script(temp.path(), HORIZONTAL_SWIPE);
    let output = temp.path().join("edited.png");

    // Script coordinates are in a 20x20 view; the image is 40x40.
    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .args(["--color", "blue", "--display-size", "20x20"])
        .assert()
        .success();

    let exported = Image::from_png(&mut File::open(&output).unwrap(), 1.0).unwrap();
    assert_eq!(exported.pixel(30, 20), Some([0, 0, 255, 255]));
    assert_eq!(exported.pixel(30, 10), Some([255, 0, 0, 255]));
}

#[test]
fn config_file_selects_mask_style() {
    let temp = TempDir::new().unwrap();
    let input = write_red_png(temp.path(), 20);
    let script = write_script(temp.path(), HORIZONTAL_SWIPE);
    let output = temp.path().join("edited.png");
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[mask]\nstyle = \"solid\"\ncolor = [0, 255, 0]\n").unwrap();

    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let exported = Image::from_png(&mut File::open(&output).unwrap(), 1.0).unwrap();
    assert_eq!(exported.pixel(10, 10), Some([0, 255, 0, 255]));
}

#[test]
fn malformed_script_fails() {
    let temp = TempDir::new().unwrap();
    let input = write_red_png(temp.path(), 10);
    let script = write_script(temp.path(), "{not json");
    blurmask_cmd(temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid script"));
}
