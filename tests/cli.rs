use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_obj(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp obj");
    tmp.write_all(contents.as_bytes()).expect("write obj");
    tmp
}

#[test]
fn describe_reports_stock_scene() {
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.arg("--describe");
    cmd.assert()
        .success()
        .stdout(contains("Window: 800x600 (vsync off)"))
        .stdout(contains("Camera: eye (0.0, 50.0, 100.0)"))
        .stdout(contains("Gamma: 1.00"))
        .stdout(contains(" - model: 24 vertices, 12 triangles, standard shading, untextured"))
        .stdout(contains(" - ground quad: 4 vertices, 2 triangles, standard shading, untextured"))
        .stdout(contains("scene pass -> offscreen target -> gamma pass -> backbuffer"));
}

#[test]
fn describe_loads_obj_model() {
    let obj = write_obj(
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
    );
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.arg(obj.path()).arg("--describe");
    cmd.assert()
        .success()
        .stdout(contains(" - model: 3 vertices, 1 triangles"));
}

#[test]
fn describe_reflects_flags() {
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.args([
        "--describe",
        "--normal-coloring",
        "--gamma",
        "1.5",
        "--width",
        "1024",
        "--height",
        "768",
        "--vsync",
    ]);
    cmd.assert()
        .success()
        .stdout(contains("Window: 1024x768 (vsync on)"))
        .stdout(contains("Gamma: 1.50"))
        .stdout(contains(" - model: 24 vertices, 12 triangles, normal-coloring shading"))
        .stdout(contains(" - ground quad: 4 vertices, 2 triangles, standard shading"));
}

#[test]
fn zero_gamma_is_rejected() {
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.args(["--describe", "--gamma", "0"]);
    cmd.assert().failure().stderr(contains("gamma"));
}

#[test]
fn conflicting_shading_flags_are_rejected() {
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.args(["--describe", "--normal-coloring", "--procedural-coloring"]);
    cmd.assert()
        .failure()
        .stderr(contains("cannot both be enabled"));
}

#[test]
fn unknown_argument_prints_usage() {
    let mut cmd = Command::cargo_bin("glaze-renderer").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert().failure().stderr(contains("Usage"));
}
