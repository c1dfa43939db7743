// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

const PASSPORT_TEXT: &str = "UKRAINE Authority 4021\n\
    P<UKRDOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<\n\
    1234567890UKR9001017M3001012<<<<<<<<<<<<<<02\n";

fn scanwerk() -> Command {
    Command::cargo_bin("scanwerk").unwrap()
}

/// A light page on a dark background, written as PNG.
fn write_photo(path: &Path) {
    let mut img = RgbImage::from_pixel(320, 240, Rgb([30, 30, 30]));
    for y in 40..200 {
        for x in 60..260 {
            img.put_pixel(x, y, Rgb([240, 240, 240]));
        }
    }
    img.save(path).unwrap();
}

#[test]
fn prints_version() {
    scanwerk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("scanwerk "));
}

// -- detect ---------------------------------------------------------------------

#[test]
fn detect_prints_points() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    write_photo(&photo);

    let output = scanwerk().arg("detect").arg(&photo).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["located"], true);
    assert_eq!(json["points"].as_array().map(Vec::len), Some(4));
}

#[test]
fn detect_blank_photo_reports_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("blank.png");
    RgbImage::from_pixel(64, 48, Rgb([200, 200, 200]))
        .save(&photo)
        .unwrap();

    scanwerk()
        .arg("detect")
        .arg(&photo)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"located\": false"));
}

#[test]
fn detect_missing_file_is_a_fault() {
    scanwerk()
        .args(["detect", "does-not-exist.png"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

// -- rectify --------------------------------------------------------------------

#[test]
fn rectify_with_points_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    let page = dir.path().join("page.png");
    let store = dir.path().join("store");
    write_photo(&photo);

    let points = r#"[{"x":60,"y":40},{"x":260,"y":40},{"x":260,"y":200},{"x":60,"y":200}]"#;
    let output = scanwerk()
        .arg("rectify")
        .arg(&photo)
        .arg("--output")
        .arg(&page)
        .args(["--points", points, "--enhance", "grayscale", "--store"])
        .arg(&store)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["width"], 200);
    assert_eq!(json["height"], 160);
    let key = json["key"].as_str().unwrap();
    assert!(store.join(key).is_file());
    assert_eq!(image::open(&page).unwrap().width(), 200);
}

#[test]
fn rectify_rejects_collinear_points() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    write_photo(&photo);

    let points = r#"[{"x":0,"y":0},{"x":10,"y":0},{"x":20,"y":0},{"x":0,"y":10}]"#;
    scanwerk()
        .arg("rectify")
        .arg(&photo)
        .arg("--output")
        .arg(dir.path().join("page.png"))
        .args(["--points", points])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hint:"));
}

// -- mrz ------------------------------------------------------------------------

#[test]
fn mrz_from_stdin() {
    let output = scanwerk()
        .args(["mrz", "-", "--locale", "tr"])
        .write_stdin(PASSPORT_TEXT)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["record"]["surname"], "DOE");
    assert_eq!(json["record"]["birth_date"], "1990-01-01");
    assert_eq!(json["record"]["localized"]["nationality"], "UKRAYNA");
    assert_eq!(json["authority"], "4021");
}

#[test]
fn mrz_not_found_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("receipt.txt");
    fs::write(&text, "Coffee 3.50\nTotal 3.50\n").unwrap();

    scanwerk()
        .arg("mrz")
        .arg(&text)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn bad_config_is_a_fault() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("scanwerk.json");
    fs::write(&config, r#"{"mrz": {"validity_years": 0}}"#).unwrap();

    scanwerk()
        .arg("--config")
        .arg(&config)
        .args(["mrz", "-"])
        .write_stdin(PASSPORT_TEXT)
        .assert()
        .code(2);
}

// -- report ---------------------------------------------------------------------

#[test]
fn passport_report_is_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("passport.txt");
    let pdf = dir.path().join("passport.pdf");
    fs::write(&text, PASSPORT_TEXT).unwrap();

    scanwerk()
        .arg("report")
        .arg(&text)
        .args(["--mode", "passport", "--output"])
        .arg(&pdf)
        .assert()
        .success();
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn generic_report_is_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("letter.txt");
    let pdf = dir.path().join("letter.pdf");
    fs::write(&text, "Dear reader,\n\nThis page was scanned.\n").unwrap();

    scanwerk()
        .arg("report")
        .arg(&text)
        .args(["--mode", "generic", "-o"])
        .arg(&pdf)
        .assert()
        .success();
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}
