// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end tests of the seamcarve binary.

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// A gradient with a dark flat stripe down the middle: the stripe is
// the low-energy region the carver should eat first.
fn write_test_image(dir: &Path) -> PathBuf {
    let path = dir.join("input.png");
    let mut img = RgbaImage::new(24, 16);
    for (x, _y, px) in img.enumerate_pixels_mut() {
        let v = if (10..14).contains(&x) { 40 } else { (x * 10) as u8 };
        *px = Rgba([v, v, v, 255]);
    }
    img.save(&path).unwrap();
    path
}

fn seamcarve() -> Command {
    Command::cargo_bin("seamcarve").unwrap()
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    seamcarve()
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn too_few_arguments_fails() {
    seamcarve()
        .args(&["in.png", "out.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn non_integer_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "three",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("COLS_TO_REMOVE must be an integer."));
}

#[test]
fn carves_columns_with_the_device_engine() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[input.to_str().unwrap(), output.to_str().unwrap(), "4"])
        .assert()
        .success();
    let carved = image::open(&output).unwrap();
    assert_eq!(carved.width(), 20);
    assert_eq!(carved.height(), 16);
}

#[test]
fn carves_columns_with_the_host_engine() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "2",
            "--host",
            "--gray",
        ])
        .assert()
        .success();
    let carved = image::open(&output).unwrap();
    assert_eq!(carved.width(), 22);
}

#[test]
fn verified_carve_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "1",
            "--verify",
        ])
        .assert()
        .success();
    assert_eq!(image::open(&output).unwrap().width(), 23);
}

#[test]
fn negative_count_leaves_the_width_alone() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[input.to_str().unwrap(), output.to_str().unwrap(), "-3"])
        .assert()
        .success();
    assert_eq!(image::open(&output).unwrap().width(), 24);
}

#[test]
fn removing_the_whole_width_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&[input.to_str().unwrap(), output.to_str().unwrap(), "24"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot remove"));
    assert!(!output.exists());
}

#[test]
fn mark_highlights_without_shrinking() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("marked.png");
    seamcarve()
        .args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "1",
            "--mark",
        ])
        .assert()
        .success();
    let marked = image::open(&output).unwrap().to_rgba8();
    assert_eq!(marked.width(), 24);
    // Exactly one opaque-red pixel per row.
    for y in 0..16 {
        let reds = (0..24)
            .filter(|&x| marked.get_pixel(x, y).0 == [255, 0, 0, 255])
            .count();
        assert_eq!(reds, 1, "row {} has {} marked pixels", y, reds);
    }
}

#[test]
fn dump_energy_writes_a_side_file() {
    let dir = TempDir::new().unwrap();
    let input = write_test_image(dir.path());
    let output = dir.path().join("out.png");
    let energy = dir.path().join("energy.png");
    seamcarve()
        .args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "1",
            "--dump-energy",
            energy.to_str().unwrap(),
        ])
        .assert()
        .success();
    let dumped = image::open(&energy).unwrap();
    assert_eq!(dumped.width(), 24);
    assert_eq!(dumped.height(), 16);
}
