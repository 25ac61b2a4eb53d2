use assert_cmd::prelude::*;
use mandelterm::bitmap;
use predicates::prelude::*;
use std::fs::File;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn headless_export_writes_a_bitmap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.bmp");
    Command::cargo_bin("mandel-export")
        .unwrap()
        .args(&["-o", path.to_str().unwrap(), "-r", "40", "-i", "100", "-t", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 40x40 image"));

    let header = bitmap::read_header(&mut File::open(&path).unwrap()).unwrap();
    assert_eq!((header.width, header.height), (40, 40));
}

#[test]
fn inverted_corners_are_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.bmp");
    Command::cargo_bin("mandel-export")
        .unwrap()
        .args(&["-o", path.to_str().unwrap(), "-r", "10", "-l", "1,1", "-u", "-1,-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid viewport"));
    assert!(!path.exists());
}

#[test]
fn bad_arguments_are_reported() {
    Command::cargo_bin("mandel-export")
        .unwrap()
        .args(&["--resolution", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse resolution"));
}
