//! CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::sync::OnceLock;

fn fonts_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| text2image_rs::FontConfig::default().resolve().is_ok())
}

macro_rules! skip_if_no_fonts {
    () => {
        if !fonts_available() {
            eprintln!("Skipping test: no system fonts available.");
            return;
        }
    };
}

fn text2image() -> Command {
    Command::cargo_bin("text2image").unwrap()
}

#[test]
fn test_requires_a_text_argument() {
    text2image().assert().failure();
}

#[test]
fn test_rejects_malformed_color() {
    text2image()
        .args(["--fill", "0xGG", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0xGG"));
}

#[test]
fn test_rejects_malformed_measure() {
    text2image()
        .args(["--font-size", "12q", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("12q"));
}

#[test]
fn test_rejects_malformed_baseline_policy() {
    text2image()
        .args(["--baseline", "sloppy", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sloppy"));
}

#[test]
fn test_rejects_stroke_width_without_color() {
    text2image()
        .args(["--stroke-width", "2", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stroke"));
}

#[test]
fn test_rejects_missing_font_file() {
    let out_dir = tempfile::tempdir().unwrap();
    text2image()
        .args(["-o", out_dir.path().to_str().unwrap()])
        .args(["--font-file", "/no/such/font.ttf", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/font.ttf"));
}

#[test]
fn test_writes_one_png_per_text() {
    skip_if_no_fonts!();
    let out_dir = tempfile::tempdir().unwrap();
    text2image()
        .args(["-o", out_dir.path().to_str().unwrap()])
        .args(["--padding", "4,4", "hello", "world"])
        .assert()
        .success();

    for name in ["hello.png", "world.png"] {
        let data = std::fs::read(out_dir.path().join(name)).unwrap();
        assert_eq!(&data[..4], b"\x89PNG", "{name} is not a PNG");
    }
}

#[test]
fn test_sanitizes_output_filenames() {
    skip_if_no_fonts!();
    let out_dir = tempfile::tempdir().unwrap();
    text2image()
        .args(["-o", out_dir.path().to_str().unwrap(), "a/b"])
        .assert()
        .success();
    assert!(out_dir.path().join("ab.png").exists());
}

#[test]
fn test_perfect_baseline_batch_has_uniform_heights() {
    skip_if_no_fonts!();
    let out_dir = tempfile::tempdir().unwrap();
    text2image()
        .args(["-o", out_dir.path().to_str().unwrap()])
        .args(["--min-size", "0,64", "--padding", "3,0"])
        .args(["--baseline", "perfect", "e", "f", "g"])
        .assert()
        .success();

    let mut heights = Vec::new();
    for name in ["e.png", "f.png", "g.png"] {
        let data = std::fs::read(out_dir.path().join(name)).unwrap();
        // PNG IHDR: width and height are big-endian u32s at offsets 16 and 20.
        let height = u32::from_be_bytes(data[20..24].try_into().unwrap());
        assert!(height >= 64, "{name} is only {height} tall");
        heights.push(height);
    }
    assert!(heights.iter().all(|&h| h == heights[0]));
}
