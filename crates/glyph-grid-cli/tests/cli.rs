// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("glyph-grid-cli-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn font(&self) -> PathBuf {
        let path = self.0.join("NotoSans-Regular.ttf");
        std::fs::write(&path, notosans::REGULAR_TTF).unwrap();
        path
    }

    /// Runs the binary inside the scratch directory, isolated from the
    /// user's configuration and environment.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_glyph-grid"))
            .args(args)
            .current_dir(&self.0)
            .env("HOME", &self.0)
            .env("XDG_CONFIG_HOME", self.0.join("config"))
            .env_remove("GLYPH_GRID_FONT")
            .output()
            .unwrap()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn png_size(path: &Path) -> (u32, u32, png::ColorType) {
    let decoder = png::Decoder::new(File::open(path).unwrap());
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    (info.width, info.height, info.color_type)
}

#[test]
fn writes_default_output() {
    let scratch = Scratch::new("default");
    let font = scratch.font();

    let output = scratch.run(&["--font", font.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "saved assets/fonts.png\n");

    let assets = scratch.0.join("assets");
    assert_eq!(std::fs::read_dir(&assets).unwrap().count(), 1);
    assert_eq!(
        png_size(&assets.join("fonts.png")),
        (1024, 1024, png::ColorType::Rgba)
    );
}

#[test]
fn font_from_environment() {
    let scratch = Scratch::new("env");
    let font = scratch.font();

    let output = Command::new(env!("CARGO_BIN_EXE_glyph-grid"))
        .args(["--output", "atlas.png"])
        .current_dir(&scratch.0)
        .env("HOME", &scratch.0)
        .env("XDG_CONFIG_HOME", scratch.0.join("config"))
        .env("GLYPH_GRID_FONT", &font)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(scratch.0.join("atlas.png").is_file());
}

#[test]
fn missing_font_fails() {
    let scratch = Scratch::new("missing");

    let output = scratch.run(&["--font", "does-not-exist.ttf"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(66));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: font file not found"));
    assert!(!scratch.0.join("assets").exists());
}

#[test]
fn config_file() {
    let scratch = Scratch::new("config");
    let font = scratch.font();
    let config = scratch.0.join("atlas.toml");
    std::fs::write(
        &config,
        format!(
            "[font]\npath = {:?}\nsize = 32.0\n\n[layout]\ncanvas_size = 512\n\n[output]\npath = \"out/small.png\"\nmanifest = \"out/small.json\"\n",
            font.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = scratch.run(&["--config", "atlas.toml"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        png_size(&scratch.0.join("out/small.png")),
        (512, 512, png::ColorType::Rgba)
    );
    assert!(scratch.0.join("out/small.json").is_file());

    // flags override the file
    let output = scratch.run(&["--config", "atlas.toml", "--output", "override.png"]);
    assert!(output.status.success());
    assert!(scratch.0.join("override.png").is_file());
}

#[test]
fn bad_config_fails() {
    let scratch = Scratch::new("bad-config");
    std::fs::write(scratch.0.join("atlas.toml"), "[layout]\ncanvas_size = 1000\n").unwrap();

    let output = scratch.run(&["--config", "atlas.toml"]);
    assert_eq!(output.status.code(), Some(78));
    assert!(!scratch.0.join("assets").exists());

    let output = scratch.run(&["--config", "nowhere.toml"]);
    assert_eq!(output.status.code(), Some(78));
}

#[test]
fn reruns_are_identical() {
    let scratch = Scratch::new("rerun");
    let font = scratch.font();
    let font = font.to_str().unwrap();

    assert!(scratch.run(&["--font", font]).status.success());
    let first = std::fs::read(scratch.0.join("assets/fonts.png")).unwrap();
    assert!(scratch.run(&["--font", font]).status.success());
    let second = std::fs::read(scratch.0.join("assets/fonts.png")).unwrap();
    assert_eq!(first, second);
}
