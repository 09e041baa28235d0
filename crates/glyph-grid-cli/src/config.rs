// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use glyph_grid::atlas::{AtlasStyle, MissingGlyphs};
use glyph_grid::canvas::Rgba;
use glyph_grid::error::AtlasResult;
use glyph_grid::font::FontSource;
use glyph_grid::layout::GridLayout;
use glyph_grid::AtlasOptions;
use serde::Deserialize;
use tracing::info;

use crate::Args;

/// The TOML configuration file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub size: Option<f32>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub canvas_size: Option<u32>,
    pub margin_x: Option<u32>,
    pub margin_y: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub flip_v: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub color: Option<Rgba>,
    pub skip_missing: Option<bool>,
}

/// Gets the default path of the configuration file, if the platform has a
/// configuration directory.
pub fn get_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("rs", "glyph-grid", "glyph-grid")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Loads a configuration file from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<ConfigFile> {
    info!("Loading configuration file from {:?}", path);
    let config = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("Failed to load config file at {:?}: {:?}", path, err))?;
    toml::from_str(&config).map_err(|err| anyhow::anyhow!("Failed to deserialize config: {}", err))
}

/// Merges command-line arguments over the configuration file over the
/// built-in defaults.
pub fn resolve_options(args: &Args, config: &ConfigFile) -> AtlasResult<AtlasOptions> {
    let defaults = AtlasOptions::default();

    let font = FontSource {
        path: args.font.clone().or_else(|| config.font.path.clone()),
        size: args
            .size
            .or(config.font.size)
            .unwrap_or(FontSource::DEFAULT_SIZE),
    };

    let layout = &config.layout;
    let layout = GridLayout::new(
        layout.canvas_size.unwrap_or(GridLayout::CANVAS_SIZE),
        GridLayout::GRID,
        layout.margin_x.unwrap_or(GridLayout::MARGIN_X),
        layout.margin_y.unwrap_or(GridLayout::MARGIN_Y),
    )?;

    let skip_missing = args.skip_missing || config.render.skip_missing.unwrap_or(false);
    let style = AtlasStyle {
        color: config.render.color.unwrap_or(defaults.style.color),
        missing: match skip_missing {
            true => MissingGlyphs::Skip,
            false => MissingGlyphs::Draw,
        },
    };

    Ok(AtlasOptions {
        font,
        layout,
        style,
        output: args
            .output
            .clone()
            .or_else(|| config.output.path.clone())
            .unwrap_or(defaults.output),
        manifest: args
            .manifest
            .clone()
            .or_else(|| config.output.manifest.clone()),
        flip_v: config.output.flip_v.unwrap_or(defaults.flip_v),
    })
}
