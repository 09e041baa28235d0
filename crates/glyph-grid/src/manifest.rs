// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

//! JSON description of an atlas, for engines that address cells by
//! texture coordinates instead of recomputing the grid.

use std::path::Path;

use crate::atlas::GlyphAtlas;
use crate::error::{AtlasError, AtlasResult};
use crate::font::FontResource;
use crate::layout::{CellRect, UvRect};
use glam::UVec2;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, Serialize)]
pub struct AtlasManifest {
    pub version: u32,
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub grid: u32,
    pub cell_size: u32,
    pub margin: UVec2,
    pub flip_v: bool,
    pub font: ManifestFont,
    pub glyphs: Vec<ManifestGlyph>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ManifestFont {
    pub name: Option<String>,
    pub size: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ManifestGlyph {
    pub code: u32,
    pub character: char,
    pub column: u32,
    pub row: u32,
    pub origin: UVec2,
    pub rect: CellRect,
    pub uv: UvRect,
    pub missing: bool,
}

impl AtlasManifest {
    pub const VERSION: u32 = 1;

    /// Describes `atlas`, whose image is stored as `image`.
    pub fn new(atlas: &GlyphAtlas, font: &FontResource, image: &Path, flip_v: bool) -> AtlasResult<Self> {
        let layout = &atlas.layout;
        let glyphs = atlas
            .glyphs
            .iter()
            .map(|glyph| {
                Ok(ManifestGlyph {
                    code: glyph.code,
                    character: glyph.character,
                    column: glyph.cell.x,
                    row: glyph.cell.y,
                    origin: glyph.origin,
                    rect: layout.cell_rect(glyph.code)?,
                    uv: layout.uv_rect(glyph.code, flip_v)?,
                    missing: glyph.missing,
                })
            })
            .collect::<AtlasResult<Vec<_>>>()?;

        let image = image
            .file_name()
            .unwrap_or(image.as_os_str())
            .to_string_lossy()
            .into_owned();

        Ok(Self {
            version: Self::VERSION,
            image,
            width: atlas.canvas.width,
            height: atlas.canvas.height,
            grid: layout.grid(),
            cell_size: layout.cell_size(),
            margin: layout.margin(),
            flip_v,
            font: ManifestFont {
                name: font.name.clone(),
                size: font.size,
            },
            glyphs,
        })
    }

    pub fn save(&self, path: &Path) -> AtlasResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| AtlasError::io(parent, err))?;
        }

        debug!("Writing manifest to {:?}", path);
        let json = serde_json::to_string_pretty(self).map_err(|err| AtlasError::io(path, err))?;
        std::fs::write(path, json).map_err(|err| AtlasError::io(path, err))
    }
}
