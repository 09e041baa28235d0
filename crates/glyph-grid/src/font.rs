// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::{Path, PathBuf};

use crate::error::{AtlasResult, ResourceLoadError};
use crate::layout::GridLayout;
use ab_glyph::{Font, FontVec, PxScale};
use tracing::{debug, info};
use ttf_parser::{name_id, Face};

/// Where to find the font and how large to render it.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSource {
    /// An explicit font file. When unset, a well-known system font is used.
    pub path: Option<PathBuf>,
    /// Pixels per em.
    pub size: f32,
}

impl Default for FontSource {
    fn default() -> Self {
        Self {
            path: None,
            size: Self::DEFAULT_SIZE,
        }
    }
}

impl FontSource {
    pub const DEFAULT_SIZE: f32 = 48.0;

    pub fn new(path: impl Into<PathBuf>, size: f32) -> Self {
        Self {
            path: Some(path.into()),
            size,
        }
    }

    /// Picks the font file to load.
    ///
    /// An explicit path is returned as-is, even if it doesn't exist, so that
    /// loading fails instead of quietly rendering a different font.
    pub fn resolve(&self) -> Result<PathBuf, ResourceLoadError> {
        self.resolve_among(default_font_candidates())
    }

    /// Like [FontSource::resolve], discovering from `candidates` instead of
    /// the platform's well-known fonts.
    pub fn resolve_among(&self, candidates: Vec<PathBuf>) -> Result<PathBuf, ResourceLoadError> {
        if let Some(path) = self.path.as_ref() {
            return Ok(path.clone());
        }

        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                debug!("Discovered default font at {:?}", path);
                Ok(path.clone())
            }
            None => Err(ResourceLoadError::NoDefaultFont(candidates)),
        }
    }
}

/// Monospace fonts tried, in order, when no font is configured.
pub fn default_font_candidates() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            "C:/Windows/Fonts/consola.ttf",
            "C:/Windows/Fonts/cour.ttf",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/Menlo.ttc",
            "/System/Library/Fonts/Monaco.ttf",
            "/Library/Fonts/Courier New.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
            "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
        ]
    };

    paths.iter().map(PathBuf::from).collect()
}

/// A parsed font, ready to rasterize the single-byte code page.
pub struct FontResource {
    pub path: PathBuf,
    pub name: Option<String>,
    pub size: f32,
    pub units_per_em: u16,
    pub glyph_count: u16,
    missing: Vec<u32>,
    font: FontVec,
}

impl FontResource {
    pub fn load(source: &FontSource) -> AtlasResult<Self> {
        let path = source.resolve()?;
        if !path.is_file() {
            return Err(ResourceLoadError::NotFound(path).into());
        }

        debug!("Reading font file {:?}", path);
        let data = std::fs::read(&path).map_err(|err| ResourceLoadError::Unreadable {
            path: path.clone(),
            message: err.to_string(),
        })?;

        let font = Self::from_bytes(&path, data, source.size)?;
        info!(
            "Loaded font {:?} ({} glyphs, {} units per em) at {}px",
            font.name.as_deref().unwrap_or("<unnamed>"),
            font.glyph_count,
            font.units_per_em,
            font.size
        );

        Ok(font)
    }

    /// Parses font data that was read from `path`.
    pub fn from_bytes(path: &Path, data: Vec<u8>, size: f32) -> AtlasResult<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(ResourceLoadError::InvalidSize(size).into());
        }

        let unparsable = |message: String| ResourceLoadError::Unparsable {
            path: path.to_owned(),
            message,
        };

        let (name, units_per_em, glyph_count, missing) = {
            let face = Face::parse(&data, 0).map_err(|err| unparsable(err.to_string()))?;

            let name = face
                .names()
                .into_iter()
                .filter(|name| name.name_id == name_id::FULL_NAME && name.is_unicode())
                .find_map(|name| name.to_string());

            let missing = (0..GridLayout::CODE_POINTS)
                .filter(|code| face.glyph_index(code_to_char(*code)).is_none())
                .collect::<Vec<_>>();

            (name, face.units_per_em(), face.number_of_glyphs(), missing)
        };

        let font = FontVec::try_from_vec(data).map_err(|err| unparsable(err.to_string()))?;

        Ok(Self {
            path: path.to_owned(),
            name,
            size,
            units_per_em,
            glyph_count,
            missing,
            font,
        })
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }

    /// The scale at which one em spans `size` pixels.
    pub fn scale(&self) -> PxScale {
        let height = self.font.height_unscaled();
        PxScale::from(self.size * height / self.units_per_em.max(1) as f32)
    }

    /// Code points of the single-byte code page that the font doesn't map.
    pub fn missing(&self) -> &[u32] {
        &self.missing
    }

    pub fn is_missing(&self, code: u32) -> bool {
        self.missing.binary_search(&code).is_ok()
    }
}

/// Interprets a code point of the single-byte code page as Latin-1.
pub fn code_to_char(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}
