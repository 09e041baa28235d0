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

use std::path::PathBuf;

use tracing::{debug, info};

/// Drawing the code page into a canvas.
pub mod atlas;

/// The RGBA pixel surface and PNG output.
pub mod canvas;

pub mod error;

/// Font resolution and loading.
pub mod font;

/// Code point to grid cell mapping.
pub mod layout;

pub mod manifest;

use atlas::{AtlasStyle, GlyphAtlas};
use error::AtlasResult;
use font::{FontResource, FontSource};
use layout::GridLayout;
use manifest::AtlasManifest;

/// Everything needed to bake one atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasOptions {
    pub font: FontSource,
    pub layout: GridLayout,
    pub style: AtlasStyle,
    pub output: PathBuf,
    /// Also write a JSON manifest to this path.
    pub manifest: Option<PathBuf>,
    /// Count manifest texture rows from the bottom.
    pub flip_v: bool,
}

impl AtlasOptions {
    pub const DEFAULT_OUTPUT: &'static str = "assets/fonts.png";
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            font: FontSource::default(),
            layout: GridLayout::default(),
            style: AtlasStyle::default(),
            output: PathBuf::from(Self::DEFAULT_OUTPUT),
            manifest: None,
            flip_v: true,
        }
    }
}

/// The outcome of a successful [bake].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BakeReport {
    pub output: PathBuf,
    pub manifest: Option<PathBuf>,
    pub font: PathBuf,
    pub width: u32,
    pub height: u32,
    pub drawn: usize,
    pub missing: Vec<u32>,
}

/// Loads the font, draws the atlas and writes it out.
///
/// Nothing is written if the font can't be loaded.
pub fn bake(options: &AtlasOptions) -> AtlasResult<BakeReport> {
    debug!("Loading font from {:?}", options.font);
    let font = FontResource::load(&options.font)?;

    let atlas = GlyphAtlas::render(&options.layout, &font, &options.style)?;

    info!("Saving atlas to {:?}", options.output);
    atlas.canvas.save(&options.output)?;

    if let Some(path) = options.manifest.as_ref() {
        AtlasManifest::new(&atlas, &font, &options.output, options.flip_v)?.save(path)?;
    }

    Ok(BakeReport {
        output: options.output.clone(),
        manifest: options.manifest.clone(),
        font: font.path.clone(),
        width: atlas.canvas.width,
        height: atlas.canvas.height,
        drawn: atlas.glyphs.iter().filter(|glyph| glyph.drawn).count(),
        missing: font.missing().to_vec(),
    })
}
