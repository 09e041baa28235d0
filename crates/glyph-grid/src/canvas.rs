// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{AtlasError, AtlasResult};
use crate::layout::CellRect;
use tracing::debug;

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];
pub const WHITE: Rgba = [255, 255, 255, 255];

/// A straight-alpha RGBA8 pixel surface, stored row-major from the top row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub data: Vec<Rgba>,
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![TRANSPARENT; width as usize * height as usize],
            width,
            height,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.data[self.index(x, y)])
    }

    /// Composites `color` scaled by `coverage` over the pixel at `(x, y)`.
    ///
    /// Pixels outside of the canvas are ignored.
    pub fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }

        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }

        let index = self.index(x, y);
        let dst = &mut self.data[index];
        let src_a = color[3] as f32 / 255.0 * coverage;
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        for i in 0..3 {
            let c = (color[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[i] = c.round().clamp(0.0, 255.0) as u8;
        }

        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Whether every pixel inside `rect` is fully transparent.
    pub fn is_region_empty(&self, rect: &CellRect) -> bool {
        let x_end = (rect.position.x + rect.size.x).min(self.width);
        let y_end = (rect.position.y + rect.size.y).min(self.height);
        (rect.position.y..y_end).all(|y| {
            (rect.position.x..x_end).all(|x| self.data[self.index(x, y)][3] == 0)
        })
    }

    pub fn data_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Encodes the canvas as an 8-bit RGBA PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.data_bytes())?;
        writer.finish()
    }

    /// Writes the canvas to `path` as a PNG, creating missing parent directories.
    pub fn save(&self, path: &Path) -> AtlasResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating output directory {:?}", parent);
            std::fs::create_dir_all(parent).map_err(|err| AtlasError::io(parent, err))?;
        }

        let file = File::create(path).map_err(|err| AtlasError::io(path, err))?;
        let mut writer = BufWriter::new(file);
        self.write_png(&mut writer)
            .map_err(|err| AtlasError::io(path, err))?;
        writer.flush().map_err(|err| AtlasError::io(path, err))
    }
}
