// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{AtlasError, AtlasResult};
use glam::{UVec2, Vec2};
use serde::Serialize;

/// A pixel rectangle within the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellRect {
    pub position: UVec2,
    pub size: UVec2,
}

impl CellRect {
    pub fn contains(&self, point: UVec2) -> bool {
        let max = self.position + self.size;
        point.x >= self.position.x && point.y >= self.position.y && point.x < max.x && point.y < max.y
    }
}

/// Normalized texture coordinates of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Maps code points onto a square grid of equally sized cells.
///
/// The grid always tiles its canvas exactly: `grid * cell == canvas_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    canvas_size: u32,
    grid: u32,
    cell: u32,
    margin_x: u32,
    margin_y: u32,
}

const _: () = assert!(GridLayout::GRID * GridLayout::CELL == GridLayout::CANVAS_SIZE);
const _: () = assert!(GridLayout::GRID * GridLayout::GRID == GridLayout::CODE_POINTS);

impl GridLayout {
    pub const GRID: u32 = 16;
    pub const CELL: u32 = 64;
    pub const CANVAS_SIZE: u32 = 1024;
    pub const MARGIN_X: u32 = 8;
    pub const MARGIN_Y: u32 = 6;

    /// Size of the single-byte code page.
    pub const CODE_POINTS: u32 = 256;

    /// Largest accepted canvas edge, in pixels.
    pub const MAX_CANVAS_SIZE: u32 = 16384;

    pub const DEFAULT: GridLayout = GridLayout {
        canvas_size: Self::CANVAS_SIZE,
        grid: Self::GRID,
        cell: Self::CELL,
        margin_x: Self::MARGIN_X,
        margin_y: Self::MARGIN_Y,
    };

    /// Creates a layout dividing a square canvas into `grid * grid` cells,
    /// one per code point.
    pub fn new(canvas_size: u32, grid: u32, margin_x: u32, margin_y: u32) -> AtlasResult<Self> {
        if grid == 0 {
            return Err(AtlasError::InvalidGrid("grid must have at least one cell".into()));
        }

        if canvas_size > Self::MAX_CANVAS_SIZE {
            return Err(AtlasError::InvalidGrid(format!(
                "canvas size {} exceeds the maximum of {}",
                canvas_size,
                Self::MAX_CANVAS_SIZE
            )));
        }

        if canvas_size == 0 || canvas_size % grid != 0 {
            return Err(AtlasError::InvalidGrid(format!(
                "canvas size {} is not a multiple of grid size {}",
                canvas_size, grid
            )));
        }

        match grid.checked_mul(grid) {
            Some(cells) if cells == Self::CODE_POINTS => {}
            _ => {
                return Err(AtlasError::InvalidGrid(format!(
                    "a {}x{} grid doesn't hold exactly {} code points",
                    grid,
                    grid,
                    Self::CODE_POINTS
                )))
            }
        }

        let cell = canvas_size / grid;
        if margin_x >= cell || margin_y >= cell {
            return Err(AtlasError::InvalidGrid(format!(
                "margins ({}, {}) do not fit in a {}px cell",
                margin_x, margin_y, cell
            )));
        }

        Ok(Self {
            canvas_size,
            grid,
            cell,
            margin_x,
            margin_y,
        })
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn grid(&self) -> u32 {
        self.grid
    }

    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    pub fn margin(&self) -> UVec2 {
        UVec2::new(self.margin_x, self.margin_y)
    }

    /// The number of cells, which is also the number of code points laid out.
    pub fn cell_count(&self) -> u32 {
        self.grid * self.grid
    }

    /// All code points of this layout in drawing order.
    pub fn codes(&self) -> std::ops::Range<u32> {
        0..self.cell_count()
    }

    /// Returns the `(column, row)` of the cell holding `code`.
    pub fn cell(&self, code: u32) -> AtlasResult<UVec2> {
        if code >= self.cell_count() {
            return Err(AtlasError::OutOfRange {
                code,
                cells: self.cell_count(),
            });
        }

        Ok(UVec2::new(code % self.grid, code / self.grid))
    }

    /// Returns the pixel position where the glyph for `code` is drawn.
    pub fn origin(&self, code: u32) -> AtlasResult<UVec2> {
        let cell = self.cell(code)?;
        Ok(cell * self.cell + self.margin())
    }

    pub fn cell_rect(&self, code: u32) -> AtlasResult<CellRect> {
        let cell = self.cell(code)?;
        Ok(CellRect {
            position: cell * self.cell,
            size: UVec2::splat(self.cell),
        })
    }

    /// Texture coordinates of a cell, inset by half a texel on every side
    /// so that nearest sampling never bleeds into the neighbouring cell.
    ///
    /// With `flip_v` rows are counted from the bottom of the texture, for
    /// loaders that upload images bottom-up.
    pub fn uv_rect(&self, code: u32, flip_v: bool) -> AtlasResult<UvRect> {
        let cell = self.cell(code)?;
        let cell = Vec2::new(cell.x as f32, cell.y as f32);
        let grid = self.grid as f32;
        let eps = 0.5 / self.canvas_size as f32;

        let u0 = cell.x / grid + eps;
        let u1 = (cell.x + 1.0) / grid - eps;

        let (v0, v1) = if flip_v {
            let top = 1.0 - cell.y / grid;
            let bottom = 1.0 - (cell.y + 1.0) / grid;
            (bottom + eps, top - eps)
        } else {
            (cell.y / grid + eps, (cell.y + 1.0) / grid - eps)
        };

        Ok(UvRect {
            min: Vec2::new(u0, v0),
            max: Vec2::new(u1, v1),
        })
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}
