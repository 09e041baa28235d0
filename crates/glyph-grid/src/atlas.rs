// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0

use crate::canvas::{Canvas, Rgba, WHITE};
use crate::error::AtlasResult;
use crate::font::{code_to_char, FontResource};
use crate::layout::GridLayout;
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use glam::{UVec2, Vec2};
use tracing::{debug, warn};

/// What to do with code points the font has no glyph for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissingGlyphs {
    /// Draw the font's fallback (`.notdef`) glyph.
    #[default]
    Draw,
    /// Leave the cell empty.
    Skip,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasStyle {
    pub color: Rgba,
    pub missing: MissingGlyphs,
}

impl Default for AtlasStyle {
    fn default() -> Self {
        Self {
            color: WHITE,
            missing: MissingGlyphs::Draw,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphPlacement {
    pub code: u32,
    pub character: char,
    /// `(column, row)` of the cell.
    pub cell: UVec2,
    /// Top-left of the line box the glyph is drawn in.
    pub origin: UVec2,
    /// Where the glyph's baseline starts, in canvas pixels.
    pub baseline: Vec2,
    /// The font doesn't map this code point.
    pub missing: bool,
    /// Some coverage was rasterized for this glyph.
    pub drawn: bool,
}

pub struct GlyphAtlas {
    pub canvas: Canvas,
    pub layout: GridLayout,
    pub glyphs: Vec<GlyphPlacement>,
}

impl GlyphAtlas {
    /// Draws every code point of `layout` into a fresh canvas.
    pub fn render(layout: &GridLayout, font: &FontResource, style: &AtlasStyle) -> AtlasResult<Self> {
        let size = layout.canvas_size();
        let mut canvas = Canvas::new(size, size);
        let scale = font.scale();
        let ascent = font.font().as_scaled(scale).ascent();
        debug!("Rendering {} glyphs at scale {:?}", layout.cell_count(), scale);

        let mut glyphs = Vec::with_capacity(layout.cell_count() as usize);
        for code in layout.codes() {
            let cell = layout.cell(code)?;
            let origin = layout.origin(code)?;
            let character = code_to_char(code);
            let missing = font.is_missing(code);
            let baseline = Vec2::new(origin.x as f32, origin.y as f32 + ascent);

            let drawn = match (missing, style.missing) {
                (true, MissingGlyphs::Skip) => false,
                _ => Self::draw_glyph(&mut canvas, font.font(), scale, character, baseline, style.color),
            };

            glyphs.push(GlyphPlacement {
                code,
                character,
                cell,
                origin,
                baseline,
                missing,
                drawn,
            });
        }

        let missing = glyphs.iter().filter(|glyph| glyph.missing).count();
        if missing > 0 {
            warn!(
                "{} of {} code points have no glyph in {:?}",
                missing,
                glyphs.len(),
                font.path
            );
        }

        Ok(Self {
            canvas,
            layout: *layout,
            glyphs,
        })
    }

    fn draw_glyph(
        canvas: &mut Canvas,
        font: &FontVec,
        scale: PxScale,
        character: char,
        baseline: Vec2,
        color: Rgba,
    ) -> bool {
        let glyph = font
            .glyph_id(character)
            .with_scale_and_position(scale, point(baseline.x, baseline.y));

        let Some(outlined) = font.outline_glyph(glyph) else {
            return false;
        };

        let bounds = outlined.px_bounds();
        let min_x = bounds.min.x as i64;
        let min_y = bounds.min.y as i64;
        let mut drawn = false;
        outlined.draw(|x, y, coverage| {
            let px = min_x + x as i64;
            let py = min_y + y as i64;
            if px < 0 || py < 0 || coverage <= 0.0 {
                return;
            }

            canvas.blend(px as u32, py as u32, color, coverage);
            drawn = true;
        });

        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::noto_sans;

    #[test]
    fn renders_every_code_point() {
        let font = noto_sans();
        let layout = GridLayout::default();
        let atlas = GlyphAtlas::render(&layout, &font, &AtlasStyle::default()).unwrap();

        assert_eq!(atlas.canvas.width, 1024);
        assert_eq!(atlas.canvas.height, 1024);
        assert_eq!(atlas.glyphs.len(), 256);

        for (code, glyph) in atlas.glyphs.iter().enumerate() {
            assert_eq!(glyph.code, code as u32);
            assert_eq!(glyph.origin, layout.origin(code as u32).unwrap());
            assert!(glyph.baseline.y > glyph.origin.y as f32);
        }
    }

    #[test]
    fn printable_cells_have_ink() {
        let font = noto_sans();
        let layout = GridLayout::default();
        let atlas = GlyphAtlas::render(&layout, &font, &AtlasStyle::default()).unwrap();

        for c in ['A', 'g', '~', 'é'] {
            let code = c as u32;
            assert!(atlas.glyphs[code as usize].drawn, "{:?} not drawn", c);
            let rect = layout.cell_rect(code).unwrap();
            assert!(!atlas.canvas.is_region_empty(&rect), "{:?} cell is empty", c);
        }

        let space = layout.cell_rect(' ' as u32).unwrap();
        assert!(!atlas.glyphs[32].drawn);
        assert!(atlas.canvas.is_region_empty(&space));

        // ink uses the fill colour
        let rect = layout.cell_rect('A' as u32).unwrap();
        let opaque = (rect.position.y..rect.position.y + rect.size.y)
            .flat_map(|y| (rect.position.x..rect.position.x + rect.size.x).map(move |x| (x, y)))
            .filter_map(|(x, y)| atlas.canvas.pixel(x, y))
            .filter(|pixel| pixel[3] == 255)
            .collect::<Vec<_>>();
        assert!(!opaque.is_empty());
        assert!(opaque.iter().all(|pixel| *pixel == WHITE));
    }

    #[test]
    fn skipping_missing_glyphs() {
        let font = noto_sans();
        let layout = GridLayout::default();
        let style = AtlasStyle {
            missing: MissingGlyphs::Skip,
            ..Default::default()
        };

        let atlas = GlyphAtlas::render(&layout, &font, &style).unwrap();
        assert!(atlas
            .glyphs
            .iter()
            .filter(|glyph| glyph.missing)
            .all(|glyph| !glyph.drawn));

        let space = layout.cell_rect(' ' as u32).unwrap();
        assert!(!atlas.glyphs[32].drawn);
        assert!(atlas.canvas.is_region_empty(&space));
        assert!(atlas.canvas.is_region_empty(&layout.cell_rect(1).unwrap()));
    }

    #[test]
    fn custom_colour() {
        let font = noto_sans();
        let layout = GridLayout::default();
        let style = AtlasStyle {
            color: [255, 0, 0, 255],
            ..Default::default()
        };

        let atlas = GlyphAtlas::render(&layout, &font, &style).unwrap();
        assert!(atlas
            .canvas
            .data
            .iter()
            .filter(|pixel| pixel[3] > 0)
            .all(|pixel| pixel[1] == 0 && pixel[2] == 0));
    }

    #[test]
    fn deterministic() {
        let font = noto_sans();
        let layout = GridLayout::default();
        let a = GlyphAtlas::render(&layout, &font, &AtlasStyle::default()).unwrap();
        let b = GlyphAtlas::render(&layout, &font, &AtlasStyle::default()).unwrap();
        assert_eq!(a.canvas, b.canvas);
    }
}
