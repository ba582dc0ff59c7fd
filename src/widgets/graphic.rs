//! Graphic widget: an RGBA texture drawn with half-block characters.
//!
//! Each cell shows two texture pixels stacked vertically: the upper one as
//! the foreground of `▀` and the lower one as the background.

use std::any::Any;

use crate::color::{AColor, ColorPair};
use crate::geometry::{Point, Size};
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext};
use crate::widget::traits::Widget;

/// Upper half block.
pub const HALF_BLOCK: char = '▀';

/// Blend two pixels into one cell already on the canvas.
///
/// A cell that is not yet a half block first takes its background color for
/// both halves. Each half is then composited with its pixel at
/// `alpha * pixel.a / 255`.
pub fn composite_half_block(
    ch: &mut char,
    colors: &mut ColorPair,
    top: AColor,
    bottom: AColor,
    alpha: f64,
) {
    if *ch != HALF_BLOCK {
        colors.fg = colors.bg;
    }
    *ch = HALF_BLOCK;
    colors.fg = colors.fg.composite(top.rgb(), alpha * f64::from(top.a) / 255.0);
    colors.bg = colors.bg.composite(bottom.rgb(), alpha * f64::from(bottom.a) / 255.0);
}

// ---------------------------------------------------------------------------
// GraphicWidget
// ---------------------------------------------------------------------------

/// A widget backed by a texture of `2 * height` by `width` pixels.
///
/// Opaque widgets copy the texture straight to the canvas. Transparent ones
/// composite it over what is already there, scaled by `alpha`.
#[derive(Debug, Clone)]
pub struct GraphicWidget {
    size: Size,
    texture: Vec<AColor>,
    default_color: AColor,
    alpha: f64,
}

impl GraphicWidget {
    pub fn new(size: impl Into<Size>, default_color: AColor) -> Self {
        let size = size.into();
        let size = Size::new(size.height.max(0), size.width.max(0));
        Self {
            size,
            texture: vec![default_color; (2 * size.area()) as usize],
            default_color,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.set_alpha(alpha);
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set the texture opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn default_color(&self) -> AColor {
        self.default_color
    }

    /// Set the default color and fill the whole texture with it.
    pub fn set_default_color(&mut self, color: AColor) {
        self.default_color = color;
        self.texture.fill(color);
    }

    /// Texture dimensions in pixels.
    pub fn texture_size(&self) -> Size {
        Size::new(2 * self.size.height, self.size.width)
    }

    fn index(&self, pixel: Point) -> Option<usize> {
        let size = self.texture_size();
        size.contains(pixel).then(|| (pixel.y * size.width + pixel.x) as usize)
    }

    pub fn pixel(&self, pixel: Point) -> Option<AColor> {
        self.index(pixel).map(|i| self.texture[i])
    }

    pub fn set_pixel(&mut self, pixel: Point, color: AColor) {
        if let Some(i) = self.index(pixel) {
            self.texture[i] = color;
        }
    }

    pub fn fill(&mut self, color: AColor) {
        self.texture.fill(color);
    }

    /// Resize to `size` cells, keeping the overlapping pixels.
    pub fn resize(&mut self, size: Size) {
        let size = Size::new(size.height.max(0), size.width.max(0));
        if size == self.size {
            return;
        }
        let old = self.texture_size();
        let new = Size::new(2 * size.height, size.width);
        let mut texture = vec![self.default_color; new.area() as usize];
        for y in 0..new.height.min(old.height) {
            for x in 0..new.width.min(old.width) {
                texture[(y * new.width + x) as usize] = self.texture[(y * old.width + x) as usize];
            }
        }
        self.size = size;
        self.texture = texture;
    }
}

impl Widget for GraphicWidget {
    fn widget_type(&self) -> &'static str {
        "GraphicWidget"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let transparent = cx.is_transparent();
        let alpha = self.alpha;
        for local in view.local_clip().points() {
            let (Some(top), Some(bottom)) = (
                self.pixel(Point::new(2 * local.y, local.x)),
                self.pixel(Point::new(2 * local.y + 1, local.x)),
            ) else {
                continue;
            };
            if let Some((ch, colors)) = view.cell_mut(local) {
                if transparent {
                    composite_half_block(ch, colors, top, bottom, alpha);
                } else {
                    *ch = HALF_BLOCK;
                    *colors = ColorPair::from_colors(top.rgb(), bottom.rgb());
                }
            }
        }
    }

    fn on_size(&mut self, cx: &mut WidgetContext<'_>) {
        self.resize(cx.size());
    }

    fn on_attach(&mut self, cx: &mut WidgetContext<'_>) {
        self.resize(cx.size());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
