//! Particle fields: many one-cell children painted by their parent.
//!
//! A particle is a 1x1 widget with a position and the usual flags but no
//! render pass of its own; its field walks the particles and writes each
//! one's cell directly. A field only accepts particles of its own kind and
//! offers events to itself first, then to its particles topmost-first.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::color::{AColor, ColorPair};
use crate::error::{Error, Result};
use crate::event::dispatch::Event;
use crate::event::input::{KeyPressEvent, MouseEvent, PasteEvent};
use crate::geometry::Point;
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext, WidgetData, WidgetId, WidgetTree};
use crate::widget::traits::{DispatchOrder, Widget};

use super::graphic::composite_half_block;

/// Event callback of a field or particle. Returns `true` if handled.
pub type Handler = Box<dyn FnMut(&mut WidgetContext<'_>, Event<'_>) -> bool>;

fn run_handler(handler: &mut Option<Handler>, cx: &mut WidgetContext<'_>, event: Event<'_>) -> bool {
    handler.as_mut().is_some_and(|h| h(cx, event))
}

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// A one-cell widget drawn by its [`ParticleField`].
pub trait Particle: Widget {
    /// Name used when a field rejects a foreign child.
    const KIND: &'static str;

    /// Write this particle into its cell, which already holds what was
    /// painted below it.
    fn paint_cell(&self, data: &WidgetData, ch: &mut char, colors: &mut ColorPair);
}

/// Every event hook of a particle or field forwards to its handler.
macro_rules! forward_events {
    () => {
        fn on_press(&mut self, cx: &mut WidgetContext<'_>, event: &KeyPressEvent) -> bool {
            run_handler(&mut self.handler, cx, Event::Press(event))
        }

        fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
            run_handler(&mut self.handler, cx, Event::Click(event))
        }

        fn on_double_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
            run_handler(&mut self.handler, cx, Event::DoubleClick(event))
        }

        fn on_triple_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
            run_handler(&mut self.handler, cx, Event::TripleClick(event))
        }

        fn on_paste(&mut self, cx: &mut WidgetContext<'_>, event: &PasteEvent) -> bool {
            run_handler(&mut self.handler, cx, Event::Paste(event))
        }
    };
}

// ---------------------------------------------------------------------------
// TextParticle
// ---------------------------------------------------------------------------

/// A particle showing one character.
///
/// A transparent text particle keeps the background color below it.
pub struct TextParticle {
    pub ch: char,
    pub colors: ColorPair,
    handler: Option<Handler>,
}

impl fmt::Debug for TextParticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextParticle")
            .field("ch", &self.ch)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl TextParticle {
    pub fn new(ch: char, colors: ColorPair) -> Self {
        Self { ch, colors, handler: None }
    }

    pub fn with_handler(
        mut self,
        handler: impl FnMut(&mut WidgetContext<'_>, Event<'_>) -> bool + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl Particle for TextParticle {
    const KIND: &'static str = "TextParticle";

    fn paint_cell(&self, data: &WidgetData, ch: &mut char, colors: &mut ColorPair) {
        *ch = self.ch;
        colors.fg = self.colors.fg;
        if !data.is_transparent {
            colors.bg = self.colors.bg;
        }
    }
}

impl Widget for TextParticle {
    fn widget_type(&self) -> &'static str {
        Self::KIND
    }

    forward_events!();

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// GraphicParticle
// ---------------------------------------------------------------------------

/// A particle filling its cell with one color, composited when transparent.
pub struct GraphicParticle {
    pub color: AColor,
    pub alpha: f64,
    handler: Option<Handler>,
}

impl fmt::Debug for GraphicParticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicParticle")
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

impl GraphicParticle {
    pub fn new(color: AColor) -> Self {
        Self { color, alpha: 1.0, handler: None }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_handler(
        mut self,
        handler: impl FnMut(&mut WidgetContext<'_>, Event<'_>) -> bool + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl Particle for GraphicParticle {
    const KIND: &'static str = "GraphicParticle";

    fn paint_cell(&self, data: &WidgetData, ch: &mut char, colors: &mut ColorPair) {
        if data.is_transparent {
            composite_half_block(ch, colors, self.color, self.color, self.alpha);
        } else {
            *ch = ' ';
            colors.bg = self.color.rgb();
        }
    }
}

impl Widget for GraphicParticle {
    fn widget_type(&self) -> &'static str {
        Self::KIND
    }

    forward_events!();

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// ParticleField
// ---------------------------------------------------------------------------

/// A container holding only particles of type `P`.
///
/// # Examples
///
/// ```ignore
/// let field = tree.insert(WidgetData::new().auto_resize(), ParticleField::<TextParticle>::new());
/// ParticleField::<TextParticle>::add_particle(&mut tree, field, (3, 4), TextParticle::new('*', pair))?;
/// ```
pub struct ParticleField<P> {
    handler: Option<Handler>,
    _particles: PhantomData<fn() -> P>,
}

impl<P> fmt::Debug for ParticleField<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleField").finish_non_exhaustive()
    }
}

impl<P> Default for ParticleField<P> {
    fn default() -> Self {
        Self { handler: None, _particles: PhantomData }
    }
}

impl<P: Particle> ParticleField<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(
        mut self,
        handler: impl FnMut(&mut WidgetContext<'_>, Event<'_>) -> bool + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Insert a one-cell particle at `pos` and attach it to `field`.
    pub fn add_particle(
        tree: &mut WidgetTree,
        field: WidgetId,
        pos: impl Into<Point>,
        particle: P,
    ) -> Result<WidgetId> {
        let id = tree.insert(WidgetData::new().with_pos(pos).with_size((1, 1)), particle);
        if let Err(err) = tree.add_widget(field, id) {
            tree.destroy(id);
            return Err(err);
        }
        Ok(id)
    }
}

impl<P: Particle> Widget for ParticleField<P> {
    fn widget_type(&self) -> &'static str {
        "ParticleField"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let tree = cx.tree();
        for &child in tree.children(cx.id()) {
            let Some(data) = tree.data(child) else {
                continue;
            };
            if !data.is_visible || !data.is_enabled {
                continue;
            }
            let Some(particle) = tree.widget::<P>(child) else {
                continue;
            };
            if let Some((ch, colors)) = view.cell_mut(data.pos) {
                particle.paint_cell(data, ch, colors);
            }
        }
    }

    fn paints_children(&self) -> bool {
        true
    }

    fn dispatch_order(&self) -> DispatchOrder {
        DispatchOrder::SelfFirst
    }

    fn check_child(&self, tree: &WidgetTree, child: WidgetId) -> Result<()> {
        if tree.is_widget::<P>(child) {
            Ok(())
        } else {
            Err(Error::ChildTypeMismatch {
                container: "ParticleField",
                expected: P::KIND,
            })
        }
    }

    forward_events!();

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
