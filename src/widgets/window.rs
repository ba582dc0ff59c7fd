//! Movable, resizable window with a title bar and a content view.
//!
//! Layout inside a window of `h x w` with border `bh x bw`:
//!
//! ```text
//! rows 0..bh          border
//! row  bh..2bh        title bar, columns bw..w-bw
//! rows 2bh..h-bh      view, columns bw..w-bw
//! rows h-bh..h        border
//! ```
//!
//! Dragging the title bar moves the window, dragging the border resizes it.
//! Children added to the window land in the view.

use std::any::Any;

use unicode_width::UnicodeWidthStr;

use crate::color::{AColor, ColorPair, ColorTheme};
use crate::event::input::MouseEvent;
use crate::geometry::{Anchor, Point, PosHint, Size};
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext, WidgetData, WidgetId, WidgetTree};
use crate::widget::behaviors::{Grabbable, Resizable};
use crate::widget::traits::Widget;

use super::graphic::{composite_half_block, GraphicWidget};
use super::text::TextWidget;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A focusable window.
///
/// The border is drawn in the theme's secondary background while the window
/// is focused and in the primary background otherwise.
///
/// # Examples
///
/// ```ignore
/// let window = Window::new("Logs")
///     .with_alpha(0.8)
///     .build(&mut tree, WidgetData::new().with_size((12, 40)));
/// tree.add_widget(window, content)?; // lands in the window's view
/// ```
#[derive(Debug, Clone)]
pub struct Window {
    title: String,
    alpha: f64,
    border_size: Size,
    border_color: AColor,
    view: Option<WidgetId>,
    titlebar: Option<WidgetId>,
    label: Option<WidgetId>,
}

impl Window {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alpha: 1.0,
            border_size: Size::new(1, 2),
            border_color: AColor::opaque(ColorTheme::default().primary_bg),
            view: None,
            titlebar: None,
            label: None,
        }
    }

    /// Opacity of the border and the view, clamped to `[0, 1]`.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_border_size(mut self, border: impl Into<Size>) -> Self {
        let border = border.into();
        self.border_size = Size::new(border.height.max(0), border.width.max(0));
        self
    }

    /// Insert the window, its title bar and its view into `tree`.
    ///
    /// The window's minimum height is at least three border heights and its
    /// minimum width leaves room for the title.
    pub fn build(self, tree: &mut WidgetTree, data: WidgetData) -> WidgetId {
        let Size { height: bh, width: bw } = self.border_size;
        let title_width = self.title.width() as i32;
        let min_height = data.min_height.unwrap_or(1).max(3 * bh);
        let min_width = data.min_width.unwrap_or(1).max(title_width + 2 * bw + 2);
        let (max_height, max_width) = (data.max_height, data.max_width);
        let data = data
            .focusable(true)
            .transparent(true)
            .resizable(Resizable::new(self.border_size))
            .with_height_bounds(Some(min_height), max_height)
            .with_width_bounds(Some(min_width), max_width);

        let theme = *tree.theme();
        let alpha = self.alpha;
        let title = self.title.clone();
        let id = tree.insert(data, self);

        let view = tree.insert(
            WidgetData::new().transparent(alpha < 1.0),
            GraphicWidget::new(Size::ZERO, AColor::opaque(theme.primary_bg_light)).with_alpha(alpha),
        );
        let titlebar = tree.insert(
            WidgetData::new()
                .with_background_char(' ')
                .grabbable(Grabbable::new().disable_ptf(true)),
            TitleBar,
        );
        let label = tree.insert(
            WidgetData::new()
                .with_size((1, title_width))
                .with_pos_hint(PosHint::CENTER_X)
                .with_anchor(Anchor::TopCenter)
                .transparent(true),
            TextWidget::new((1, title_width)).with_text(&title, 0, 0),
        );
        tree.attach(titlebar, label);
        tree.attach(id, view);
        tree.attach(id, titlebar);

        tree.with_widget_mut::<Window, _>(id, |window, cx| {
            window.view = Some(view);
            window.titlebar = Some(titlebar);
            window.label = Some(label);
            window.layout(cx);
            window.update_theme(cx, &theme);
        });
        id
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn border_size(&self) -> Size {
        self.border_size
    }

    pub fn border_color(&self) -> AColor {
        self.border_color
    }

    /// The widget holding the window's content.
    pub fn view(&self) -> Option<WidgetId> {
        self.view
    }

    pub fn titlebar(&self) -> Option<WidgetId> {
        self.titlebar
    }

    fn layout(&self, cx: &mut WidgetContext<'_>) {
        let Size { height: h, width: w } = cx.size();
        let Size { height: bh, width: bw } = self.border_size;
        let inner_width = (w - 2 * bw).max(0);
        if let Some(titlebar) = self.titlebar {
            let tree = cx.tree();
            tree.set_pos(titlebar, Point::new(bh, bw));
            tree.set_size(titlebar, Size::new(bh, inner_width));
        }
        if let Some(view) = self.view {
            let tree = cx.tree();
            tree.set_pos(view, Point::new(2 * bh, bw));
            tree.set_size(view, Size::new((h - 3 * bh).max(0), inner_width));
            tree.set_visible(view, h > 3 * bh && w > 2 * bw);
        }
    }

    fn retheme(&mut self, cx: &mut WidgetContext<'_>) {
        let theme = cx.theme();
        self.update_theme(cx, &theme);
    }

    fn in_border(&self, size: Size, local: Point) -> bool {
        let Size { height: bh, width: bw } = self.border_size;
        local.y < bh || local.y >= size.height - bh || local.x < bw || local.x >= size.width - bw
    }
}

impl Widget for Window {
    fn widget_type(&self) -> &'static str {
        "Window"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let size = cx.region().size();
        let (color, alpha) = (self.border_color, self.alpha);
        view.for_each_cell(|local, ch, colors| {
            if self.in_border(size, local) {
                composite_half_block(ch, colors, color, color, alpha);
            }
        });
    }

    fn redirect_child(&self) -> Option<WidgetId> {
        self.view
    }

    fn on_size(&mut self, cx: &mut WidgetContext<'_>) {
        self.layout(cx);
    }

    fn on_focus(&mut self, cx: &mut WidgetContext<'_>) {
        self.retheme(cx);
    }

    fn on_blur(&mut self, cx: &mut WidgetContext<'_>) {
        self.retheme(cx);
    }

    fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        cx.collides_point(event.position)
    }

    fn on_double_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        cx.collides_point(event.position)
    }

    fn on_triple_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        cx.collides_point(event.position)
    }

    fn update_theme(&mut self, cx: &mut WidgetContext<'_>, theme: &ColorTheme) {
        let border = if cx.is_focused() { theme.secondary_bg } else { theme.primary_bg };
        self.border_color = AColor::opaque(border);
        let titlebar_colors = ColorPair::from_colors(theme.secondary_bg, theme.primary_bg_dark);
        let tree = cx.tree();
        if let Some(view) = self.view {
            tree.with_widget_mut::<GraphicWidget, _>(view, |g, _| {
                g.set_default_color(AColor::opaque(theme.primary_bg_light));
            });
        }
        if let Some(titlebar) = self.titlebar {
            if let Some(data) = tree.data_mut(titlebar) {
                data.background_color_pair = Some(titlebar_colors);
            }
        }
        if let Some(label) = self.label {
            tree.with_widget_mut::<TextWidget, _>(label, |t, _| {
                t.set_default_color_pair(titlebar_colors);
            });
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// TitleBar
// ---------------------------------------------------------------------------

/// Dragging the title bar moves its window.
#[derive(Debug, Clone, Copy, Default)]
struct TitleBar;

impl Widget for TitleBar {
    fn widget_type(&self) -> &'static str {
        "TitleBar"
    }

    fn grab_update(&mut self, cx: &mut WidgetContext<'_>, _event: &MouseEvent) {
        let Some(window) = cx.parent() else {
            return;
        };
        let dyx = cx.mouse_dyx();
        let tree = cx.tree();
        if let Some(pos) = tree.data(window).map(|d| d.pos) {
            tree.set_pos(window, pos + dyx);
        }
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
