//! Horizontal slider: a bar with a draggable handle selecting a value.

use std::any::Any;
use std::fmt;

use tracing::trace;

use crate::color::{Color, ColorPair, ColorTheme};
use crate::error::{Error, Result};
use crate::event::input::{MouseEvent, MouseEventType};
use crate::geometry::Point;
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext, WidgetData, WidgetId, WidgetTree};
use crate::widget::behaviors::Grabbable;
use crate::widget::traits::Widget;

const BAR_CHAR: char = '━';
const HANDLE_CHAR: char = '█';

type OnChange = Box<dyn FnMut(f64)>;

// ---------------------------------------------------------------------------
// Slider
// ---------------------------------------------------------------------------

/// A one-row slider over `[min, max]`.
///
/// `value = min + proportion * (max - min)`. The handle sits at column
/// `round(proportion * fill_width)` where `fill_width` is the slider width
/// minus the handle width; bar cells left of the handle use the fill color.
///
/// # Examples
///
/// ```ignore
/// let slider = Slider::new(0.0, 10.0)?
///     .with_proportion(0.5)
///     .on_change(|value| println!("{value}"))
///     .build(&mut tree, WidgetData::new().with_size((1, 20)));
/// ```
pub struct Slider {
    min: f64,
    max: f64,
    proportion: f64,
    /// Whether the proportion can change. A disabled slider ignores
    /// programmatic sets as well as the pointer, but a mouse-down on it is
    /// still consumed and grabs the handle.
    pub slider_enabled: bool,
    bar_color_pair: ColorPair,
    fill_color: Color,
    handle_color: Color,
    handle: Option<WidgetId>,
    on_change: Option<OnChange>,
}

impl fmt::Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slider")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("proportion", &self.proportion)
            .field("slider_enabled", &self.slider_enabled)
            .finish_non_exhaustive()
    }
}

impl Slider {
    /// Fails with [`Error::InvalidRange`] unless `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(Error::InvalidRange { min, max });
        }
        let theme = ColorTheme::default();
        Ok(Self {
            min,
            max,
            proportion: 0.0,
            slider_enabled: true,
            bar_color_pair: theme.primary_color_pair(),
            fill_color: theme.secondary_bg,
            handle_color: theme.primary_fg_light,
            handle: None,
            on_change: None,
        })
    }

    pub fn with_proportion(mut self, proportion: f64) -> Self {
        self.proportion = proportion.clamp(0.0, 1.0);
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_handle_color(mut self, color: Color) -> Self {
        self.handle_color = color;
        self
    }

    pub fn with_bar_color_pair(mut self, colors: ColorPair) -> Self {
        self.bar_color_pair = colors;
        self
    }

    pub fn slider_enabled(mut self, enabled: bool) -> Self {
        self.slider_enabled = enabled;
        self
    }

    /// Called with the new value whenever the proportion is set.
    pub fn on_change(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Insert the slider and its handle into `tree`.
    pub fn build(self, tree: &mut WidgetTree, data: WidgetData) -> WidgetId {
        let handle_color = self.handle_color;
        let id = tree.insert(data, self);
        let handle = tree.insert(
            WidgetData::new()
                .with_size((1, 1))
                .grabbable(Grabbable::new().disable_ptf(true)),
            Handle { color: handle_color },
        );
        tree.attach(id, handle);
        tree.with_widget_mut::<Slider, _>(id, |slider, cx| {
            slider.handle = Some(handle);
            slider.place_handle(cx);
        });
        id
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn value(&self) -> f64 {
        self.min + self.proportion * (self.max - self.min)
    }

    pub fn handle(&self) -> Option<WidgetId> {
        self.handle
    }

    /// Columns the handle can travel.
    fn fill_width(&self, tree: &WidgetTree, id: WidgetId) -> i32 {
        let width = tree.data(id).map_or(0, |d| d.size.width);
        let handle = self.handle.and_then(|h| tree.data(h)).map_or(1, |d| d.size.width);
        width - handle
    }

    fn handle_x(&self, tree: &WidgetTree, id: WidgetId) -> i32 {
        (self.proportion * self.fill_width(tree, id).max(0) as f64).round_ties_even() as i32
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Set the slider `id`'s proportion. No-op if `id` is not a slider.
    pub fn set_proportion(tree: &mut WidgetTree, id: WidgetId, proportion: f64) {
        tree.with_widget_mut::<Slider, _>(id, |slider, cx| slider.set_proportion_in(cx, proportion));
    }

    /// Set the slider `id`'s value, clamped into range.
    pub fn set_value(tree: &mut WidgetTree, id: WidgetId, value: f64) {
        tree.with_widget_mut::<Slider, _>(id, |slider, cx| {
            let proportion = (value - slider.min) / (slider.max - slider.min);
            slider.set_proportion_in(cx, proportion);
        });
    }

    /// Set the proportion from inside a hook. Ignored while the slider is
    /// disabled.
    pub fn set_proportion_in(&mut self, cx: &mut WidgetContext<'_>, proportion: f64) {
        if !self.slider_enabled {
            return;
        }
        self.proportion = proportion.clamp(0.0, 1.0);
        self.place_handle(cx);
        let value = self.value();
        trace!(slider = ?cx.id(), value, "slider value");
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value);
        }
    }

    fn place_handle(&self, cx: &mut WidgetContext<'_>) {
        let Some(handle) = self.handle else {
            return;
        };
        let x = self.handle_x(cx.tree_ref(), cx.id());
        cx.tree().set_pos(handle, Point::new(0, x));
    }

    /// Move the handle under a pointer at absolute `position`.
    fn track_pointer(&mut self, cx: &mut WidgetContext<'_>, position: Point) {
        let fill_width = self.fill_width(cx.tree_ref(), cx.id());
        if fill_width <= 0 {
            return;
        }
        let x = cx.to_local(position).x;
        self.set_proportion_in(cx, x as f64 / fill_width as f64);
    }
}

impl Widget for Slider {
    fn widget_type(&self) -> &'static str {
        "Slider"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let handle_x = self.handle_x(cx.tree(), cx.id());
        let bar = self.bar_color_pair;
        let filled = ColorPair::from_colors(self.fill_color, bar.bg);
        view.for_each_cell(|local, ch, colors| {
            *ch = BAR_CHAR;
            *colors = if local.x < handle_x { filled } else { bar };
        });
    }

    fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        if event.event_type != MouseEventType::MouseDown || !cx.collides_point(event.position) {
            return false;
        }
        self.track_pointer(cx, event.position);
        if let Some(handle) = self.handle {
            cx.tree().grab(handle, event.position);
        }
        true
    }

    fn on_size(&mut self, cx: &mut WidgetContext<'_>) {
        self.place_handle(cx);
    }

    fn update_theme(&mut self, _cx: &mut WidgetContext<'_>, theme: &ColorTheme) {
        self.bar_color_pair = theme.primary_color_pair();
        self.fill_color = theme.secondary_bg;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// The slider's grabbable handle. Dragging it sets the slider's proportion.
#[derive(Debug, Clone, Copy)]
struct Handle {
    color: Color,
}

impl Widget for Handle {
    fn widget_type(&self) -> &'static str {
        "SliderHandle"
    }

    fn paint(&self, _cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let color = self.color;
        view.for_each_cell(|_, ch, colors| {
            *ch = HANDLE_CHAR;
            colors.fg = color;
        });
    }

    fn grab_update(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) {
        let Some(slider) = cx.parent() else {
            return;
        };
        let position = event.position;
        cx.tree().with_widget_mut::<Slider, _>(slider, |slider, cx| slider.track_pointer(cx, position));
    }

    fn update_theme(&mut self, _cx: &mut WidgetContext<'_>, theme: &ColorTheme) {
        self.color = theme.primary_fg_light;
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::geometry::Size;
    use crate::widgets::Container;

    fn scene(slider: Slider) -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((3, 30)), Container);
        let id = slider.build(&mut tree, WidgetData::new().with_pos((1, 0)).with_size((1, 20)));
        tree.add_widget(root, id).unwrap();
        (tree, id)
    }

    fn handle_x(tree: &WidgetTree, id: WidgetId) -> i32 {
        let handle = tree.widget::<Slider>(id).unwrap().handle().unwrap();
        tree.data(handle).unwrap().pos.x
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(matches!(Slider::new(1.0, 1.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(Slider::new(2.0, 1.0), Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn value_follows_proportion() {
        let seen = Rc::new(Cell::new(f64::NAN));
        let slider = Slider::new(0.0, 10.0).unwrap().on_change({
            let seen = seen.clone();
            move |v| seen.set(v)
        });
        let (mut tree, id) = scene(slider);
        Slider::set_proportion(&mut tree, id, 0.5);
        assert_eq!(tree.widget::<Slider>(id).unwrap().value(), 5.0);
        assert_eq!(seen.get(), 5.0);
        assert_eq!(handle_x(&tree, id), 10);
    }

    #[test]
    fn set_value_clamps() {
        let (mut tree, id) = scene(Slider::new(-1.0, 1.0).unwrap());
        Slider::set_value(&mut tree, id, 5.0);
        assert_eq!(tree.widget::<Slider>(id).unwrap().proportion(), 1.0);
        assert_eq!(handle_x(&tree, id), 19);
    }

    #[test]
    fn click_on_bar_jumps_and_grabs_handle() {
        let (mut tree, id) = scene(Slider::new(0.0, 19.0).unwrap());
        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (1, 4)));
        assert!((tree.widget::<Slider>(id).unwrap().value() - 4.0).abs() < 1e-9);
        let handle = tree.widget::<Slider>(id).unwrap().handle().unwrap();
        assert_eq!(tree.grabbed(), Some(handle));

        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseMove, (2, 9)));
        assert!((tree.widget::<Slider>(id).unwrap().value() - 9.0).abs() < 1e-9);
        assert_eq!(handle_x(&tree, id), 9);
    }

    #[test]
    fn disabled_slider_keeps_proportion_but_grabs() {
        let (mut tree, id) = scene(Slider::new(0.0, 1.0).unwrap().slider_enabled(false));
        assert!(tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (1, 4))));
        assert_eq!(tree.widget::<Slider>(id).unwrap().proportion(), 0.0);
        let handle = tree.widget::<Slider>(id).unwrap().handle().unwrap();
        assert_eq!(tree.grabbed(), Some(handle));

        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseMove, (1, 12)));
        assert_eq!(tree.widget::<Slider>(id).unwrap().proportion(), 0.0);
        assert_eq!(handle_x(&tree, id), 0);
    }

    #[test]
    fn disabled_slider_ignores_programmatic_sets() {
        let calls = Rc::new(Cell::new(0));
        let slider = Slider::new(0.0, 10.0).unwrap().slider_enabled(false).on_change({
            let calls = calls.clone();
            move |_| calls.set(calls.get() + 1)
        });
        let (mut tree, id) = scene(slider);
        Slider::set_proportion(&mut tree, id, 0.5);
        Slider::set_value(&mut tree, id, 8.0);
        assert_eq!(tree.widget::<Slider>(id).unwrap().value(), 0.0);
        assert_eq!(calls.get(), 0);

        tree.with_widget_mut::<Slider, _>(id, |slider, _| slider.slider_enabled = true);
        Slider::set_value(&mut tree, id, 8.0);
        assert!((tree.widget::<Slider>(id).unwrap().value() - 8.0).abs() < 1e-9);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn resize_moves_handle() {
        let (mut tree, id) = scene(Slider::new(0.0, 1.0).unwrap().with_proportion(1.0));
        assert_eq!(handle_x(&tree, id), 19);
        tree.set_size(id, Size::new(1, 11));
        assert_eq!(handle_x(&tree, id), 10);
    }
}
