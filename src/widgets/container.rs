//! Container widget: a plain node that groups children.
//!
//! A container paints nothing of its own. Its background char and color
//! pair, when set on its [`WidgetData`](crate::tree::WidgetData), are filled
//! by the render pass like any other widget's.

use std::any::Any;

use crate::widget::traits::Widget;

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A widget with no content of its own.
///
/// # Examples
///
/// ```ignore
/// let root = tree.insert(WidgetData::new().with_size_hint(SizeHint::FULL), Container);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Widget for Container {
    fn widget_type(&self) -> &'static str {
        "Container"
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
    use crate::color::{ColorPair, BLUE, WHITE};
    use crate::geometry::{Region, Size};
    use crate::render::{render, Canvas};
    use crate::testing::snapshot::canvas_to_string;
    use crate::tree::{WidgetData, WidgetTree};

    #[test]
    fn widget_type_is_container() {
        assert_eq!(Container.widget_type(), "Container");
    }

    #[test]
    fn background_fill_comes_from_data() {
        let pair = ColorPair::from_colors(WHITE, BLUE);
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((2, 3)), Container);
        let child = tree.insert(
            WidgetData::new()
                .with_pos((1, 1))
                .with_size((1, 2))
                .with_background_char('#')
                .with_background_color_pair(pair),
            Container,
        );
        tree.add_widget(root, child).unwrap();

        let mut canvas = Canvas::new(Size::new(2, 3), '.', crate::color::WHITE_ON_BLACK);
        render(&tree, &mut canvas, Region::new(0, 0, 2, 3));
        assert_eq!(canvas_to_string(&canvas), "...\n.##");
        assert_eq!(canvas.colors_at((1, 2).into()), Some(pair));
    }
}
