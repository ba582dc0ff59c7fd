//! Widget tree: arena storage, geometry resolution, property subscriptions.

pub mod arena;
pub mod context;
pub mod layout;
pub mod node;
pub mod observe;

pub use arena::WidgetTree;
pub use context::{PaintContext, WidgetContext};
pub use node::{WidgetData, WidgetId};
pub use observe::{Attr, Callback, SubscriptionId};
