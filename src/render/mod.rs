//! Draw scenes for a snapshot.
//!
//! [`Scene::build`] turns a snapshot plus an [`ArrayLayout`](crate::layout::ArrayLayout)
//! into an ordered list of primitive draw operations. Backends implement
//! [`Surface`] to paint them; the crate itself never touches pixels.

mod scene;
mod surface;

pub use scene::{DrawOp, Scene, TextOp, format_value};
pub use surface::Surface;
