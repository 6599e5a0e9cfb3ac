use crate::geometry::{Point, Rect, Segment, Size};

use super::scene::TextOp;

/// Drawing backend: one method per primitive a scene can emit.
pub trait Surface {
    fn clear(&mut self, size: Size);
    fn stroke_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);
    fn line(&mut self, segment: Segment);
    fn fill_polygon(&mut self, points: &[Point]);
    fn text(&mut self, text: &TextOp);
}
