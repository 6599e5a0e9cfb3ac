use serde::Serialize;

/// Integer size of a drawing surface, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_straddles_center() {
        let rect = Rect::centered(Point::new(10.0, 20.0), 4.0, 8.0);
        assert_eq!(rect, Rect::new(8.0, 16.0, 4.0, 8.0));
        assert_eq!(rect.center(), Point::new(10.0, 20.0));
        assert_eq!(rect.right(), 12.0);
        assert_eq!(rect.bottom(), 24.0);
    }

    #[test]
    fn contains_includes_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(Point::new(10.0, 15.0)));
        assert!(rect.contains(rect.center()));
        assert!(!rect.contains(Point::new(30.5, 12.0)));
        assert!(!rect.contains(Point::new(15.0, 9.0)));
    }

    #[test]
    fn segment_length_is_euclidean() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(segment.length(), 5.0);
    }
}
