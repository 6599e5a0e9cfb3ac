use serde::Serialize;

use crate::descriptor::{Descriptor, Direction, Orientation, Position};
use crate::geometry::{Point, Rect, Segment, Size};

use super::config::LayoutConfig;
use super::sizing::WireCensus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

/// Where and how a text label is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub at: Point,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl LabelAnchor {
    const fn new(at: Point, align: TextAlign, baseline: Baseline) -> Self {
        Self {
            at,
            align,
            baseline,
        }
    }
}

/// Wire name and input arrow drawn where a wire enters the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryMarker {
    pub label: LabelAnchor,
    pub arrow: [Point; 3],
}

/// One delay-line slot between a cell and its downstream neighbour. `label`
/// anchors the printed value of outgoing slot `slot`; slot 0 is printed next to
/// the cell instead, so it has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayMarker {
    pub slot: usize,
    pub rect: Rect,
    pub label: Option<LabelAnchor>,
}

/// Draw positions for one wire of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireAnchors {
    pub direction: Direction,
    /// Fixed coordinate of the wire track: y for horizontal wires, x for vertical ones.
    pub track: f64,
    pub entry: Segment,
    pub exit: Segment,
    pub incoming_label: LabelAnchor,
    pub outgoing_label: LabelAnchor,
    pub boundary: Option<BoundaryMarker>,
    pub delays: Vec<DelayMarker>,
}

#[derive(Debug, Clone)]
struct WireSlot {
    name: String,
    direction: Direction,
    delay: usize,
    lane: usize,
}

/// Descriptor-derived geometry of the whole drawing.
#[derive(Debug, Clone)]
pub struct ArrayLayout {
    config: LayoutConfig,
    census: WireCensus,
    cell: Size,
    size: Size,
    rows: usize,
    columns: usize,
    start_index: i64,
    register_names: Vec<String>,
    wires: Vec<WireSlot>,
    origin: Point,
}

impl ArrayLayout {
    pub fn new(descriptor: &Descriptor, config: LayoutConfig) -> Self {
        let census = WireCensus::of(descriptor);
        let cell = config.cell_size(descriptor);
        let size = config.preferred_size(descriptor);

        let (mut horizontal, mut vertical) = (0, 0);
        let wires = descriptor
            .wires()
            .iter()
            .map(|w| {
                let counter = match w.direction().orientation() {
                    Orientation::Horizontal => &mut horizontal,
                    Orientation::Vertical => &mut vertical,
                };
                let lane = *counter;
                *counter += 1;
                WireSlot {
                    name: w.name().to_string(),
                    direction: w.direction(),
                    delay: w.delay(),
                    lane,
                }
            })
            .collect();

        Self {
            config,
            census,
            cell,
            size,
            rows: descriptor.rows(),
            columns: descriptor.columns(),
            start_index: descriptor.start_index(),
            register_names: descriptor
                .registers()
                .iter()
                .map(|r| r.name().to_string())
                .collect(),
            wires,
            origin: Point::default(),
        }
    }

    pub fn with_default(descriptor: &Descriptor) -> Self {
        Self::new(descriptor, LayoutConfig::default())
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Centre the drawing on a canvas of `canvas` size.
    pub fn centered_in(self, canvas: Size) -> Self {
        let origin = Point::new(
            (canvas.width as f64 - self.size.width as f64) / 2.0,
            (canvas.height as f64 - self.size.height as f64) / 2.0,
        );
        self.with_origin(origin)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn census(&self) -> WireCensus {
        self.census
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cell_size(&self) -> Size {
        self.cell
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn register_names(&self) -> &[String] {
        &self.register_names
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn wire_name(&self, index: usize) -> Option<&str> {
        self.wires.get(index).map(|w| w.name.as_str())
    }

    fn hgap(&self) -> f64 {
        self.config.wires_hgap as f64
    }

    fn vgap(&self) -> f64 {
        self.config.wires_vgap as f64
    }

    /// Outline of the cell at `position`.
    pub fn cell_rect(&self, position: Position) -> Rect {
        let (hgap, vgap) = (self.hgap(), self.vgap());
        let (width, height) = (self.cell.width as f64, self.cell.height as f64);
        let column_pitch = width + (self.census.max_horizontal_delay as f64 + 1.0) * hgap;
        let row_pitch = height + (self.census.max_vertical_delay as f64 + 1.0) * vgap;
        Rect::new(
            self.origin.x + hgap + position.column as f64 * column_pitch,
            self.origin.y + vgap + position.row as f64 * row_pitch,
            width,
            height,
        )
    }

    pub fn title_anchor(&self, position: Position) -> Point {
        let rect = self.cell_rect(position);
        Point::new(
            rect.x + rect.width / 2.0,
            rect.y + self.config.cell_title_height as f64 / 2.0,
        )
    }

    /// Cell caption: one index for single-row or single-column arrays, a
    /// `row,column` pair otherwise, offset by the descriptor's start index.
    pub fn title_text(&self, position: Position) -> String {
        let start = self.start_index;
        let row = start + position.row as i64;
        let column = start + position.column as i64;
        if self.rows == 1 {
            format!("P{column}")
        } else if self.columns == 1 {
            format!("P{row}")
        } else {
            format!("P{row},{column}")
        }
    }

    /// Centre of the text row for register `index`.
    pub fn register_anchor(&self, position: Position, index: usize) -> Point {
        let rect = self.cell_rect(position);
        let register_height = self.config.register_height as f64;
        Point::new(
            rect.x + rect.width / 2.0,
            rect.y
                + self.config.cell_title_height as f64
                + (2.0 * index as f64 + 1.0) * register_height / 2.0,
        )
    }

    /// Draw positions for wire `wire_index` (descriptor order) at `position`.
    pub fn wire_anchors(&self, position: Position, wire_index: usize) -> Option<WireAnchors> {
        let slot = self.wires.get(wire_index)?;
        let rect = self.cell_rect(position);
        let (hgap, vgap) = (self.hgap(), self.vgap());
        let delay_width = self.config.delay_width as f64;
        let arrow_length = self.config.arrow_length as f64;
        let arrow_half = self.config.arrow_half_width as f64;

        let direction = slot.direction;
        let has_downstream = direction
            .downstream(position, self.rows, self.columns)
            .is_some();
        let on_boundary = direction
            .upstream(position, self.rows, self.columns)
            .is_none();

        let anchors = match direction.orientation() {
            Orientation::Horizontal => {
                let spread = (self.census.horizontal as f64 - 1.0) * vgap;
                let y = rect.y + (rect.height - spread) / 2.0 + slot.lane as f64 * vgap;
                let max_delay = self.census.max_horizontal_delay as f64;
                let exit_len = if has_downstream { max_delay } else { 1.0 } * hgap;
                let segment = (max_delay + 1.0) * hgap / (slot.delay as f64 + 1.0);
                // Sign of travel along x, and the cell edges the wire enters and leaves by.
                let (sign, entry_edge, exit_edge) = match direction {
                    Direction::LeftRight => (1.0, rect.x, rect.right()),
                    _ => (-1.0, rect.right(), rect.x),
                };
                let (in_align, out_align) = if sign > 0.0 {
                    (TextAlign::Right, TextAlign::Left)
                } else {
                    (TextAlign::Left, TextAlign::Right)
                };

                let boundary = on_boundary.then(|| {
                    let tip = Point::new(entry_edge - sign * hgap / 2.0, y);
                    BoundaryMarker {
                        label: LabelAnchor::new(
                            Point::new(entry_edge - sign * hgap, y),
                            in_align.mirrored(),
                            Baseline::Bottom,
                        ),
                        arrow: [
                            tip,
                            tip.offset(-sign * arrow_length, arrow_half),
                            tip.offset(-sign * arrow_length, 0.0),
                        ],
                    }
                });

                let delays = if has_downstream {
                    (0..slot.delay)
                        .map(|k| {
                            let center = Point::new(exit_edge + sign * (k as f64 + 1.0) * segment, y);
                            DelayMarker {
                                slot: k,
                                rect: Rect::new(
                                    center.x - delay_width / 2.0,
                                    y - delay_width,
                                    delay_width,
                                    2.0 * delay_width,
                                ),
                                label: (k > 0).then(|| {
                                    LabelAnchor::new(
                                        Point::new(
                                            exit_edge + sign * (2.0 * k as f64 + 1.0) * segment / 2.0,
                                            y,
                                        ),
                                        TextAlign::Center,
                                        Baseline::Bottom,
                                    )
                                }),
                            }
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                WireAnchors {
                    direction,
                    track: y,
                    entry: Segment::new(
                        Point::new(entry_edge - sign * hgap, y),
                        Point::new(entry_edge, y),
                    ),
                    exit: Segment::new(
                        Point::new(exit_edge, y),
                        Point::new(exit_edge + sign * exit_len, y),
                    ),
                    incoming_label: LabelAnchor::new(
                        Point::new(entry_edge, y),
                        in_align,
                        Baseline::Bottom,
                    ),
                    outgoing_label: LabelAnchor::new(
                        Point::new(exit_edge, y),
                        out_align,
                        Baseline::Bottom,
                    ),
                    boundary,
                    delays,
                }
            }
            Orientation::Vertical => {
                let spread = (self.census.vertical as f64 - 1.0) * hgap;
                let x = rect.x + (rect.width - spread) / 2.0 + slot.lane as f64 * hgap;
                let max_delay = self.census.max_vertical_delay as f64;
                let exit_len = if has_downstream { max_delay } else { 1.0 } * vgap;
                let segment = (max_delay + 1.0) * vgap / (slot.delay as f64 + 1.0);
                let (sign, entry_edge, exit_edge) = match direction {
                    Direction::TopDown => (1.0, rect.y, rect.bottom()),
                    _ => (-1.0, rect.bottom(), rect.y),
                };
                // Labels sit on the far side of the edge they annotate.
                let (in_baseline, out_baseline) = if sign > 0.0 {
                    (Baseline::Bottom, Baseline::Top)
                } else {
                    (Baseline::Top, Baseline::Bottom)
                };

                let boundary = on_boundary.then(|| {
                    let tip = Point::new(x, entry_edge - sign * vgap / 2.0);
                    BoundaryMarker {
                        label: LabelAnchor::new(
                            Point::new(x, entry_edge - sign * vgap),
                            TextAlign::Left,
                            out_baseline,
                        ),
                        arrow: [
                            tip,
                            tip.offset(-arrow_half, -sign * arrow_length),
                            tip.offset(0.0, -sign * arrow_length),
                        ],
                    }
                });

                let delays = if has_downstream {
                    (0..slot.delay)
                        .map(|k| {
                            let center = Point::new(x, exit_edge + sign * (k as f64 + 1.0) * segment);
                            DelayMarker {
                                slot: k,
                                rect: Rect::new(
                                    x - delay_width,
                                    center.y - delay_width / 2.0,
                                    2.0 * delay_width,
                                    delay_width,
                                ),
                                label: (k > 0).then(|| {
                                    LabelAnchor::new(
                                        Point::new(
                                            x,
                                            exit_edge + sign * (2.0 * k as f64 + 1.0) * segment / 2.0,
                                        ),
                                        TextAlign::Left,
                                        Baseline::Middle,
                                    )
                                }),
                            }
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                WireAnchors {
                    direction,
                    track: x,
                    entry: Segment::new(
                        Point::new(x, entry_edge - sign * vgap),
                        Point::new(x, entry_edge),
                    ),
                    exit: Segment::new(
                        Point::new(x, exit_edge),
                        Point::new(x, exit_edge + sign * exit_len),
                    ),
                    incoming_label: LabelAnchor::new(
                        Point::new(x, entry_edge),
                        TextAlign::Left,
                        in_baseline,
                    ),
                    outgoing_label: LabelAnchor::new(
                        Point::new(x, exit_edge),
                        TextAlign::Left,
                        out_baseline,
                    ),
                    boundary,
                    delays,
                }
            }
        };
        Some(anchors)
    }
}

impl TextAlign {
    fn mirrored(self) -> Self {
        match self {
            TextAlign::Left => TextAlign::Right,
            TextAlign::Center => TextAlign::Center,
            TextAlign::Right => TextAlign::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorSpec, RegisterSpec, WireSpec};

    fn layout(spec: DescriptorSpec) -> ArrayLayout {
        ArrayLayout::with_default(&spec.normalize().unwrap())
    }

    #[test]
    fn cells_are_spaced_by_delay_pitch() {
        let layout = layout(DescriptorSpec::grid(2, 3).wire(WireSpec::new("x").delay(2)));
        assert_eq!(layout.cell_rect(Position::new(0, 0)), Rect::new(50.0, 50.0, 80.0, 100.0));
        // column pitch 80 + 3*50, row pitch 100 + 1*50
        assert_eq!(layout.cell_rect(Position::new(1, 2)), Rect::new(510.0, 200.0, 80.0, 100.0));
    }

    #[test]
    fn centering_offsets_every_anchor() {
        let base = layout(DescriptorSpec::grid(1, 1));
        let size = base.size();
        let centered = base.clone().centered_in(Size::new(size.width + 100, size.height + 40));
        assert_eq!(centered.origin(), Point::new(50.0, 20.0));
        let a = base.cell_rect(Position::new(0, 0));
        let b = centered.cell_rect(Position::new(0, 0));
        assert_eq!((b.x - a.x, b.y - a.y), (50.0, 20.0));
    }

    #[test]
    fn titles_follow_grid_shape() {
        let row = layout(DescriptorSpec::grid(1, 4).start_index(1));
        assert_eq!(row.title_text(Position::new(0, 2)), "P3");
        let column = layout(DescriptorSpec::grid(3, 1));
        assert_eq!(column.title_text(Position::new(2, 0)), "P2");
        let grid = layout(DescriptorSpec::grid(2, 2));
        assert_eq!(grid.title_text(Position::new(1, 0)), "P1,0");
    }

    #[test]
    fn register_rows_stack_under_title() {
        let layout = layout(
            DescriptorSpec::grid(1, 1)
                .register(RegisterSpec::new("a"))
                .register(RegisterSpec::new("b")),
        );
        assert_eq!(layout.title_anchor(Position::new(0, 0)), Point::new(90.0, 70.0));
        assert_eq!(layout.register_anchor(Position::new(0, 0), 0), Point::new(90.0, 100.0));
        assert_eq!(layout.register_anchor(Position::new(0, 0), 1), Point::new(90.0, 120.0));
    }

    #[test]
    fn left_right_wire_enters_left_and_leaves_right() {
        let layout = layout(DescriptorSpec::grid(1, 2).wire(WireSpec::new("x").delay(2)));
        let first = layout.wire_anchors(Position::new(0, 0), 0).unwrap();
        let rect = layout.cell_rect(Position::new(0, 0));
        let y = rect.y + rect.height / 2.0;

        assert_eq!(first.track, y);
        assert_eq!(first.entry, Segment::new(Point::new(rect.x - 50.0, y), Point::new(rect.x, y)));
        assert_eq!(first.exit.from, Point::new(rect.right(), y));
        assert_eq!(first.exit.to, Point::new(rect.right() + 100.0, y));
        let boundary = first.boundary.as_ref().unwrap();
        assert_eq!(boundary.label.align, TextAlign::Left);
        assert_eq!(boundary.arrow[0], Point::new(rect.x - 25.0, y));
        assert_eq!(boundary.arrow[1], Point::new(rect.x - 40.0, y + 10.0));

        // segment = 3*50 / 3 = 50
        assert_eq!(first.delays.len(), 2);
        assert_eq!(first.delays[0].rect, Rect::new(rect.right() + 45.0, y - 10.0, 10.0, 20.0));
        assert!(first.delays[0].label.is_none());
        assert_eq!(
            first.delays[1].label.unwrap().at,
            Point::new(rect.right() + 75.0, y)
        );

        let last = layout.wire_anchors(Position::new(0, 1), 0).unwrap();
        let rect = layout.cell_rect(Position::new(0, 1));
        assert!(last.boundary.is_none());
        assert!(last.delays.is_empty());
        assert_eq!(last.exit.to, Point::new(rect.right() + 50.0, y));
    }

    #[test]
    fn wire_gap_between_cells_is_closed() {
        let layout = layout(DescriptorSpec::grid(1, 2).wire(WireSpec::new("x").delay(2)));
        let first = layout.wire_anchors(Position::new(0, 0), 0).unwrap();
        let second = layout.wire_anchors(Position::new(0, 1), 0).unwrap();
        assert_eq!(first.exit.to, second.entry.from);
    }

    #[test]
    fn right_left_wire_mirrors() {
        let layout = layout(
            DescriptorSpec::grid(1, 2).wire(WireSpec::new("y").direction(Direction::RightLeft)),
        );
        let last = layout.wire_anchors(Position::new(0, 1), 0).unwrap();
        let rect = layout.cell_rect(Position::new(0, 1));
        let y = last.track;
        assert!(last.boundary.is_some());
        assert_eq!(last.entry.to, Point::new(rect.right(), y));
        assert_eq!(last.outgoing_label.align, TextAlign::Right);
        assert_eq!(last.delays.len(), 1);
        assert_eq!(last.delays[0].rect.center().x, rect.x - 50.0);

        let first = layout.wire_anchors(Position::new(0, 0), 0).unwrap();
        assert!(first.boundary.is_none());
        assert!(first.delays.is_empty());
        assert_eq!(first.exit.to.x, layout.cell_rect(Position::new(0, 0)).x - 50.0);
        assert_eq!(last.exit.to, first.entry.from);
    }

    #[test]
    fn vertical_wires_spread_across_cell_width() {
        let layout = layout(
            DescriptorSpec::grid(2, 1)
                .wire(WireSpec::new("u").direction(Direction::TopDown))
                .wire(WireSpec::new("v").direction(Direction::BottomUp)),
        );
        let rect = layout.cell_rect(Position::new(0, 0));
        let cell = layout.cell_size();
        assert_eq!(cell, Size::new(80, 100));
        let u = layout.wire_anchors(Position::new(0, 0), 0).unwrap();
        let v = layout.wire_anchors(Position::new(0, 0), 1).unwrap();
        assert_eq!(u.track, rect.x + (80.0 - 50.0) / 2.0);
        assert_eq!(v.track, u.track + 50.0);

        assert!(u.boundary.is_some());
        assert_eq!(u.incoming_label.baseline, Baseline::Bottom);
        assert_eq!(u.delays.len(), 1);
        assert!(v.boundary.is_none());
        assert_eq!(v.exit.to.y, rect.y - 50.0);

        let bottom = layout.wire_anchors(Position::new(1, 0), 1).unwrap();
        let rect = layout.cell_rect(Position::new(1, 0));
        assert!(bottom.boundary.is_some());
        assert_eq!(bottom.entry.from.y, rect.bottom() + 50.0);
        assert_eq!(bottom.delays[0].rect.center().y, rect.y - 50.0);
    }

    #[test]
    fn parallel_tracks_use_the_cross_axis_gap() {
        let descriptor = DescriptorSpec::grid(1, 1)
            .wire(WireSpec::new("h1"))
            .wire(WireSpec::new("h2"))
            .wire(WireSpec::new("v1").direction(Direction::TopDown))
            .wire(WireSpec::new("v2").direction(Direction::TopDown))
            .normalize()
            .unwrap();
        let config = LayoutConfig {
            wires_hgap: 30,
            wires_vgap: 50,
            ..LayoutConfig::default()
        };
        let layout = ArrayLayout::new(&descriptor, config);
        let origin = Position::new(0, 0);
        let rect = layout.cell_rect(origin);
        assert_eq!(rect, Rect::new(30.0, 50.0, 80.0, 100.0));

        // horizontal tracks stack along y, spaced by the vertical gap
        let h1 = layout.wire_anchors(origin, 0).unwrap();
        let h2 = layout.wire_anchors(origin, 1).unwrap();
        assert_eq!(h1.track, rect.y + 25.0);
        assert_eq!(h2.track - h1.track, 50.0);
        assert_eq!(h1.entry.length(), 30.0);

        // vertical tracks stack along x, spaced by the horizontal gap
        let v1 = layout.wire_anchors(origin, 2).unwrap();
        let v2 = layout.wire_anchors(origin, 3).unwrap();
        assert_eq!(v1.track, rect.x + 25.0);
        assert_eq!(v2.track - v1.track, 30.0);
        assert_eq!(v1.entry.length(), 50.0);
    }

    #[test]
    fn unknown_wire_index_has_no_anchors() {
        let layout = layout(DescriptorSpec::grid(1, 1));
        assert!(layout.wire_anchors(Position::new(0, 0), 0).is_none());
    }
}
