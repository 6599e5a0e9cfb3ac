use serde::Serialize;

use crate::descriptor::Position;
use crate::geometry::{Point, Rect, Segment, Size};
use crate::grid::SystolicArrayState;
use crate::layout::{ArrayLayout, Baseline, LabelAnchor, TextAlign};
use crate::width::estimated_extent;

use super::surface::Surface;

/// Text label placed at an anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOp {
    pub text: String,
    pub at: Point,
    pub font_size: u32,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl TextOp {
    fn anchored(text: String, anchor: LabelAnchor, font_size: u32) -> Self {
        Self {
            text,
            at: anchor.at,
            font_size,
            align: anchor.align,
            baseline: anchor.baseline,
        }
    }

    fn centered(text: String, at: Point, font_size: u32) -> Self {
        Self {
            text,
            at,
            font_size,
            align: TextAlign::Center,
            baseline: Baseline::Middle,
        }
    }

    /// Estimated width for surfaces that cannot measure text.
    pub fn approx_width(&self) -> f64 {
        estimated_extent(&self.text, self.font_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    StrokeRect { rect: Rect },
    FillRect { rect: Rect },
    Line { segment: Segment },
    FillPolygon { points: Vec<Point> },
    Text(TextOp),
}

/// Printed form of a cell value: integers without a fractional part.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Ordered draw operations for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub size: Size,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn build(state: &SystolicArrayState, layout: &ArrayLayout) -> Self {
        let config = layout.config();
        let mut ops = Vec::new();

        for cell in state.cells() {
            let position: Position = cell.position();
            ops.push(DrawOp::StrokeRect {
                rect: layout.cell_rect(position),
            });
            ops.push(DrawOp::Text(TextOp::centered(
                layout.title_text(position),
                layout.title_anchor(position),
                config.title_font_size,
            )));

            for (index, (name, value)) in layout
                .register_names()
                .iter()
                .zip(cell.registers())
                .enumerate()
            {
                ops.push(DrawOp::Text(TextOp::centered(
                    format!("{name}:{}", format_value(*value)),
                    layout.register_anchor(position, index),
                    config.register_font_size,
                )));
            }

            for (index, wire) in cell.wires().iter().enumerate() {
                let Some(anchors) = layout.wire_anchors(position, index) else {
                    continue;
                };
                ops.push(DrawOp::Line {
                    segment: anchors.entry,
                });
                ops.push(DrawOp::Line {
                    segment: anchors.exit,
                });
                if let Some(boundary) = &anchors.boundary {
                    let name = layout.wire_name(index).unwrap_or_default();
                    ops.push(DrawOp::Text(TextOp::anchored(
                        name.to_string(),
                        boundary.label,
                        config.wire_name_font_size,
                    )));
                    ops.push(DrawOp::FillPolygon {
                        points: boundary.arrow.to_vec(),
                    });
                }
                ops.push(DrawOp::Text(TextOp::anchored(
                    format_value(wire.incoming()),
                    anchors.incoming_label,
                    config.value_font_size,
                )));
                ops.push(DrawOp::Text(TextOp::anchored(
                    format_value(wire.head()),
                    anchors.outgoing_label,
                    config.value_font_size,
                )));
                for marker in &anchors.delays {
                    ops.push(DrawOp::FillRect { rect: marker.rect });
                    if let Some(label) = marker.label {
                        let value = wire.outgoing().get(marker.slot).copied().unwrap_or(0.0);
                        ops.push(DrawOp::Text(TextOp::anchored(
                            format_value(value),
                            label,
                            config.value_font_size,
                        )));
                    }
                }
            }
        }

        Self {
            size: layout.size(),
            ops,
        }
    }

    /// Scene under the default layout, anchored at the origin.
    pub fn for_state(state: &SystolicArrayState) -> Self {
        Self::build(state, &ArrayLayout::with_default(state.descriptor()))
    }

    /// Clear `surface` and replay every operation in order.
    pub fn paint(&self, surface: &mut impl Surface) {
        surface.clear(self.size);
        for op in &self.ops {
            match op {
                DrawOp::StrokeRect { rect } => surface.stroke_rect(*rect),
                DrawOp::FillRect { rect } => surface.fill_rect(*rect),
                DrawOp::Line { segment } => surface.line(*segment),
                DrawOp::FillPolygon { points } => surface.fill_polygon(points),
                DrawOp::Text(text) => surface.text(text),
            }
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(text) => Some(text),
            _ => None,
        })
    }
}
