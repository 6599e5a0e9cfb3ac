use crate::descriptor::{Descriptor, Orientation};
use crate::geometry::Size;

use super::config::LayoutConfig;

/// Wire counts and largest delays per orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireCensus {
    pub horizontal: usize,
    pub vertical: usize,
    pub max_horizontal_delay: usize,
    pub max_vertical_delay: usize,
}

impl WireCensus {
    pub fn of(descriptor: &Descriptor) -> Self {
        let mut census = Self::default();
        for wire in descriptor.wires() {
            match wire.direction().orientation() {
                Orientation::Horizontal => {
                    census.horizontal += 1;
                    census.max_horizontal_delay = census.max_horizontal_delay.max(wire.delay());
                }
                Orientation::Vertical => {
                    census.vertical += 1;
                    census.max_vertical_delay = census.max_vertical_delay.max(wire.delay());
                }
            }
        }
        census
    }
}

/// Count as `u32`, clamped at `u32::MAX`.
fn clamped(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

impl LayoutConfig {
    /// Size of one cell box: room for the title, one row per register and one
    /// track per wire. Saturates at `u32::MAX` instead of overflowing.
    pub fn cell_size(&self, descriptor: &Descriptor) -> Size {
        let census = WireCensus::of(descriptor);
        let registers = clamped(descriptor.registers().len());
        let width = self
            .cell_min_width
            .max(clamped(census.horizontal).saturating_mul(self.wires_hgap));
        let height = self
            .cell_min_height
            .max(
                self.cell_title_height
                    .saturating_add(registers.saturating_mul(self.register_height)),
            )
            .max(clamped(census.vertical).saturating_mul(self.wires_vgap));
        Size::new(width, height)
    }

    /// Size of the whole drawing, including delay-line space between cells and
    /// one gap on each outer edge for boundary wires.
    pub fn preferred_size(&self, descriptor: &Descriptor) -> Size {
        let cell = self.cell_size(descriptor);
        let census = WireCensus::of(descriptor);
        let width = span(
            clamped(descriptor.columns()),
            cell.width,
            clamped(census.max_horizontal_delay),
            self.wires_hgap,
        );
        let height = span(
            clamped(descriptor.rows()),
            cell.height,
            clamped(census.max_vertical_delay),
            self.wires_vgap,
        );
        Size::new(width, height)
    }
}

/// `count * cell + (max_delay + 1) * gap * (count - 1) + 2 * gap`, saturating.
fn span(count: u32, cell: u32, max_delay: u32, gap: u32) -> u32 {
    let cells = count.saturating_mul(cell);
    let between = max_delay
        .saturating_add(1)
        .saturating_mul(gap)
        .saturating_mul(count.saturating_sub(1));
    cells
        .saturating_add(between)
        .saturating_add(gap.saturating_mul(2))
}

/// Cell size under the default configuration.
pub fn cell_size(descriptor: &Descriptor) -> Size {
    LayoutConfig::default().cell_size(descriptor)
}

/// Canvas size under the default configuration.
pub fn preferred_size(descriptor: &Descriptor) -> Size {
    LayoutConfig::default().preferred_size(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorSpec, Direction, RegisterSpec, WireSpec};

    #[test]
    fn bare_cell_uses_minimums() {
        let descriptor = DescriptorSpec::grid(1, 1).normalize().unwrap();
        assert_eq!(cell_size(&descriptor), Size::new(80, 100));
        assert_eq!(preferred_size(&descriptor), Size::new(180, 200));
    }

    #[test]
    fn registers_and_wires_grow_the_cell() {
        let mut spec = DescriptorSpec::grid(1, 1);
        for name in ["a", "b", "c", "d", "e"] {
            spec = spec.register(RegisterSpec::new(name));
        }
        for name in ["h1", "h2"] {
            spec = spec.wire(WireSpec::new(name));
        }
        for name in ["v1", "v2", "v3"] {
            spec = spec.wire(WireSpec::new(name).direction(Direction::TopDown));
        }
        let descriptor = spec.normalize().unwrap();
        // 2 horizontal wires * 50 = 100; max(100, 40 + 5*20, 3*50) = 150
        assert_eq!(cell_size(&descriptor), Size::new(100, 150));
    }

    #[test]
    fn preferred_size_reserves_delay_space() {
        let descriptor = DescriptorSpec::grid(2, 3)
            .wire(WireSpec::new("p").delay(2))
            .wire(WireSpec::new("x"))
            .wire(WireSpec::new("u").direction(Direction::BottomUp).delay(3))
            .normalize()
            .unwrap();
        let census = WireCensus::of(&descriptor);
        assert_eq!(census.horizontal, 2);
        assert_eq!(census.vertical, 1);
        assert_eq!(census.max_horizontal_delay, 2);
        assert_eq!(census.max_vertical_delay, 3);

        let cell = cell_size(&descriptor);
        assert_eq!(cell, Size::new(100, 100));
        // width: 3*100 + 3*50*2 + 100; height: 2*100 + 4*50*1 + 100
        assert_eq!(preferred_size(&descriptor), Size::new(700, 500));
    }

    #[test]
    fn custom_config_changes_gaps() {
        let descriptor = DescriptorSpec::grid(1, 2).wire(WireSpec::new("x")).normalize().unwrap();
        let config = LayoutConfig {
            wires_hgap: 20,
            ..LayoutConfig::default()
        };
        // 2*80 + 2*20*1 + 40
        assert_eq!(config.preferred_size(&descriptor).width, 240);
    }

    #[test]
    fn huge_grids_saturate_instead_of_overflowing() {
        let wide = DescriptorSpec::grid(1, 60_000_000)
            .wire(WireSpec::new("x"))
            .normalize()
            .unwrap();
        let size = preferred_size(&wide);
        assert_eq!(size.width, u32::MAX);
        assert_eq!(size.height, 200);

        let slow = DescriptorSpec::grid(2, 2)
            .wire(WireSpec::new("x").delay(usize::MAX))
            .wire(WireSpec::new("y").direction(Direction::TopDown).delay(usize::MAX))
            .normalize()
            .unwrap();
        assert_eq!(preferred_size(&slow), Size::new(u32::MAX, u32::MAX));
        assert_eq!(cell_size(&slow), Size::new(80, 100));
    }
}
