use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Drawing constants, in surface units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub cell_min_width: u32,
    pub cell_min_height: u32,
    pub cell_title_height: u32,
    pub register_height: u32,
    pub delay_width: u32,
    pub wires_hgap: u32,
    pub wires_vgap: u32,
    pub arrow_length: u32,
    pub arrow_half_width: u32,
    pub title_font_size: u32,
    pub register_font_size: u32,
    pub wire_name_font_size: u32,
    pub value_font_size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_min_width: 80,
            cell_min_height: 100,
            cell_title_height: 40,
            register_height: 20,
            delay_width: 10,
            wires_hgap: 50,
            wires_vgap: 50,
            arrow_length: 15,
            arrow_half_width: 10,
            title_font_size: 20,
            register_font_size: 16,
            wire_name_font_size: 16,
            value_font_size: 14,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON object; omitted keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
