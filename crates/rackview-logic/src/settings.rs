//! Selector behavior and color configuration.

use serde::{Deserialize, Serialize};

/// Behavior toggles for the shelf selector. All default to permissive: every
/// shelf is selectable and every selection change animates the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// Allow selecting shelves that currently hold stock.
    pub can_select_occupied: bool,
    /// Animate the camera when the selected floor changes.
    pub animate_on_floor_change: bool,
    /// Animate the camera when the selection moves to a different cabinet.
    pub animate_on_cabinet_change: bool,
    /// Animate the camera when the selection moves within one cabinet.
    pub animate_on_shelf_change: bool,
    pub theme: ColorTheme,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            can_select_occupied: true,
            animate_on_floor_change: true,
            animate_on_cabinet_change: true,
            animate_on_shelf_change: true,
            theme: ColorTheme::default(),
        }
    }
}

/// Render colors as `#rrggbb` hex strings, so themes travel in the same JSON
/// file as the layout without dragging a color type into the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTheme {
    pub cabinet: String,
    pub shelf: String,
    pub shelf_occupied: String,
    pub selection: String,
    pub hover: String,
    pub floor_highlight: String,
    pub floor_slab: String,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            cabinet: "#6b7b8c".to_string(),
            shelf: "#c8b89a".to_string(),
            shelf_occupied: "#8c6b4f".to_string(),
            selection: "#ffd34d".to_string(),
            hover: "#9ad1ff".to_string(),
            floor_highlight: "#4da6ff".to_string(),
            floor_slab: "#3a3f44".to_string(),
        }
    }
}

/// Parse a `#rrggbb` hex string into linear `[r, g, b]` components in 0..=1.
/// Malformed strings fall back to mid grey rather than failing the render.
pub fn parse_hex_color(hex: &str) -> [f32; 3] {
    let s = hex.trim_start_matches('#');
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(16)).collect();
    if digits.len() != 6 || s.chars().count() != 6 {
        return [0.5, 0.5, 0.5];
    }
    let channel = |i: usize| (digits[i] * 16 + digits[i + 1]) as f32 / 255.0;
    [channel(0), channel(2), channel(4)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let s = SelectorSettings::default();
        assert!(s.can_select_occupied);
        assert!(s.animate_on_floor_change);
        assert!(s.animate_on_cabinet_change);
        assert!(s.animate_on_shelf_change);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: SelectorSettings =
            serde_json::from_str(r#"{"can_select_occupied": false}"#).unwrap();
        assert!(!s.can_select_occupied);
        assert!(s.animate_on_shelf_change);
        assert_eq!(s.theme.selection, "#ffd34d");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), [1.0, 0.0, 0.0]);
        assert_eq!(parse_hex_color("00ff00"), [0.0, 1.0, 0.0]);
        let b = parse_hex_color("#0000ff");
        assert_eq!(b, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_hex_color_malformed() {
        assert_eq!(parse_hex_color("nope"), [0.5, 0.5, 0.5]);
        assert_eq!(parse_hex_color("#zzzzzz"), [0.5, 0.5, 0.5]);
        assert_eq!(parse_hex_color("#ff00"), [0.5, 0.5, 0.5]);
        // Multibyte characters must hit the fallback, not a slicing panic.
        assert_eq!(parse_hex_color("aa\u{65E5}a"), [0.5, 0.5, 0.5]);
        assert_eq!(parse_hex_color("日本語カラー"), [0.5, 0.5, 0.5]);
    }
}
