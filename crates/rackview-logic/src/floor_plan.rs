//! Floor-plan grid model for the warehouse.
//!
//! A warehouse is a stack of floors. Each floor is a rectangular numeric
//! matrix: `matrix[row][col]` is `0` (empty aisle cell) or `N > 0`, meaning
//! the cell is occupied by a cabinet that is `N` shelf rows tall. The matrix
//! is the one de-facto data contract any layout producer must honor.

use serde::{Deserialize, Serialize};

use crate::selection::ShelfLocation;
use crate::settings::SelectorSettings;

/// Vertical gap between stacked floors, in world units.
pub const FLOOR_GAP: f32 = 0.5;

/// One floor of the warehouse: its height plus the shelving footprint grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Floor height in world units (one grid cell = one world unit).
    pub height: f32,
    /// `matrix[row][col]` = 0 (empty) or shelf-row count of the cabinet there.
    pub matrix: Vec<Vec<u8>>,
}

impl FloorConfig {
    pub fn new(height: f32, matrix: Vec<Vec<u8>>) -> Self {
        Self { height, matrix }
    }

    /// Grid width (columns). Zero for an empty matrix.
    pub fn width(&self) -> usize {
        self.matrix.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Grid depth (rows).
    pub fn depth(&self) -> usize {
        self.matrix.len()
    }

    /// Cell value with ragged-row clamping: out-of-range access reads as
    /// empty rather than panicking (malformed rows are tolerated, not fixed).
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.matrix
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    /// True if the floor has no shelving at all.
    pub fn is_empty(&self) -> bool {
        self.matrix.iter().all(|row| row.iter().all(|&v| v == 0))
    }
}

/// A complete layout as loaded from a JSON file or produced by the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseLayout {
    pub floors: Vec<FloorConfig>,
    /// Locations that hold stock; may be visually distinguished and
    /// optionally excluded from selection.
    #[serde(default)]
    pub occupied: Vec<ShelfLocation>,
    /// Selector settings and color theme shipped with the layout. Absent
    /// means the viewer's defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SelectorSettings>,
}

impl WarehouseLayout {
    /// Parse a layout from JSON text.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("layout parse error: {}", e))
    }

    /// Serialize the layout back to pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A non-fatal problem found in a layout. Layouts with issues still load;
/// a warehouse with no configured shelving is a valid state.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutIssue {
    pub floor: usize,
    pub message: String,
}

/// Check a layout for structural problems: ragged rows, non-positive floor
/// heights, occupied locations that point at nothing.
pub fn validate_layout(layout: &WarehouseLayout) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();

    for (i, floor) in layout.floors.iter().enumerate() {
        if floor.height <= 0.0 {
            issues.push(LayoutIssue {
                floor: i,
                message: format!("non-positive floor height {}", floor.height),
            });
        }
        let width = floor.width();
        for (r, row) in floor.matrix.iter().enumerate() {
            if row.len() != width {
                issues.push(LayoutIssue {
                    floor: i,
                    message: format!("row {} has length {} (expected {})", r, row.len(), width),
                });
            }
        }
    }

    for loc in &layout.occupied {
        if loc.floor >= layout.floors.len() {
            issues.push(LayoutIssue {
                floor: loc.floor,
                message: format!("occupied location references missing floor {}", loc.floor),
            });
        }
    }

    issues
}

/// Base Y of floor `index`: cumulative `(height + FLOOR_GAP)` of all floors
/// below it. Floors stack bottom-to-top.
pub fn floor_base_y(floors: &[FloorConfig], index: usize) -> f32 {
    floors
        .iter()
        .take(index)
        .map(|f| f.height + FLOOR_GAP)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_floor_layout() -> WarehouseLayout {
        WarehouseLayout {
            floors: vec![
                FloorConfig::new(3.0, vec![vec![0, 0], vec![5, 5]]),
                FloorConfig::new(2.0, vec![vec![7, 0], vec![0, 0]]),
            ],
            occupied: vec![],
            settings: None,
        }
    }

    #[test]
    fn test_dimensions() {
        let layout = two_floor_layout();
        assert_eq!(layout.floors[0].width(), 2);
        assert_eq!(layout.floors[0].depth(), 2);
    }

    #[test]
    fn test_empty_matrix_dimensions() {
        let floor = FloorConfig::new(3.0, vec![]);
        assert_eq!(floor.width(), 0);
        assert_eq!(floor.depth(), 0);
        assert!(floor.is_empty());
    }

    #[test]
    fn test_cell_clamping() {
        let floor = FloorConfig::new(3.0, vec![vec![5, 5], vec![5]]); // ragged
        assert_eq!(floor.cell(0, 1), 5);
        assert_eq!(floor.cell(1, 1), 0); // past the short row
        assert_eq!(floor.cell(9, 0), 0); // past the last row
    }

    #[test]
    fn test_floor_base_y() {
        let layout = two_floor_layout();
        assert_eq!(floor_base_y(&layout.floors, 0), 0.0);
        assert!((floor_base_y(&layout.floors, 1) - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_ragged_rows() {
        let layout = WarehouseLayout {
            floors: vec![FloorConfig::new(3.0, vec![vec![5, 5], vec![5]])],
            occupied: vec![],
            settings: None,
        };
        let issues = validate_layout(&layout);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("length 1"));
    }

    #[test]
    fn test_validate_occupied_floor() {
        let mut layout = two_floor_layout();
        layout.occupied.push(ShelfLocation {
            floor: 9,
            cabinet_id: 0,
            cabinet_row: 0,
            cabinet_column: 0,
        });
        let issues = validate_layout(&layout);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("missing floor"));
    }

    #[test]
    fn test_json_round_trip() {
        let layout = two_floor_layout();
        let text = layout.to_json();
        let back = WarehouseLayout::from_json(&text).unwrap();
        assert_eq!(back.floors, layout.floors);
    }

    #[test]
    fn test_layout_settings_block() {
        let text = r##"{
            "floors": [{"height": 3.0, "matrix": [[5, 5]]}],
            "settings": {
                "can_select_occupied": false,
                "theme": {"selection": "#123456"}
            }
        }"##;
        let layout = WarehouseLayout::from_json(text).unwrap();
        let settings = layout.settings.unwrap();
        assert!(!settings.can_select_occupied);
        assert_eq!(settings.theme.selection, "#123456");
        // Unspecified fields fill from the defaults.
        assert!(settings.animate_on_shelf_change);

        // A layout without a settings block stays without one.
        let plain = two_floor_layout();
        let back = WarehouseLayout::from_json(&plain.to_json()).unwrap();
        assert!(back.settings.is_none());
    }

    #[test]
    fn test_bad_json() {
        assert!(WarehouseLayout::from_json("not json").is_err());
    }
}
