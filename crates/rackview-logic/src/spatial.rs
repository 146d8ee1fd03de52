//! Grid-to-world coordinate mapping.
//!
//! Pure functions from `(floor, cabinet, row, column)` grid addresses to 3D
//! world positions, plus the inverse cabinet-bounds lookup used for
//! round-trip addressing. One grid cell is one world unit; the warehouse is
//! centered on the world origin in X and Z, and floors stack upward in Y
//! with a fixed inter-floor gap.
//!
//! Everything here is deterministic and stateless given the floor data, so
//! camera framing behaves identically whether a selection came from user
//! interaction or from the host application.

use serde::{Deserialize, Serialize};

use crate::cabinets::Cabinet;
use crate::floor_plan::{floor_base_y, FloorConfig};

/// 3D vector. Kept engine-independent so the core never links a renderer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Linear interpolation toward `other` by factor `t`.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// World-space center of a cabinet on the given floor.
///
/// X centers the cabinet's column run on the floor's width, Y is the floor's
/// vertical midpoint (a cabinet fills its floor's height), Z centers the
/// cabinet's grid row on the floor's depth.
pub fn cabinet_center(floors: &[FloorConfig], floor_index: usize, cabinet: &Cabinet) -> Vec3 {
    let floor = &floors[floor_index];
    let floor_width = floor.width() as f32;
    let floor_depth = floor.depth() as f32;

    let x = (cabinet.min_column + cabinet.max_column) as f32 / 2.0 - floor_width / 2.0 + 0.5;
    let y = floor_base_y(floors, floor_index) + floor.height / 2.0;
    let z = cabinet.row as f32 - floor_depth / 2.0 + 0.5;
    Vec3::new(x, y, z)
}

/// World-space center of one shelf cell inside a cabinet.
///
/// The cabinet is `width` cells wide (one world unit per cell) and spans the
/// floor's height, divided evenly into `rows` shelf rows.
pub fn shelf_center(
    floors: &[FloorConfig],
    floor_index: usize,
    cabinet: &Cabinet,
    row: u32,
    column: u32,
) -> Vec3 {
    let center = cabinet_center(floors, floor_index, cabinet);
    let columns = cabinet.width as f32;
    let rows = cabinet.rows as f32;
    let cell_width = cabinet.width as f32 / columns; // one grid unit
    let cell_height = floors[floor_index].height / rows;

    let x = center.x + (column as f32 - columns / 2.0 + 0.5) * cell_width;
    let y = center.y + (row as f32 - rows / 2.0 + 0.5) * cell_height;
    Vec3::new(x, y, center.z)
}

/// World-space bounding box of a cabinet, used for cabinet-level framing and
/// inverse lookup.
pub fn cabinet_bounds(floors: &[FloorConfig], floor_index: usize, cabinet: &Cabinet) -> BoundingBox {
    let center = cabinet_center(floors, floor_index, cabinet);
    let half_width = cabinet.width as f32 / 2.0;
    let half_height = floors[floor_index].height / 2.0;
    BoundingBox::new(
        Vec3::new(center.x - half_width, center.y - half_height, center.z - 0.5),
        Vec3::new(center.x + half_width, center.y + half_height, center.z + 0.5),
    )
}

/// Find the cabinet on `floor_index` whose bounds contain `point`.
pub fn cabinet_containing(
    floors: &[FloorConfig],
    floor_index: usize,
    cabinets: &[Cabinet],
    point: &Vec3,
) -> Option<u32> {
    cabinets
        .iter()
        .find(|c| cabinet_bounds(floors, floor_index, c).contains(point))
        .map(|c| c.id)
}

/// Vertical center of a floor band (for floor-level framing).
pub fn floor_center_y(floors: &[FloorConfig], floor_index: usize) -> f32 {
    floor_base_y(floors, floor_index) + floors[floor_index].height / 2.0
}

/// Center of the whole building: origin in X/Z, vertical midpoint of the
/// floor stack. An empty floor list yields the origin (no division is
/// involved, but callers treat this as "nothing to frame").
pub fn building_center(floors: &[FloorConfig]) -> Vec3 {
    if floors.is_empty() {
        return Vec3::ZERO;
    }
    let top = floor_base_y(floors, floors.len() - 1) + floors[floors.len() - 1].height;
    Vec3::new(0.0, top / 2.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabinets::extract_cabinets;

    fn one_floor() -> Vec<FloorConfig> {
        // 4 wide, 2 deep; one two-cell cabinet in the bottom row.
        vec![FloorConfig::new(3.0, vec![vec![0, 0, 0, 0], vec![5, 5, 0, 0]])]
    }

    #[test]
    fn test_cabinet_center() {
        let floors = one_floor();
        let cabs = extract_cabinets(&floors[0]);
        let c = cabs.by_id(0).unwrap();
        let center = cabinet_center(&floors, 0, c);
        // Columns 0..=1 of a width-4 floor: midpoint 0.5, shifted to -1.0
        assert!((center.x - (-1.0)).abs() < 1e-6);
        assert!((center.y - 1.5).abs() < 1e-6);
        // Row 1 of a depth-2 floor: centered at +0.5
        assert!((center.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_center_is_symmetric() {
        // A cabinet spanning the whole floor width must be centered at x=0.
        let floors = vec![FloorConfig::new(2.0, vec![vec![3, 3, 3, 3]])];
        let cabs = extract_cabinets(&floors[0]);
        let center = cabinet_center(&floors, 0, cabs.by_id(0).unwrap());
        assert!(center.x.abs() < 1e-6);
    }

    #[test]
    fn test_shelf_center_spans_cabinet() {
        let floors = one_floor();
        let cabs = extract_cabinets(&floors[0]);
        let c = cabs.by_id(0).unwrap();
        let bounds = cabinet_bounds(&floors, 0, c);
        for row in 0..c.rows {
            for col in 0..c.width {
                let p = shelf_center(&floors, 0, c, row, col);
                assert!(bounds.contains(&p), "shelf ({row},{col}) outside bounds");
            }
        }
    }

    #[test]
    fn test_shelf_cells_are_distinct() {
        let floors = one_floor();
        let cabs = extract_cabinets(&floors[0]);
        let c = cabs.by_id(0).unwrap();
        let a = shelf_center(&floors, 0, c, 0, 0);
        let b = shelf_center(&floors, 0, c, 0, 1);
        assert!((b.x - a.x - 1.0).abs() < 1e-6); // one grid unit apart
        let top = shelf_center(&floors, 0, c, 4, 0);
        assert!(top.y > a.y);
    }

    #[test]
    fn test_second_floor_offset() {
        let mut floors = one_floor();
        floors.push(FloorConfig::new(2.0, vec![vec![0, 0, 0, 0], vec![5, 5, 0, 0]]));
        let cabs = extract_cabinets(&floors[1]);
        let center = cabinet_center(&floors, 1, cabs.by_id(0).unwrap());
        // Base Y of floor 1 is 3.0 + 0.5 gap; center adds height/2.
        assert!((center.y - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_addressing() {
        let floors = vec![FloorConfig::new(3.0, vec![
            vec![5, 5, 0, 7, 7, 7],
            vec![0, 0, 0, 0, 0, 0],
            vec![4, 0, 4, 0, 4, 0],
        ])];
        let cabs = extract_cabinets(&floors[0]);
        for c in &cabs.cabinets {
            for row in 0..c.rows {
                for col in 0..c.width {
                    let p = shelf_center(&floors, 0, c, row, col);
                    let found = cabinet_containing(&floors, 0, &cabs.cabinets, &p);
                    assert_eq!(found, Some(c.id), "cabinet {} cell ({row},{col})", c.id);
                }
            }
        }
    }

    #[test]
    fn test_building_center() {
        let floors = one_floor();
        let center = building_center(&floors);
        assert!((center.y - 1.5).abs() < 1e-6);
        assert_eq!(building_center(&[]), Vec3::ZERO);
    }

    #[test]
    fn test_floor_center_y() {
        let mut floors = one_floor();
        floors.push(FloorConfig::new(2.0, vec![vec![0]]));
        assert!((floor_center_y(&floors, 0) - 1.5).abs() < 1e-6);
        assert!((floor_center_y(&floors, 1) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-6);
    }
}
