//! Cabinet extraction from floor matrices.
//!
//! A cabinet is a maximal horizontally-connected run of equal-valued nonzero
//! cells in ONE grid row. Vertically adjacent runs with the same value are
//! distinct cabinets; each physical grid row of shelving is its own storage
//! unit. Ids are assigned in row-major scan order and are only stable for a
//! fixed matrix content.
//!
//! Extraction results are memoized in a bounded cache keyed by floor index
//! plus a hash of the matrix content, so repeated lookups within a session
//! return identical `Cabinet` lists (same ids) without rescanning.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::floor_plan::FloorConfig;

/// One storage unit: a horizontal run of equal-valued cells in a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabinet {
    /// Scan-order id, unique per floor. Not stable across matrix edits.
    pub id: u32,
    /// Number of shelf rows (the cell value).
    pub rows: u32,
    /// Number of shelf columns (`max_column - min_column + 1`).
    pub width: u32,
    /// Grid row this cabinet occupies.
    pub row: usize,
    pub min_column: usize,
    pub max_column: usize,
}

impl Cabinet {
    /// Middle grid column, used as the anchor for vertical cabinet jumps.
    pub fn mid_column(&self) -> usize {
        (self.min_column + self.max_column) / 2
    }

    /// True if the cabinet's column extent contains `col`.
    pub fn spans_column(&self, col: usize) -> bool {
        col >= self.min_column && col <= self.max_column
    }
}

/// Extraction result for one floor: the cabinet list plus a cell lookup grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorCabinets {
    pub cabinets: Vec<Cabinet>,
    /// `cell_ids[row][col]` = cabinet id occupying that cell, if any.
    cell_ids: Vec<Vec<Option<u32>>>,
}

impl FloorCabinets {
    /// Cabinet occupying grid cell `(row, col)`, if any.
    pub fn cabinet_at(&self, row: usize, col: usize) -> Option<&Cabinet> {
        let id = *self.cell_ids.get(row)?.get(col)?;
        id.and_then(|id| self.cabinets.get(id as usize))
    }

    pub fn by_id(&self, id: u32) -> Option<&Cabinet> {
        self.cabinets.get(id as usize)
    }

    /// Highest cabinet id on this floor, or 0 when there are none.
    pub fn max_id(&self) -> u32 {
        self.cabinets.len().saturating_sub(1) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.cabinets.is_empty()
    }
}

/// Scan one floor matrix and extract its cabinets.
///
/// Cells are visited row-major. An unvisited nonzero cell starts a
/// breadth-first search that extends only left/right while the neighbor holds
/// the same value, tracking the min/max column reached. An empty or all-zero
/// matrix yields an empty result rather than an error.
pub fn extract_cabinets(floor: &FloorConfig) -> FloorCabinets {
    let depth = floor.depth();
    let mut cell_ids: Vec<Vec<Option<u32>>> = floor
        .matrix
        .iter()
        .map(|row| vec![None; row.len()])
        .collect();
    let mut cabinets = Vec::new();
    let mut next_id = 0u32;

    for row in 0..depth {
        let row_len = floor.matrix[row].len();
        for col in 0..row_len {
            let value = floor.matrix[row][col];
            if value == 0 || cell_ids[row][col].is_some() {
                continue;
            }

            let mut min_column = col;
            let mut max_column = col;
            let mut queue = VecDeque::new();
            cell_ids[row][col] = Some(next_id);
            queue.push_back(col);

            while let Some(c) = queue.pop_front() {
                let mut neighbors = Vec::with_capacity(2);
                if c > 0 {
                    neighbors.push(c - 1);
                }
                if c + 1 < row_len {
                    neighbors.push(c + 1);
                }
                for n in neighbors {
                    if floor.matrix[row][n] == value && cell_ids[row][n].is_none() {
                        cell_ids[row][n] = Some(next_id);
                        min_column = min_column.min(n);
                        max_column = max_column.max(n);
                        queue.push_back(n);
                    }
                }
            }

            cabinets.push(Cabinet {
                id: next_id,
                rows: value as u32,
                width: (max_column - min_column + 1) as u32,
                row,
                min_column,
                max_column,
            });
            next_id += 1;
        }
    }

    FloorCabinets { cabinets, cell_ids }
}

fn matrix_hash(floor: &FloorConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    floor.matrix.hash(&mut hasher);
    hasher.finish()
}

/// Bounded memo cache for extraction results, keyed by floor index and matrix
/// content hash. A floor whose matrix is unchanged returns the identical
/// (shared) `FloorCabinets` on repeated calls, which is what keeps selection
/// ids continuous across re-renders.
pub struct CabinetCache {
    entries: HashMap<(usize, u64), Arc<FloorCabinets>>,
    capacity: usize,
}

impl Default for CabinetCache {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl CabinetCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Extraction result for `floors[index]`, computed at most once per
    /// matrix content. Out-of-range indices yield an empty result.
    pub fn get(&mut self, floors: &[FloorConfig], index: usize) -> Arc<FloorCabinets> {
        let Some(floor) = floors.get(index) else {
            return Arc::new(FloorCabinets {
                cabinets: Vec::new(),
                cell_ids: Vec::new(),
            });
        };

        let key = (index, matrix_hash(floor));
        if let Some(cached) = self.entries.get(&key) {
            return cached.clone();
        }

        let result = Arc::new(extract_cabinets(floor));
        if self.entries.len() >= self.capacity {
            // Evict an arbitrary entry (HashMap iteration order)
            if let Some(&evict_key) = self.entries.keys().next() {
                self.entries.remove(&evict_key);
            }
        }
        self.entries.insert(key, result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(matrix: Vec<Vec<u8>>) -> FloorConfig {
        FloorConfig::new(3.0, matrix)
    }

    #[test]
    fn test_single_cabinet() {
        let result = extract_cabinets(&floor(vec![vec![0, 0], vec![5, 5]]));
        assert_eq!(result.cabinets.len(), 1);
        let c = result.cabinets[0];
        assert_eq!(c.id, 0);
        assert_eq!(c.rows, 5);
        assert_eq!(c.width, 2);
        assert_eq!(c.min_column, 0);
        assert_eq!(c.max_column, 1);
        assert_eq!(c.row, 1);
    }

    #[test]
    fn test_two_runs_same_row() {
        let result = extract_cabinets(&floor(vec![vec![5, 5, 0, 7, 7, 7]]));
        assert_eq!(result.cabinets.len(), 2);
        assert_eq!(result.cabinets[0].rows, 5);
        assert_eq!(result.cabinets[0].width, 2);
        assert_eq!(result.cabinets[1].rows, 7);
        assert_eq!(result.cabinets[1].width, 3);
        // Non-overlap
        assert!(result.cabinets[0].max_column < result.cabinets[1].min_column);
    }

    #[test]
    fn test_vertical_runs_not_merged() {
        // Same value stacked vertically: each grid row is its own cabinet.
        let result = extract_cabinets(&floor(vec![vec![4, 4], vec![4, 4]]));
        assert_eq!(result.cabinets.len(), 2);
        assert_eq!(result.cabinets[0].row, 0);
        assert_eq!(result.cabinets[1].row, 1);
    }

    #[test]
    fn test_adjacent_different_values_split() {
        // 5 and 7 touch but are different cabinets.
        let result = extract_cabinets(&floor(vec![vec![5, 5, 7, 7]]));
        assert_eq!(result.cabinets.len(), 2);
        assert_eq!(result.cabinets[0].max_column, 1);
        assert_eq!(result.cabinets[1].min_column, 2);
    }

    #[test]
    fn test_empty_and_all_zero() {
        assert!(extract_cabinets(&floor(vec![])).is_empty());
        assert!(extract_cabinets(&floor(vec![vec![0, 0], vec![0, 0]])).is_empty());
    }

    #[test]
    fn test_ragged_rows_tolerated() {
        let result = extract_cabinets(&floor(vec![vec![5, 5, 5], vec![3]]));
        assert_eq!(result.cabinets.len(), 2);
        assert_eq!(result.cabinets[1].width, 1);
    }

    #[test]
    fn test_determinism() {
        let f = floor(vec![vec![5, 5, 0, 7], vec![0, 3, 3, 3]]);
        let a = extract_cabinets(&f);
        let b = extract_cabinets(&f);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cabinet_at_lookup() {
        let result = extract_cabinets(&floor(vec![vec![5, 5, 0, 7]]));
        assert_eq!(result.cabinet_at(0, 1).unwrap().id, 0);
        assert_eq!(result.cabinet_at(0, 3).unwrap().id, 1);
        assert!(result.cabinet_at(0, 2).is_none());
        assert!(result.cabinet_at(5, 0).is_none());
    }

    #[test]
    fn test_scan_order_ids() {
        let result = extract_cabinets(&floor(vec![vec![0, 7, 0], vec![5, 0, 5]]));
        assert_eq!(result.cabinets.len(), 3);
        assert_eq!(result.cabinets[0].row, 0); // top row scanned first
        assert_eq!(result.cabinets[1].min_column, 0);
        assert_eq!(result.cabinets[2].min_column, 2);
    }

    #[test]
    fn test_cache_returns_shared_result() {
        let floors = vec![floor(vec![vec![5, 5]])];
        let mut cache = CabinetCache::default();
        let a = cache.get(&floors, 0);
        let b = cache.get(&floors, 0);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_detects_content_change() {
        let mut floors = vec![floor(vec![vec![5, 5]])];
        let mut cache = CabinetCache::default();
        let a = cache.get(&floors, 0);
        floors[0].matrix[0][0] = 0;
        let b = cache.get(&floors, 0);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.cabinets.len(), 1);
        assert_eq!(b.cabinets[0].width, 1);
    }

    #[test]
    fn test_cache_eviction() {
        let mut cache = CabinetCache::with_capacity(2);
        let floors: Vec<FloorConfig> = (1..=3u8)
            .map(|v| floor(vec![vec![v]]))
            .collect();
        cache.get(&floors, 0);
        cache.get(&floors, 1);
        cache.get(&floors, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_out_of_range_floor() {
        let mut cache = CabinetCache::default();
        let result = cache.get(&[], 5);
        assert!(result.is_empty());
    }
}
