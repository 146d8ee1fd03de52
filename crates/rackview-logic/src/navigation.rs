//! Keyboard navigation over the cabinet/shelf graph.
//!
//! Pure direction-step functions: shelf granularity (unmodified arrows) moves
//! cell by cell and crosses into the nearest same-grid-row cabinet at the
//! left/right edges; cabinet granularity (shift-modified arrows) jumps
//! between cabinets, scanning the raw matrix vertically from the current
//! cabinet's anchor column or walking the row horizontally.
//!
//! All lookups go through the extractor's cached output; no grid rescan
//! happens per keystroke. Cross-cabinet search stays within the same grid
//! row by design; there is no diagonal or multi-row fallback when nothing is
//! found in-row.

use crate::cabinets::{Cabinet, FloorCabinets};
use crate::floor_plan::FloorConfig;
use crate::selection::{OccupiedSet, ShelfLocation};

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavResult {
    /// A reachable target was found.
    Moved(ShelfLocation),
    /// A target was found but is occupied and occupied cells are not
    /// selectable; the step is suppressed, no alternate path is attempted.
    Blocked(ShelfLocation),
    /// No cabinet or shelf exists in that direction.
    DeadEnd,
}

impl NavResult {
    /// True when the key event should be treated as handled by the selector.
    pub fn is_handled(&self) -> bool {
        !matches!(self, NavResult::DeadEnd)
    }
}

/// Nearest cabinet in `cabinet.row` strictly to the right of `cabinet`.
fn neighbor_right<'a>(cabinets: &'a FloorCabinets, cabinet: &Cabinet) -> Option<&'a Cabinet> {
    cabinets
        .cabinets
        .iter()
        .filter(|c| c.row == cabinet.row && c.min_column > cabinet.max_column)
        .min_by_key(|c| c.min_column)
}

/// Nearest cabinet in `cabinet.row` strictly to the left of `cabinet`.
fn neighbor_left<'a>(cabinets: &'a FloorCabinets, cabinet: &Cabinet) -> Option<&'a Cabinet> {
    cabinets
        .cabinets
        .iter()
        .filter(|c| c.row == cabinet.row && c.max_column < cabinet.min_column)
        .max_by_key(|c| c.max_column)
}

/// One shelf-granularity step.
///
/// Up/Down move within the current cabinet's shelf rows only (no
/// cross-cabinet vertical movement at shelf granularity). Left/Right move
/// within the cabinet's columns, or cross into the nearest cabinet in the
/// same grid row, entering at the matching shelf row (clamped) and the edge
/// column nearest the crossed gap.
pub fn shelf_step(
    current: &ShelfLocation,
    direction: NavDirection,
    cabinets: &FloorCabinets,
) -> Option<ShelfLocation> {
    let cabinet = cabinets.by_id(current.cabinet_id)?;

    match direction {
        NavDirection::Up => {
            if current.cabinet_row + 1 < cabinet.rows {
                Some(ShelfLocation {
                    cabinet_row: current.cabinet_row + 1,
                    ..*current
                })
            } else {
                None
            }
        }
        NavDirection::Down => {
            if current.cabinet_row > 0 {
                Some(ShelfLocation {
                    cabinet_row: current.cabinet_row - 1,
                    ..*current
                })
            } else {
                None
            }
        }
        NavDirection::Right => {
            if current.cabinet_column + 1 < cabinet.width {
                Some(ShelfLocation {
                    cabinet_column: current.cabinet_column + 1,
                    ..*current
                })
            } else {
                neighbor_right(cabinets, cabinet).map(|next| ShelfLocation {
                    floor: current.floor,
                    cabinet_id: next.id,
                    cabinet_row: current.cabinet_row.min(next.rows - 1),
                    cabinet_column: 0,
                })
            }
        }
        NavDirection::Left => {
            if current.cabinet_column > 0 {
                Some(ShelfLocation {
                    cabinet_column: current.cabinet_column - 1,
                    ..*current
                })
            } else {
                neighbor_left(cabinets, cabinet).map(|next| ShelfLocation {
                    floor: current.floor,
                    cabinet_id: next.id,
                    cabinet_row: current.cabinet_row.min(next.rows - 1),
                    cabinet_column: next.width - 1,
                })
            }
        }
    }
}

/// One cabinet-granularity jump (shift-modified arrows).
///
/// Up/Down scan the raw matrix from the current cabinet's anchor (middle)
/// column for the nearest grid row above/below containing a nonzero cell,
/// then resolve the cabinet occupying it, landing on its middle shelf row
/// and column. Left/Right jump to the nearest cabinet boundary along the
/// same grid row, keeping the current shelf row clamped to the target.
pub fn cabinet_step(
    current: &ShelfLocation,
    direction: NavDirection,
    cabinets: &FloorCabinets,
    floor: &FloorConfig,
) -> Option<ShelfLocation> {
    let cabinet = cabinets.by_id(current.cabinet_id)?;
    let anchor = cabinet.mid_column();

    let target = match direction {
        NavDirection::Up => (0..cabinet.row)
            .rev()
            .find(|&r| floor.cell(r, anchor) != 0)
            .and_then(|r| cabinets.cabinet_at(r, anchor)),
        NavDirection::Down => (cabinet.row + 1..floor.depth())
            .find(|&r| floor.cell(r, anchor) != 0)
            .and_then(|r| cabinets.cabinet_at(r, anchor)),
        NavDirection::Right => neighbor_right(cabinets, cabinet),
        NavDirection::Left => neighbor_left(cabinets, cabinet),
    }?;

    let (row, column) = match direction {
        NavDirection::Up | NavDirection::Down => (
            (target.rows / 2).min(target.rows - 1),
            (target.width / 2).min(target.width - 1),
        ),
        NavDirection::Left | NavDirection::Right => (
            current.cabinet_row.min(target.rows - 1),
            (target.width / 2).min(target.width - 1),
        ),
    };

    Some(ShelfLocation {
        floor: current.floor,
        cabinet_id: target.id,
        cabinet_row: row,
        cabinet_column: column,
    })
}

/// Resolve a full navigation attempt, including the occupied-cell gate.
///
/// `shift` selects cabinet granularity. When the computed target is in the
/// occupied set and occupied cells are not selectable, the step is
/// suppressed ([`NavResult::Blocked`]) rather than re-routed.
pub fn navigate(
    current: &ShelfLocation,
    direction: NavDirection,
    shift: bool,
    cabinets: &FloorCabinets,
    floor: &FloorConfig,
    occupied: &OccupiedSet,
    can_select_occupied: bool,
) -> NavResult {
    let next = if shift {
        cabinet_step(current, direction, cabinets, floor)
    } else {
        shelf_step(current, direction, cabinets)
    };

    match next {
        None => NavResult::DeadEnd,
        Some(loc) if !can_select_occupied && occupied.contains(&loc) => NavResult::Blocked(loc),
        Some(loc) => NavResult::Moved(loc),
    }
}
