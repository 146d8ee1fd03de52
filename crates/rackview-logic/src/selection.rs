//! Selection state machine.
//!
//! Holds the current and previous shelf selection, derives the convenience
//! bounds (max cabinet id / row / column) from the extracted cabinets, and
//! reconciles selections pushed in by the host application against the user's
//! own interactions.
//!
//! Echo suppression uses a monotonically increasing sequence number instead
//! of a wall-clock cooldown: every applied selection bumps the sequence, and
//! the emitted [`ResolvedLocation`] carries it. A host-driven update must
//! quote the last sequence it observed; updates that are identity-equal to
//! the current selection, or that quote a stale sequence (an echo of an
//! interaction the host has not caught up with), are dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cabinets::FloorCabinets;

/// Full address of one shelf cell. Identity is all four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShelfLocation {
    pub floor: usize,
    pub cabinet_id: u32,
    pub cabinet_row: u32,
    pub cabinet_column: u32,
}

/// A selection enriched with the bounds derived at selection time. These are
/// recomputed on every selection, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub location: ShelfLocation,
    /// Highest cabinet id on the selected floor.
    pub max_cabinet_id: u32,
    /// Highest shelf row in the selected cabinet.
    pub max_row: u32,
    /// Highest shelf column in the selected cabinet.
    pub max_column: u32,
    /// Sequence number of this selection; hosts round-trip it to have their
    /// own updates accepted.
    pub sequence: u64,
}

/// Who initiated a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Direct user interaction inside the selector (click or keyboard).
    Internal,
    /// Pushed in by the host application.
    External,
}

/// Outcome of an applied selection, handed to the camera layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionUpdate {
    pub resolved: ResolvedLocation,
    pub source: SelectionSource,
    /// True when the selection crossed a cabinet boundary (or is the first
    /// selection): decides cabinet-zoom vs shelf-zoom framing.
    pub cabinet_changed: bool,
}

/// Locations that currently hold stock. Compared structurally on all four
/// identity fields.
#[derive(Debug, Clone, Default)]
pub struct OccupiedSet {
    locations: HashSet<ShelfLocation>,
}

impl OccupiedSet {
    pub fn from_locations(locations: &[ShelfLocation]) -> Self {
        Self {
            locations: locations.iter().copied().collect(),
        }
    }

    pub fn contains(&self, loc: &ShelfLocation) -> bool {
        self.locations.contains(loc)
    }

    pub fn insert(&mut self, loc: ShelfLocation) {
        self.locations.insert(loc);
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShelfLocation> {
        self.locations.iter()
    }
}

/// Current/previous selection plus the sequence counter. Selection is sticky:
/// once made it is only ever replaced, never cleared.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<ShelfLocation>,
    previous: Option<ShelfLocation>,
    sequence: u64,
}

impl SelectionState {
    pub fn current(&self) -> Option<ShelfLocation> {
        self.current
    }

    pub fn previous(&self) -> Option<ShelfLocation> {
        self.previous
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Apply a selection. Returns `None` when the location does not resolve
    /// against the floor's cabinets (unknown cabinet id, out-of-range cell);
    /// invalid addresses degrade to a no-op rather than an error.
    pub fn select(
        &mut self,
        location: ShelfLocation,
        source: SelectionSource,
        cabinets: &FloorCabinets,
    ) -> Option<SelectionUpdate> {
        let cabinet = cabinets.by_id(location.cabinet_id)?;
        if location.cabinet_row >= cabinet.rows || location.cabinet_column >= cabinet.width {
            return None;
        }

        let cabinet_changed = match self.current {
            None => true,
            Some(prev) => {
                prev.floor != location.floor || prev.cabinet_id != location.cabinet_id
            }
        };

        self.previous = self.current;
        self.current = Some(location);
        self.sequence += 1;

        Some(SelectionUpdate {
            resolved: ResolvedLocation {
                location,
                max_cabinet_id: cabinets.max_id(),
                max_row: cabinet.rows.saturating_sub(1),
                max_column: cabinet.width.saturating_sub(1),
                sequence: self.sequence,
            },
            source,
            cabinet_changed,
        })
    }

    /// Reconcile a host-driven selection.
    ///
    /// Applied only if the location differs from the current selection on any
    /// identity field AND `observed_sequence` is current (the host has seen
    /// the latest internal selection). A stale sequence means the update was
    /// issued before the user's own interaction landed; dropping it keeps the
    /// external echo from re-triggering camera framing or overriding an
    /// in-flight interaction.
    pub fn apply_external(
        &mut self,
        location: ShelfLocation,
        observed_sequence: u64,
        cabinets: &FloorCabinets,
    ) -> Option<SelectionUpdate> {
        if self.current == Some(location) {
            return None;
        }
        if observed_sequence < self.sequence {
            return None;
        }
        self.select(location, SelectionSource::External, cabinets)
    }
}
