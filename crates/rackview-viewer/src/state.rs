//! State management for the rackview viewer.
//!
//! Contains resource types, Bevy components, and events used throughout the
//! viewer.

use bevy::prelude::*;
use rackview_logic::cabinets::CabinetCache;
use rackview_logic::camera::CameraRig;
use rackview_logic::floor_plan::WarehouseLayout;
use rackview_logic::selection::{OccupiedSet, SelectionState, SelectionUpdate, ShelfLocation};
use rackview_logic::settings::SelectorSettings;
use rackview_logic::spatial::Vec3 as RackVec3;

// ============================================================================
// RESOURCES
// ============================================================================

#[derive(Resource)]
pub struct ViewerConfig {
    /// Path to a layout JSON file. `None` generates a demo warehouse.
    pub layout_path: Option<String>,
    /// Seed for the demo generator when no layout file is given.
    pub seed: u64,
    /// Disallow selecting shelves that hold stock.
    pub no_occupied_select: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout_path: None,
            seed: 42,
            no_occupied_select: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--layout" | "-l" if i + 1 < args.len() => {
                    config.layout_path = Some(args[i + 1].clone());
                    i += 2;
                }
                "--seed" if i + 1 < args.len() => {
                    config.seed = args[i + 1].parse().unwrap_or(config.seed);
                    i += 2;
                }
                "--no-occupied-select" => {
                    config.no_occupied_select = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        config
    }
}

/// The loaded layout plus the extraction cache and floor view state.
#[derive(Resource)]
pub struct WarehouseState {
    pub layout: WarehouseLayout,
    pub cache: CabinetCache,
    pub current_floor: usize,
    pub prev_floor: usize,
    pub rebuild_needed: bool,
}

impl WarehouseState {
    pub fn new(layout: WarehouseLayout) -> Self {
        Self {
            layout,
            cache: CabinetCache::default(),
            current_floor: 0,
            prev_floor: usize::MAX, // force initial rebuild
            rebuild_needed: true,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.layout.floors.len()
    }
}

/// Selection machine, behavior settings, and the occupied-shelf set.
#[derive(Resource, Default)]
pub struct SelectorState {
    pub selection: SelectionState,
    pub settings: SelectorSettings,
    pub occupied: OccupiedSet,
}

/// The camera rig driven by framing goals and free movement.
#[derive(Resource)]
pub struct RigState(pub CameraRig);

impl Default for RigState {
    fn default() -> Self {
        Self(CameraRig::new(
            RackVec3::new(40.0, 30.0, 40.0),
            RackVec3::ZERO,
        ))
    }
}

/// Shelf currently under the cursor, if any.
#[derive(Resource, Default)]
pub struct HoverState(pub Option<ShelfLocation>);

// ============================================================================
// EVENTS
// ============================================================================

/// Emitted whenever a selection is applied, from any source. Rendering and
/// camera framing both consume this.
#[derive(Event)]
pub struct SelectionChanged(pub SelectionUpdate);

/// A host-driven selection, carrying the sequence the host last observed.
/// Stale or identity-equal requests are dropped by the selection machine.
#[derive(Event)]
pub struct ExternalSelection {
    pub location: ShelfLocation,
    pub observed_sequence: u64,
}

// ============================================================================
// BEVY COMPONENTS
// ============================================================================

/// One pickable shelf cell.
#[derive(Component)]
pub struct ShelfCell {
    pub location: ShelfLocation,
}

/// A cabinet body mesh.
#[derive(Component)]
pub struct CabinetBody {
    pub floor: usize,
    pub cabinet_id: u32,
}

/// A floor slab mesh.
#[derive(Component)]
pub struct FloorSlab {
    pub floor: usize,
}

/// Marker for everything rebuilt when the layout or floor view changes.
#[derive(Component)]
pub struct WarehouseEntity;

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct HudText;
