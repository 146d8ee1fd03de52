//! Keyboard input handling for the rackview viewer.
//!
//! Arrow keys step the selection at shelf granularity, shift-arrows jump
//! between cabinets, digit and PageUp/PageDown keys switch floors, and WASD
//! pans the camera freely.

use bevy::prelude::*;
use bevy::window::RequestRedraw;
use rackview_logic::navigation::{navigate, NavDirection, NavResult};
use rackview_logic::selection::SelectionSource;

use crate::camera::{frame_floor, free_move_velocity};
use crate::state::{
    ExternalSelection, RigState, SelectionChanged, SelectorState, WarehouseState,
};

const FREE_MOVE_SPEED: f32 = 12.0;

/// Arrow-key navigation over the shelf graph. A blocked step (occupied
/// target with selection of occupied shelves disabled) consumes the key
/// without moving; a dead end does nothing.
pub fn keyboard_navigation(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut warehouse: ResMut<WarehouseState>,
    mut selector: ResMut<SelectorState>,
    mut changed: EventWriter<SelectionChanged>,
) {
    let direction = if keyboard.just_pressed(KeyCode::ArrowUp) {
        NavDirection::Up
    } else if keyboard.just_pressed(KeyCode::ArrowDown) {
        NavDirection::Down
    } else if keyboard.just_pressed(KeyCode::ArrowLeft) {
        NavDirection::Left
    } else if keyboard.just_pressed(KeyCode::ArrowRight) {
        NavDirection::Right
    } else {
        return;
    };
    let shift =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    let Some(current) = selector.selection.current() else {
        // Nothing selected yet: land on the first cabinet of the viewed floor.
        let floor_index = warehouse.current_floor;
        let WarehouseState { layout, cache, .. } = &mut *warehouse;
        let cabinets = cache.get(&layout.floors, floor_index);
        let Some(first) = cabinets.cabinets.first() else {
            return;
        };
        let location = rackview_logic::selection::ShelfLocation {
            floor: floor_index,
            cabinet_id: first.id,
            cabinet_row: 0,
            cabinet_column: 0,
        };
        if let Some(update) =
            selector
                .selection
                .select(location, SelectionSource::Internal, &cabinets)
        {
            changed.send(SelectionChanged(update));
        }
        return;
    };

    let WarehouseState { layout, cache, .. } = &mut *warehouse;
    let cabinets = cache.get(&layout.floors, current.floor);
    let Some(floor) = layout.floors.get(current.floor) else {
        return;
    };

    let result = navigate(
        &current,
        direction,
        shift,
        &cabinets,
        floor,
        &selector.occupied,
        selector.settings.can_select_occupied,
    );

    match result {
        NavResult::Moved(next) => {
            if let Some(update) =
                selector
                    .selection
                    .select(next, SelectionSource::Internal, &cabinets)
            {
                changed.send(SelectionChanged(update));
            }
        }
        NavResult::Blocked(loc) => {
            debug!("navigation blocked by occupied shelf {:?}", loc);
        }
        NavResult::DeadEnd => {}
    }
}

/// Digit keys jump straight to a floor; PageUp/PageDown step through the
/// stack. Switching floors re-frames the camera at floor level.
pub fn floor_switching(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut warehouse: ResMut<WarehouseState>,
    selector: Res<SelectorState>,
    mut rig_state: ResMut<RigState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    let floor_count = warehouse.floor_count();
    let mut target = None;

    let digit_keys: &[(KeyCode, usize)] = &[
        (KeyCode::Digit1, 0),
        (KeyCode::Digit2, 1),
        (KeyCode::Digit3, 2),
        (KeyCode::Digit4, 3),
        (KeyCode::Digit5, 4),
        (KeyCode::Digit6, 5),
        (KeyCode::Digit7, 6),
        (KeyCode::Digit8, 7),
        (KeyCode::Digit9, 8),
    ];
    for &(key, floor) in digit_keys {
        if keyboard.just_pressed(key) && floor < floor_count {
            target = Some(floor);
        }
    }

    if keyboard.just_pressed(KeyCode::PageUp) && warehouse.current_floor + 1 < floor_count {
        target = Some(warehouse.current_floor + 1);
    }
    if keyboard.just_pressed(KeyCode::PageDown) && warehouse.current_floor > 0 {
        target = Some(warehouse.current_floor.saturating_sub(1));
    }

    let Some(floor) = target else { return };
    if floor == warehouse.current_floor {
        return;
    }

    warehouse.current_floor = floor;
    warehouse.rebuild_needed = true;
    if selector.settings.animate_on_floor_change {
        frame_floor(&warehouse, floor, &mut rig_state);
    }
    redraw.send(RequestRedraw);
}

/// WASD pans the camera camera-relative on the ground plane; Shift+W/S moves
/// vertically. Any active framing animation yields to direct movement.
pub fn free_move(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut rig_state: ResMut<RigState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    let shift =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    let mut dz = 0.0f32;
    if keyboard.pressed(KeyCode::KeyW) {
        if shift {
            dy += 1.0;
        } else {
            dz += 1.0;
        }
    }
    if keyboard.pressed(KeyCode::KeyS) {
        if shift {
            dy -= 1.0;
        } else {
            dz -= 1.0;
        }
    }
    if keyboard.pressed(KeyCode::KeyA) {
        dx -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        dx += 1.0;
    }
    if dx == 0.0 && dy == 0.0 && dz == 0.0 {
        return;
    }

    let velocity = free_move_velocity(&rig_state, dx, dy, dz, FREE_MOVE_SPEED);
    rig_state.0.push_velocity(velocity);
    redraw.send(RequestRedraw);
}

/// Apply host-driven selections. The selection machine drops echoes of the
/// viewer's own selections and requests issued against a stale sequence.
pub fn apply_external_selections(
    mut events: EventReader<ExternalSelection>,
    mut warehouse: ResMut<WarehouseState>,
    mut selector: ResMut<SelectorState>,
    mut changed: EventWriter<SelectionChanged>,
) {
    for request in events.read() {
        let floor_index = request.location.floor;
        let WarehouseState { layout, cache, .. } = &mut *warehouse;
        let cabinets = cache.get(&layout.floors, floor_index);

        if let Some(update) = selector.selection.apply_external(
            request.location,
            request.observed_sequence,
            &cabinets,
        ) {
            if floor_index != warehouse.current_floor {
                warehouse.current_floor = floor_index;
                warehouse.rebuild_needed = true;
            }
            changed.send(SelectionChanged(update));
        }
    }
}
