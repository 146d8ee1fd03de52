//! Camera setup and control for the rackview viewer.
//!
//! The rig itself lives in `rackview-logic`; this module wires it to the Bevy
//! camera entity, requests redraws while it animates, and converts selection
//! updates into framing goals.

use bevy::prelude::*;
use bevy::window::RequestRedraw;
use rackview_logic::camera as rig;
use rackview_logic::spatial::Vec3 as RackVec3;

use crate::state::{
    MainCamera, RigState, SelectionChanged, SelectorState, WarehouseState,
};

/// One-shot entrance animation state: a short delay per attempt, a bounded
/// number of attempts, then silent abandonment.
#[derive(Resource)]
pub struct EntranceState {
    timer: f32,
    attempts: u32,
    done: bool,
}

impl Default for EntranceState {
    fn default() -> Self {
        Self {
            timer: ENTRANCE_DELAY,
            attempts: 0,
            done: false,
        }
    }
}

const ENTRANCE_DELAY: f32 = 0.2;
const ENTRANCE_ATTEMPTS: u32 = 5;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(40.0, 30.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Fly in from outside the building once on startup. The framing target only
/// exists once the layout has floors; try a few times on a short delay and
/// then give up quietly (the scene stays usable without the flourish).
pub fn entrance_animation(
    time: Res<Time>,
    mut entrance: ResMut<EntranceState>,
    warehouse: Res<WarehouseState>,
    mut rig_state: ResMut<RigState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    if entrance.done {
        return;
    }
    entrance.timer -= time.delta_secs();
    if entrance.timer > 0.0 {
        redraw.send(RequestRedraw);
        return;
    }

    if let Some(goal) = rig::entrance_goal(&warehouse.layout.floors) {
        rig_state.0.set_goal(goal.position, goal.target);
        entrance.done = true;
        redraw.send(RequestRedraw);
        return;
    }

    entrance.attempts += 1;
    if entrance.attempts >= ENTRANCE_ATTEMPTS {
        warn!("no framable building after {} attempts; skipping entrance", entrance.attempts);
        entrance.done = true;
    } else {
        entrance.timer = ENTRANCE_DELAY;
        redraw.send(RequestRedraw);
    }
}

/// Advance the rig and mirror it onto the camera transform. In reactive
/// winit mode the app only redraws on input, so an in-flight animation has
/// to keep requesting frames explicitly.
pub fn drive_camera(
    time: Res<Time>,
    mut rig_state: ResMut<RigState>,
    mut camera_q: Query<&mut Transform, With<MainCamera>>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    let moved = rig_state.0.update(time.delta_secs());
    if !moved {
        return;
    }

    if let Ok(mut transform) = camera_q.get_single_mut() {
        let pos = rig_state.0.position;
        let target = rig_state.0.target;
        transform.translation = Vec3::new(pos.x, pos.y, pos.z);
        transform.look_at(Vec3::new(target.x, target.y, target.z), Vec3::Y);
    }

    if rig_state.0.is_animating() || rig_state.0.is_coasting() {
        redraw.send(RequestRedraw);
    }
}

/// Convert applied selections into framing goals, honoring the per-level
/// animation toggles.
pub fn frame_selection(
    mut events: EventReader<SelectionChanged>,
    mut warehouse: ResMut<WarehouseState>,
    selector: Res<SelectorState>,
    mut rig_state: ResMut<RigState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    for SelectionChanged(update) in events.read() {
        let floor_index = update.resolved.location.floor;
        let WarehouseState { layout, cache, .. } = &mut *warehouse;
        let cabinets = cache.get(&layout.floors, floor_index);
        let Some(cabinet) = cabinets.by_id(update.resolved.location.cabinet_id) else {
            continue;
        };

        if let Some(goal) =
            rig::framing_for_update(update, &layout.floors, cabinet, &selector.settings)
        {
            rig_state.0.set_goal(goal.position, goal.target);
            redraw.send(RequestRedraw);
        }
    }
}

/// Frame a whole floor, preserving the current view direction.
pub fn frame_floor(
    warehouse: &WarehouseState,
    floor_index: usize,
    rig_state: &mut RigState,
) {
    let goal = rig::floor_goal(&rig_state.0, &warehouse.layout.floors, floor_index);
    rig_state.0.set_goal(goal.position, goal.target);
}

/// Camera-relative free-move velocity: `dz` along the projected forward
/// vector, `dx` along the right vector, `dy` straight up.
pub fn free_move_velocity(rig_state: &RigState, dx: f32, dy: f32, dz: f32, speed: f32) -> RackVec3 {
    let forward = rig_state.0.forward();
    let right = rig_state.0.right();
    (forward * dz + right * dx + RackVec3::new(0.0, dy, 0.0)) * speed
}
