//! Damped camera rig.
//!
//! An explicitly owned controller object: the viewer constructs one, feeds it
//! framing goals, and calls [`CameraRig::update`] every frame. Convergence is
//! exponential decay toward the goal (not a fixed-duration tween), so total
//! time depends on distance. Setting a new goal pre-empts the in-progress one;
//! only one goal is ever tracked.
//!
//! Framing goals come in three granularities (floor, cabinet, shelf), each
//! with its own zoom distance. Free WASD movement bypasses the goal animator
//! entirely and integrates a friction-damped velocity instead.

use crate::cabinets::Cabinet;
use crate::floor_plan::FloorConfig;
use crate::selection::{ShelfLocation, SelectionUpdate};
use crate::settings::SelectorSettings;
use crate::spatial::{self, Vec3};

/// Per-tick damping factor at the reference frame rate.
const DAMPING: f32 = 0.05;
/// Frame rate the damping factor is calibrated against.
const REFERENCE_HZ: f32 = 60.0;
/// Squared-distance threshold below which the animation is complete.
const EPSILON_SQ: f32 = 0.01;

/// Orbit radius for floor-level framing.
const FLOOR_RADIUS: f32 = 20.0;
/// Camera height above the floor's vertical center when floor-framing.
const FLOOR_HEIGHT_OFFSET: f32 = 3.0;
/// Z offset from the target for cabinet-level framing.
const CABINET_OFFSET: f32 = 8.0;
/// Z offset from the target for shelf-level framing.
const SHELF_OFFSET: f32 = 5.0;

/// Friction applied to free-move velocity each reference tick.
const FREE_MOVE_FRICTION: f32 = 0.5;
const FREE_MOVE_STOP_SQ: f32 = 1e-6;

/// A goal for the rig: where the camera should end up and what it should
/// look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGoal {
    pub position: Vec3,
    pub target: Vec3,
}

/// Camera position + orbit target, with an optional in-flight goal and a
/// friction-damped free-move velocity.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    goal: Option<CameraGoal>,
    velocity: Vec3,
}

impl CameraRig {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            goal: None,
            velocity: Vec3::ZERO,
        }
    }

    /// Set a new goal, implicitly cancelling any in-progress animation.
    pub fn set_goal(&mut self, position: Vec3, target: Vec3) {
        self.goal = Some(CameraGoal { position, target });
    }

    pub fn is_animating(&self) -> bool {
        self.goal.is_some()
    }

    /// True while free-move velocity has not decayed to rest.
    pub fn is_coasting(&self) -> bool {
        self.velocity != Vec3::ZERO
    }

    /// Advance the rig by `dt` seconds. Returns true if anything moved (the
    /// caller must request another frame in a render-on-demand loop).
    pub fn update(&mut self, dt: f32) -> bool {
        let mut moved = false;

        if let Some(goal) = self.goal {
            // Frame-rate-compensated exponential decay toward the goal.
            let t = 1.0 - (1.0 - DAMPING).powf(dt * REFERENCE_HZ);
            self.position = self.position.lerp(&goal.position, t);
            self.target = self.target.lerp(&goal.target, t);
            moved = true;

            if self.position.distance_squared(&goal.position) < EPSILON_SQ
                && self.target.distance_squared(&goal.target) < EPSILON_SQ
            {
                self.goal = None;
            }
        }

        if self.velocity != Vec3::ZERO {
            let step = self.velocity * dt;
            self.position = self.position + step;
            self.target = self.target + step;
            let friction = 1.0 - (1.0 - FREE_MOVE_FRICTION).powf(dt * REFERENCE_HZ);
            self.velocity = self.velocity * (1.0 - friction);
            if self.velocity.length_squared() < FREE_MOVE_STOP_SQ {
                self.velocity = Vec3::ZERO;
            }
            moved = true;
        }

        moved
    }

    /// Push free-move velocity (camera-relative direction already resolved by
    /// the caller). Any active framing goal is cancelled: direct movement
    /// wins over animation.
    pub fn push_velocity(&mut self, velocity: Vec3) {
        if velocity != Vec3::ZERO {
            self.goal = None;
        }
        self.velocity = velocity;
    }

    /// Camera-relative forward vector projected onto the XZ plane.
    pub fn forward(&self) -> Vec3 {
        let mut f = self.target - self.position;
        f.y = 0.0;
        f.normalize()
    }

    /// Camera-relative right vector on the XZ plane.
    pub fn right(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(-f.z, 0.0, f.x)
    }
}

/// Floor-level framing: target the floor's vertical center, preserving the
/// camera's current azimuthal direction at a fixed radius.
pub fn floor_goal(rig: &CameraRig, floors: &[FloorConfig], floor_index: usize) -> CameraGoal {
    let center_y = spatial::floor_center_y(floors, floor_index);
    let target = Vec3::new(0.0, center_y, 0.0);

    let mut dir = rig.position - rig.target;
    dir.y = 0.0;
    let dir = if dir.length_squared() < 1e-6 {
        Vec3::new(0.0, 0.0, 1.0)
    } else {
        dir.normalize()
    };

    CameraGoal {
        position: Vec3::new(
            dir.x * FLOOR_RADIUS,
            center_y + FLOOR_HEIGHT_OFFSET,
            dir.z * FLOOR_RADIUS,
        ),
        target,
    }
}

/// Cabinet-level framing: target the cabinet center, camera offset along +Z.
pub fn cabinet_goal(floors: &[FloorConfig], floor_index: usize, cabinet: &Cabinet) -> CameraGoal {
    let target = spatial::cabinet_center(floors, floor_index, cabinet);
    CameraGoal {
        position: target + Vec3::new(0.0, 0.0, CABINET_OFFSET),
        target,
    }
}

/// Shelf-level framing: target the shelf cell center, camera offset along +Z.
pub fn shelf_goal(
    floors: &[FloorConfig],
    location: &ShelfLocation,
    cabinet: &Cabinet,
) -> CameraGoal {
    let target = spatial::shelf_center(
        floors,
        location.floor,
        cabinet,
        location.cabinet_row,
        location.cabinet_column,
    );
    CameraGoal {
        position: target + Vec3::new(0.0, 0.0, SHELF_OFFSET),
        target,
    }
}

/// Entrance framing: from far outside the building toward its center, used
/// once on startup. Returns `None` for an empty warehouse (nothing to frame).
pub fn entrance_goal(floors: &[FloorConfig]) -> Option<CameraGoal> {
    if floors.is_empty() {
        return None;
    }
    let center = spatial::building_center(floors);
    Some(CameraGoal {
        position: Vec3::new(
            FLOOR_RADIUS,
            center.y + FLOOR_HEIGHT_OFFSET * 2.0,
            FLOOR_RADIUS,
        ),
        target: center,
    })
}

/// Framing decision for an applied selection: cabinet zoom when the selection
/// crossed a cabinet boundary, shelf zoom otherwise, gated by the per-level
/// animation toggles. Returns `None` when the relevant toggle is off (the
/// selection still stands; the camera just does not move).
pub fn framing_for_update(
    update: &SelectionUpdate,
    floors: &[FloorConfig],
    cabinet: &Cabinet,
    settings: &SelectorSettings,
) -> Option<CameraGoal> {
    if update.cabinet_changed {
        settings
            .animate_on_cabinet_change
            .then(|| cabinet_goal(floors, update.resolved.location.floor, cabinet))
    } else {
        settings
            .animate_on_shelf_change
            .then(|| shelf_goal(floors, &update.resolved.location, cabinet))
    }
}
