//! Pure shelf-selector logic for Rackview.
//!
//! This crate contains all warehouse-addressing logic that is independent of
//! any rendering engine or runtime. Functions take plain data and return
//! results, making them unit-testable and portable between the Bevy viewer,
//! the headless harness, and any future host application.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cabinets`] | Cabinet extraction from floor matrices, with content-keyed cache |
//! | [`camera`] | Damped camera rig: framing goals, convergence, free-move velocity |
//! | [`floor_plan`] | Floor-plan grid model, layout JSON loading and validation |
//! | [`generator`] | Seeded demo warehouse generator (floors + occupied locations) |
//! | [`navigation`] | Shelf- and cabinet-granularity keyboard navigation steps |
//! | [`selection`] | Selection state machine with external-echo suppression |
//! | [`settings`] | Selector settings: animation toggles, occupancy policy, colors |
//! | [`spatial`] | Grid-to-world coordinate mapping and inverse lookups |

pub mod cabinets;
pub mod camera;
pub mod floor_plan;
pub mod generator;
pub mod navigation;
pub mod selection;
pub mod settings;
pub mod spatial;
