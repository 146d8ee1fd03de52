//! Rackview Viewer - Bevy 3D shelf selector for warehouse layouts
//!
//! Loads a floor-plan layout (or generates a demo warehouse), renders the
//! cabinet stack in 3D, and lets the user select shelves by mouse or
//! keyboard. Runs in reactive winit mode: frames are only drawn on input or
//! while a camera animation is in flight.

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rackview_logic::floor_plan::{validate_layout, WarehouseLayout};
use rackview_logic::generator::{generate_layout, GeneratorConfig};
use rackview_logic::selection::OccupiedSet;

mod camera;
mod input;
mod rendering;
mod state;

use state::{
    ExternalSelection, HoverState, RigState, SelectionChanged, SelectorState, ViewerConfig,
    WarehouseState,
};

fn main() {
    let config = ViewerConfig::from_args();
    let layout = load_layout(&config);

    // Logging is not up yet this early in startup.
    for issue in validate_layout(&layout) {
        eprintln!("layout floor {}: {}", issue.floor, issue.message);
    }

    let mut selector = SelectorState::default();
    if let Some(settings) = layout.settings.clone() {
        selector.settings = settings;
    }
    selector.occupied = OccupiedSet::from_locations(&layout.occupied);
    if config.no_occupied_select {
        selector.settings.can_select_occupied = false;
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rackview - Warehouse Shelf Selector".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(MeshPickingPlugin)
        .insert_resource(WinitSettings::desktop_app())
        .insert_resource(config)
        .insert_resource(WarehouseState::new(layout))
        .insert_resource(selector)
        .insert_resource(RigState::default())
        .insert_resource(HoverState::default())
        .insert_resource(camera::EntranceState::default())
        .add_event::<SelectionChanged>()
        .add_event::<ExternalSelection>()
        .add_systems(
            Startup,
            (camera::setup_camera, rendering::setup_materials, rendering::setup_hud),
        )
        .add_systems(
            Update,
            (
                input::keyboard_navigation,
                input::floor_switching,
                input::free_move,
                input::apply_external_selections,
                camera::entrance_animation,
                camera::frame_selection,
                camera::drive_camera,
                rendering::rebuild_warehouse,
                rendering::update_shelf_materials,
                rendering::update_hud,
            )
                .chain(),
        )
        .run();
}

/// Load the layout from `--layout <path>`, falling back to the seeded demo
/// generator when no path is given or the file cannot be read.
fn load_layout(config: &ViewerConfig) -> WarehouseLayout {
    if let Some(path) = &config.layout_path {
        match std::fs::read_to_string(path) {
            Ok(text) => match WarehouseLayout::from_json(&text) {
                Ok(layout) => {
                    println!("loaded layout from {}", path);
                    return layout;
                }
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                }
            },
            Err(e) => {
                eprintln!("failed to read {}: {}", path, e);
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let layout = generate_layout(&GeneratorConfig::default(), &mut rng);
    println!(
        "generated demo warehouse (seed {}): {} floors, {} occupied shelves",
        config.seed,
        layout.floors.len(),
        layout.occupied.len()
    );
    layout
}
