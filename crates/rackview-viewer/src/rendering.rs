//! 3D rendering for the rackview viewer.
//!
//! Builds the warehouse scene from the layout: floor slabs for every floor,
//! solid cabinet bodies on non-viewed floors, and individually pickable shelf
//! cells on the viewed floor. Selection, hover, and occupancy are shown by
//! swapping pre-built materials.

use bevy::prelude::*;
use bevy::window::RequestRedraw;
use rackview_logic::floor_plan::floor_base_y;
use rackview_logic::selection::{SelectionSource, ShelfLocation};
use rackview_logic::settings::{parse_hex_color, ColorTheme};
use rackview_logic::spatial;

use crate::state::{
    CabinetBody, FloorSlab, HoverState, HudText, SelectionChanged, SelectorState, ShelfCell,
    WarehouseEntity, WarehouseState,
};

/// Pre-built material handles, one per visual role.
#[derive(Resource)]
pub struct MaterialSet {
    pub cabinet: Handle<StandardMaterial>,
    pub shelf: Handle<StandardMaterial>,
    pub shelf_occupied: Handle<StandardMaterial>,
    pub selection: Handle<StandardMaterial>,
    pub hover: Handle<StandardMaterial>,
    pub floor_slab: Handle<StandardMaterial>,
    pub floor_highlight: Handle<StandardMaterial>,
}

fn theme_material(theme_hex: &str) -> StandardMaterial {
    let [r, g, b] = parse_hex_color(theme_hex);
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        perceptual_roughness: 0.8,
        metallic: 0.05,
        ..default()
    }
}

pub fn setup_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    selector: Res<SelectorState>,
) {
    let theme: &ColorTheme = &selector.settings.theme;
    commands.insert_resource(MaterialSet {
        cabinet: materials.add(theme_material(&theme.cabinet)),
        shelf: materials.add(theme_material(&theme.shelf)),
        shelf_occupied: materials.add(theme_material(&theme.shelf_occupied)),
        selection: materials.add(theme_material(&theme.selection)),
        hover: materials.add(theme_material(&theme.hover)),
        floor_slab: materials.add(theme_material(&theme.floor_slab)),
        floor_highlight: materials.add(theme_material(&theme.floor_highlight)),
    });
}

/// Tear down and respawn the warehouse scene when the layout or viewed floor
/// changes. The viewed floor gets pickable per-shelf cells; other floors get
/// one cuboid per cabinet.
pub fn rebuild_warehouse(
    mut commands: Commands,
    mut warehouse: ResMut<WarehouseState>,
    existing: Query<Entity, With<WarehouseEntity>>,
    mut meshes: ResMut<Assets<Mesh>>,
    material_set: Res<MaterialSet>,
    selector: Res<SelectorState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    if warehouse.current_floor != warehouse.prev_floor {
        warehouse.rebuild_needed = true;
        warehouse.prev_floor = warehouse.current_floor;
    }
    if !warehouse.rebuild_needed {
        return;
    }
    warehouse.rebuild_needed = false;

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let current_floor = warehouse.current_floor;
    let WarehouseState { layout, cache, .. } = &mut *warehouse;

    for (floor_index, floor) in layout.floors.iter().enumerate() {
        let base_y = floor_base_y(&layout.floors, floor_index);
        let width = floor.width() as f32;
        let depth = floor.depth() as f32;

        // Floor slab under the shelving footprint.
        if width > 0.0 && depth > 0.0 {
            let slab_material = if floor_index == current_floor {
                material_set.floor_highlight.clone()
            } else {
                material_set.floor_slab.clone()
            };
            commands.spawn((
                Mesh3d(meshes.add(Cuboid::new(width, 0.1, depth))),
                MeshMaterial3d(slab_material),
                Transform::from_xyz(0.0, base_y - 0.05, 0.0),
                FloorSlab { floor: floor_index },
                WarehouseEntity,
            ));
        }

        let cabinets = cache.get(&layout.floors, floor_index);

        if floor_index != current_floor {
            // Distant floors render as solid cabinet blocks.
            for cabinet in &cabinets.cabinets {
                let center = spatial::cabinet_center(&layout.floors, floor_index, cabinet);
                commands.spawn((
                    Mesh3d(meshes.add(Cuboid::new(
                        cabinet.width as f32 * 0.95,
                        floor.height * 0.95,
                        0.95,
                    ))),
                    MeshMaterial3d(material_set.cabinet.clone()),
                    Transform::from_xyz(center.x, center.y, center.z),
                    CabinetBody {
                        floor: floor_index,
                        cabinet_id: cabinet.id,
                    },
                    WarehouseEntity,
                ));
            }
            continue;
        }

        // Viewed floor: one pickable cell per shelf.
        for cabinet in &cabinets.cabinets {
            let cell_height = floor.height / cabinet.rows as f32;
            let cell_mesh = meshes.add(Cuboid::new(0.9, cell_height * 0.9, 0.9));

            for row in 0..cabinet.rows {
                for column in 0..cabinet.width {
                    let location = ShelfLocation {
                        floor: floor_index,
                        cabinet_id: cabinet.id,
                        cabinet_row: row,
                        cabinet_column: column,
                    };
                    let center =
                        spatial::shelf_center(&layout.floors, floor_index, cabinet, row, column);
                    let material = if selector.occupied.contains(&location) {
                        material_set.shelf_occupied.clone()
                    } else {
                        material_set.shelf.clone()
                    };
                    commands
                        .spawn((
                            Mesh3d(cell_mesh.clone()),
                            MeshMaterial3d(material),
                            Transform::from_xyz(center.x, center.y, center.z),
                            ShelfCell { location },
                            WarehouseEntity,
                        ))
                        .observe(on_shelf_click)
                        .observe(on_shelf_over)
                        .observe(on_shelf_out);
                }
            }
        }
    }

    redraw.send(RequestRedraw);
}

/// Click selects the shelf, unless it is occupied and occupied shelves are
/// not selectable.
fn on_shelf_click(
    trigger: Trigger<Pointer<Click>>,
    cells: Query<&ShelfCell>,
    mut warehouse: ResMut<WarehouseState>,
    mut selector: ResMut<SelectorState>,
    mut changed: EventWriter<SelectionChanged>,
) {
    let Ok(cell) = cells.get(trigger.entity()) else {
        return;
    };
    let location = cell.location;

    if !selector.settings.can_select_occupied && selector.occupied.contains(&location) {
        return;
    }

    let WarehouseState { layout, cache, .. } = &mut *warehouse;
    let cabinets = cache.get(&layout.floors, location.floor);
    if let Some(update) =
        selector
            .selection
            .select(location, SelectionSource::Internal, &cabinets)
    {
        changed.send(SelectionChanged(update));
    }
}

fn on_shelf_over(
    trigger: Trigger<Pointer<Over>>,
    cells: Query<&ShelfCell>,
    mut hover: ResMut<HoverState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    if let Ok(cell) = cells.get(trigger.entity()) {
        hover.0 = Some(cell.location);
        redraw.send(RequestRedraw);
    }
}

fn on_shelf_out(
    trigger: Trigger<Pointer<Out>>,
    cells: Query<&ShelfCell>,
    mut hover: ResMut<HoverState>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    if let Ok(cell) = cells.get(trigger.entity()) {
        if hover.0 == Some(cell.location) {
            hover.0 = None;
            redraw.send(RequestRedraw);
        }
    }
}

/// Reassign shelf materials from selection, hover, and occupancy. Selection
/// wins over hover, hover over occupancy.
pub fn update_shelf_materials(
    selector: Res<SelectorState>,
    hover: Res<HoverState>,
    material_set: Res<MaterialSet>,
    mut cells: Query<(&ShelfCell, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let selected = selector.selection.current();
    for (cell, mut material) in &mut cells {
        let handle = if selected == Some(cell.location) {
            &material_set.selection
        } else if hover.0 == Some(cell.location) {
            &material_set.hover
        } else if selector.occupied.contains(&cell.location) {
            &material_set.shelf_occupied
        } else {
            &material_set.shelf
        };
        if material.0 != *handle {
            material.0 = handle.clone();
        }
    }
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("No selection: click a shelf or press an arrow key"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

pub fn update_hud(
    warehouse: Res<WarehouseState>,
    selector: Res<SelectorState>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = hud.get_single_mut() else {
        return;
    };

    let line = match selector.selection.current() {
        Some(loc) => format!(
            "Floor {}/{} · Cabinet {} · Row {} · Col {}",
            loc.floor + 1,
            warehouse.floor_count(),
            loc.cabinet_id,
            loc.cabinet_row,
            loc.cabinet_column
        ),
        None => format!(
            "Floor {}/{} · no selection",
            warehouse.current_floor + 1,
            warehouse.floor_count()
        ),
    };
    if **text != line {
        **text = line;
    }
}
