//! Rackview Headless Validation Harness
//!
//! Sweeps the selector logic across many generated layouts without rendering
//! or a window. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p rackview-harness
//!   cargo run -p rackview-harness -- --verbose

use rackview_logic::cabinets::{extract_cabinets, CabinetCache};
use rackview_logic::camera::{entrance_goal, CameraRig};
use rackview_logic::floor_plan::{validate_layout, WarehouseLayout};
use rackview_logic::generator::{generate_layout, GeneratorConfig};
use rackview_logic::navigation::{navigate, NavDirection, NavResult};
use rackview_logic::selection::{
    OccupiedSet, SelectionSource, SelectionState, ShelfLocation,
};
use rackview_logic::spatial::{self, Vec3};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SWEEP_SEEDS: u64 = 50;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Rackview Validation Harness ===\n");

    let mut results = Vec::new();

    // 1. Cabinet extraction invariants
    results.extend(validate_extraction(verbose));

    // 2. Grid-to-world round-trip addressing
    results.extend(validate_spatial(verbose));

    // 3. Keyboard navigation sweep
    results.extend(validate_navigation(verbose));

    // 4. Selection machine and external echo suppression
    results.extend(validate_selection(verbose));

    // 5. Extraction cache behavior
    results.extend(validate_cache(verbose));

    // 6. Camera rig convergence
    results.extend(validate_camera(verbose));

    // 7. Layout format and generator
    results.extend(validate_layouts(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn sweep_layouts() -> impl Iterator<Item = (u64, WarehouseLayout)> {
    (0..SWEEP_SEEDS).map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (seed, generate_layout(&GeneratorConfig::default(), &mut rng))
    })
}

// ── 1. Cabinet extraction ───────────────────────────────────────────────

fn validate_extraction(_verbose: bool) -> Vec<TestResult> {
    println!("--- Cabinet Extraction ---");
    let mut results = Vec::new();

    let mut floors_checked = 0usize;
    let mut id_gaps = 0usize;
    let mut orphan_cells = 0usize;
    let mut nondeterministic = 0usize;

    for (_, layout) in sweep_layouts() {
        for floor in &layout.floors {
            floors_checked += 1;
            let cabs = extract_cabinets(floor);

            for (i, cabinet) in cabs.cabinets.iter().enumerate() {
                if cabinet.id != i as u32 {
                    id_gaps += 1;
                }
            }

            for row in 0..floor.depth() {
                for col in 0..floor.width() {
                    let assigned = cabs.cabinet_at(row, col).is_some();
                    if assigned != (floor.cell(row, col) != 0) {
                        orphan_cells += 1;
                    }
                }
            }

            if extract_cabinets(floor).cabinets != cabs.cabinets {
                nondeterministic += 1;
            }
        }
    }

    results.push(TestResult {
        name: "extraction_ids_sequential".into(),
        passed: id_gaps == 0,
        detail: format!("{} floors, {} id gaps", floors_checked, id_gaps),
    });
    results.push(TestResult {
        name: "extraction_cell_coverage".into(),
        passed: orphan_cells == 0,
        detail: format!("{} mismatched cells", orphan_cells),
    });
    results.push(TestResult {
        name: "extraction_deterministic".into(),
        passed: nondeterministic == 0,
        detail: format!("{} nondeterministic floors", nondeterministic),
    });

    // Horizontal-only merging: vertically stacked equal values stay separate.
    let stacked = rackview_logic::floor_plan::FloorConfig::new(
        3.0,
        vec![vec![5, 5], vec![5, 5]],
    );
    let cabs = extract_cabinets(&stacked);
    results.push(TestResult {
        name: "extraction_no_vertical_merge".into(),
        passed: cabs.cabinets.len() == 2,
        detail: format!("{} cabinets from 2 stacked runs", cabs.cabinets.len()),
    });

    results
}

// ── 2. Spatial round-trip ───────────────────────────────────────────────

fn validate_spatial(_verbose: bool) -> Vec<TestResult> {
    println!("--- Spatial Mapping ---");
    let mut results = Vec::new();

    let mut shelves_checked = 0usize;
    let mut failed_round_trips = 0usize;
    let mut overlapping_centers = 0usize;

    for (_, layout) in sweep_layouts().take(10) {
        for (floor_index, floor) in layout.floors.iter().enumerate() {
            let cabs = extract_cabinets(floor);
            for cabinet in &cabs.cabinets {
                for row in 0..cabinet.rows {
                    for column in 0..cabinet.width {
                        shelves_checked += 1;
                        let center = spatial::shelf_center(
                            &layout.floors,
                            floor_index,
                            cabinet,
                            row,
                            column,
                        );
                        let found = spatial::cabinet_containing(
                            &layout.floors,
                            floor_index,
                            &cabs.cabinets,
                            &center,
                        );
                        if found != Some(cabinet.id) {
                            failed_round_trips += 1;
                        }
                    }
                }

                let center = spatial::cabinet_center(&layout.floors, floor_index, cabinet);
                for other in &cabs.cabinets {
                    if other.id != cabinet.id
                        && spatial::cabinet_bounds(&layout.floors, floor_index, other)
                            .contains(&center)
                    {
                        overlapping_centers += 1;
                    }
                }
            }
        }
    }

    results.push(TestResult {
        name: "spatial_round_trip".into(),
        passed: failed_round_trips == 0,
        detail: format!(
            "{} shelves, {} failed round-trips",
            shelves_checked, failed_round_trips
        ),
    });
    results.push(TestResult {
        name: "spatial_bounds_disjoint".into(),
        passed: overlapping_centers == 0,
        detail: format!("{} centers inside foreign bounds", overlapping_centers),
    });

    results
}

// ── 3. Navigation sweep ─────────────────────────────────────────────────

fn validate_navigation(_verbose: bool) -> Vec<TestResult> {
    println!("--- Keyboard Navigation ---");
    let mut results = Vec::new();

    let mut steps_taken = 0usize;
    let mut out_of_bounds = 0usize;
    let mut floor_escapes = 0usize;

    let dirs = [
        NavDirection::Up,
        NavDirection::Right,
        NavDirection::Down,
        NavDirection::Left,
    ];

    for (seed, layout) in sweep_layouts().take(20) {
        let mut rng = StdRng::seed_from_u64(seed ^ 0xa5a5);
        for (floor_index, floor) in layout.floors.iter().enumerate() {
            let cabs = extract_cabinets(floor);
            let Some(start) = cabs.cabinets.first() else {
                continue;
            };
            let mut current = ShelfLocation {
                floor: floor_index,
                cabinet_id: start.id,
                cabinet_row: 0,
                cabinet_column: 0,
            };

            for _ in 0..300 {
                let dir = dirs[rng.gen_range(0..dirs.len())];
                let shift = rng.gen_bool(0.3);
                if let NavResult::Moved(next) = navigate(
                    &current,
                    dir,
                    shift,
                    &cabs,
                    floor,
                    &OccupiedSet::default(),
                    true,
                ) {
                    steps_taken += 1;
                    if next.floor != floor_index {
                        floor_escapes += 1;
                    }
                    match cabs.by_id(next.cabinet_id) {
                        Some(cabinet) => {
                            if next.cabinet_row >= cabinet.rows
                                || next.cabinet_column >= cabinet.width
                            {
                                out_of_bounds += 1;
                            }
                        }
                        None => out_of_bounds += 1,
                    }
                    current = next;
                }
            }
        }
    }

    results.push(TestResult {
        name: "navigation_stays_in_bounds".into(),
        passed: out_of_bounds == 0,
        detail: format!("{} steps, {} out of bounds", steps_taken, out_of_bounds),
    });
    results.push(TestResult {
        name: "navigation_stays_on_floor".into(),
        passed: floor_escapes == 0,
        detail: format!("{} floor escapes", floor_escapes),
    });

    results
}

// ── 4. Selection machine ────────────────────────────────────────────────

fn validate_selection(_verbose: bool) -> Vec<TestResult> {
    println!("--- Selection Machine ---");
    let mut results = Vec::new();

    let floor = rackview_logic::floor_plan::FloorConfig::new(
        3.0,
        vec![vec![5, 5, 0, 7, 7, 7]],
    );
    let cabs = extract_cabinets(&floor);
    let loc = |id: u32, row: u32, col: u32| ShelfLocation {
        floor: 0,
        cabinet_id: id,
        cabinet_row: row,
        cabinet_column: col,
    };

    let mut state = SelectionState::default();

    // Invalid addresses degrade to no-ops.
    let invalid_noop = state.select(loc(9, 0, 0), SelectionSource::Internal, &cabs).is_none()
        && state.select(loc(0, 9, 0), SelectionSource::Internal, &cabs).is_none()
        && state.current().is_none();
    results.push(TestResult {
        name: "selection_invalid_noop".into(),
        passed: invalid_noop,
        detail: "unknown cabinet / out-of-range cell rejected".into(),
    });

    // Cabinet-change flag tracks identity, not cell.
    let first = state.select(loc(0, 0, 0), SelectionSource::Internal, &cabs);
    let same = state.select(loc(0, 1, 1), SelectionSource::Internal, &cabs);
    let crossed = state.select(loc(1, 0, 0), SelectionSource::Internal, &cabs);
    let flags_ok = first.map(|u| u.cabinet_changed) == Some(true)
        && same.map(|u| u.cabinet_changed) == Some(false)
        && crossed.map(|u| u.cabinet_changed) == Some(true);
    results.push(TestResult {
        name: "selection_cabinet_change_flag".into(),
        passed: flags_ok,
        detail: "first/same/crossed flags correct".into(),
    });

    // Echo: host repeats the selection back quoting the latest sequence.
    let seq = state.sequence();
    let echo_dropped = state.apply_external(loc(1, 0, 0), seq, &cabs).is_none();
    // Stale: host acts on an old sequence after the user moved on.
    state.select(loc(0, 2, 0), SelectionSource::Internal, &cabs);
    let stale_dropped = state.apply_external(loc(1, 3, 1), seq, &cabs).is_none();
    // Fresh external selection applies.
    let fresh = state.apply_external(loc(1, 3, 1), state.sequence(), &cabs);
    let fresh_applied =
        fresh.map(|u| u.source) == Some(SelectionSource::External);
    results.push(TestResult {
        name: "selection_echo_suppression".into(),
        passed: echo_dropped && stale_dropped && fresh_applied,
        detail: format!(
            "echo {} stale {} fresh {}",
            echo_dropped, stale_dropped, fresh_applied
        ),
    });

    results
}

// ── 5. Extraction cache ─────────────────────────────────────────────────

fn validate_cache(_verbose: bool) -> Vec<TestResult> {
    println!("--- Extraction Cache ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(9);
    let mut layout = generate_layout(&GeneratorConfig::default(), &mut rng);
    let mut cache = CabinetCache::default();

    let a = cache.get(&layout.floors, 0);
    let b = cache.get(&layout.floors, 0);
    let shared = std::sync::Arc::ptr_eq(&a, &b);
    results.push(TestResult {
        name: "cache_reuses_result".into(),
        passed: shared,
        detail: format!("repeat lookup shares Arc: {}", shared),
    });

    layout.floors[0].matrix[1][1] = 9;
    let c = cache.get(&layout.floors, 0);
    let refreshed = !std::sync::Arc::ptr_eq(&a, &c);
    results.push(TestResult {
        name: "cache_detects_edit".into(),
        passed: refreshed,
        detail: format!("matrix edit re-extracts: {}", refreshed),
    });

    // Capacity bound holds under churn.
    let mut bounded = CabinetCache::with_capacity(8);
    for i in 0..100u8 {
        layout.floors[0].matrix[1][2] = (i % 9) + 1;
        bounded.get(&layout.floors, 0);
    }
    results.push(TestResult {
        name: "cache_capacity_bounded".into(),
        passed: bounded.len() <= 8,
        detail: format!("{} entries after churn (cap 8)", bounded.len()),
    });

    results
}

// ── 6. Camera rig ───────────────────────────────────────────────────────

fn validate_camera(_verbose: bool) -> Vec<TestResult> {
    println!("--- Camera Rig ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(13);
    let layout = generate_layout(&GeneratorConfig::default(), &mut rng);
    let goal = match entrance_goal(&layout.floors) {
        Some(g) => g,
        None => {
            results.push(TestResult {
                name: "camera_entrance_goal".into(),
                passed: false,
                detail: "no entrance goal for non-empty layout".into(),
            });
            return results;
        }
    };

    let mut converged = 0usize;
    let mut max_ticks = 0usize;
    let starts = 25;
    for _ in 0..starts {
        let start = Vec3::new(
            rng.gen_range(-200.0..200.0),
            rng.gen_range(5.0..150.0),
            rng.gen_range(-200.0..200.0),
        );
        let mut rig = CameraRig::new(start, Vec3::ZERO);
        rig.set_goal(goal.position, goal.target);

        let mut ticks = 0usize;
        while rig.is_animating() && ticks < 20_000 {
            rig.update(1.0 / 60.0);
            ticks += 1;
        }
        if !rig.is_animating() {
            converged += 1;
            max_ticks = max_ticks.max(ticks);
        }
    }

    results.push(TestResult {
        name: "camera_converges".into(),
        passed: converged == starts,
        detail: format!(
            "{}/{} starts converged, worst {} ticks",
            converged, starts, max_ticks
        ),
    });

    // Pre-emption: a new goal mid-flight wins.
    let mut rig = CameraRig::new(Vec3::new(50.0, 10.0, 0.0), Vec3::ZERO);
    rig.set_goal(Vec3::new(-50.0, 10.0, 0.0), Vec3::ZERO);
    for _ in 0..30 {
        rig.update(1.0 / 60.0);
    }
    rig.set_goal(Vec3::new(0.0, 10.0, 50.0), Vec3::ZERO);
    for _ in 0..20_000 {
        if !rig.is_animating() {
            break;
        }
        rig.update(1.0 / 60.0);
    }
    let settled = rig.position.distance(&Vec3::new(0.0, 10.0, 50.0)) < 0.2;
    results.push(TestResult {
        name: "camera_preemption".into(),
        passed: settled,
        detail: format!("settled at replacement goal: {}", settled),
    });

    results
}

// ── 7. Layout format and generator ──────────────────────────────────────

fn validate_layouts(_verbose: bool) -> Vec<TestResult> {
    println!("--- Layouts ---");
    let mut results = Vec::new();

    let mut invalid = 0usize;
    let mut empty_floors = 0usize;
    let mut bad_json = 0usize;

    for (_, layout) in sweep_layouts() {
        if !validate_layout(&layout).is_empty() {
            invalid += 1;
        }
        for floor in &layout.floors {
            if extract_cabinets(floor).is_empty() {
                empty_floors += 1;
            }
        }

        let text = layout.to_json();
        match WarehouseLayout::from_json(&text) {
            Ok(back) if back.floors == layout.floors => {}
            _ => bad_json += 1,
        }
    }

    results.push(TestResult {
        name: "generator_valid_layouts".into(),
        passed: invalid == 0,
        detail: format!("{}/{} seeds valid", SWEEP_SEEDS as usize - invalid, SWEEP_SEEDS),
    });
    results.push(TestResult {
        name: "generator_populates_floors".into(),
        passed: empty_floors == 0,
        detail: format!("{} empty floors", empty_floors),
    });
    results.push(TestResult {
        name: "layout_json_round_trip".into(),
        passed: bad_json == 0,
        detail: format!("{} round-trip failures", bad_json),
    });

    // An empty warehouse is a valid state, not an error.
    let empty = WarehouseLayout::default();
    results.push(TestResult {
        name: "layout_empty_is_valid".into(),
        passed: validate_layout(&empty).is_empty() && entrance_goal(&empty.floors).is_none(),
        detail: "no floors: valid layout, nothing to frame".into(),
    });

    results
}
