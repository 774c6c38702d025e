use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use solidgrid_core::{Command, Event, GridCoord, TileVariant};
use solidgrid_system_autotile::{resolve, Autotile, NeighborhoodSignature};
use solidgrid_world::{self as world, query, World};

type Visuals = BTreeMap<GridCoord, Option<TileVariant>>;

fn submit(world: &mut World, autotile: &mut Autotile, command: Command, visuals: &mut Visuals) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    let snapshot = &*world;
    let mut layer = |cell: GridCoord, variant: Option<TileVariant>| {
        let _ = visuals.insert(cell, variant);
    };
    let _ = autotile.handle(
        &events,
        |cell| query::is_occupied(snapshot, cell),
        &mut layer,
    );
}

fn full_recompute(world: &World) -> Visuals {
    let mut visuals = Visuals::new();
    let Ok(bounds) = query::bounding_box(world) else {
        return visuals;
    };
    let mut layer = |cell: GridCoord, variant: Option<TileVariant>| {
        let _ = visuals.insert(cell, variant);
    };
    let _ = Autotile::new().recompute_region(
        bounds,
        |cell| query::is_occupied(world, cell),
        &mut layer,
    );
    visuals
}

#[test]
fn incremental_updates_match_full_recompute() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0f_9a1d);
    let mut world = World::new();
    let mut autotile = Autotile::new();
    let mut visuals = Visuals::new();

    for _ in 0..2_000 {
        let cell = GridCoord::new(rng.gen_range(-6..=6), rng.gen_range(-6..=6));
        let command = if rng.gen_bool(0.6) {
            Command::SetOccupied { cell }
        } else {
            Command::ClearOccupied { cell }
        };
        submit(&mut world, &mut autotile, command, &mut visuals);
    }

    let expected = full_recompute(&world);
    assert!(!expected.is_empty(), "seeded edits should leave solid cells");
    for (cell, variant) in &expected {
        let incremental = visuals.get(cell).copied().flatten();
        assert_eq!(incremental, *variant, "visual cell {cell:?}");
    }

    // Cells outside the recompute region must have been blanked by the fan-out.
    for (cell, variant) in &visuals {
        if !expected.contains_key(cell) {
            assert_eq!(*variant, None, "stale visual at {cell:?}");
        }
    }
}

#[test]
fn every_signature_resolves_from_a_real_grid() {
    let visual = GridCoord::new(0, 0);
    let corners = [
        visual.offset(-1, -1),
        visual.offset(0, -1),
        visual.offset(-1, 0),
        visual,
    ];

    for bits in 0_u8..16 {
        let solid: Vec<GridCoord> = corners
            .iter()
            .enumerate()
            .filter(|(index, _)| bits & (0b1000 >> *index) != 0)
            .map(|(_, cell)| *cell)
            .collect();
        let world = World::from_snapshot(solid);

        let signature =
            NeighborhoodSignature::sample(visual, |cell| query::is_occupied(&world, cell));
        assert_eq!(signature.bits(), bits);
        assert_eq!(
            resolve(visual, |cell| query::is_occupied(&world, cell)),
            signature.variant()
        );
    }
}

#[test]
fn clearing_the_grid_blanks_everything_it_drew() {
    let mut world = World::new();
    let mut autotile = Autotile::new();
    let mut visuals = Visuals::new();
    submit(
        &mut world,
        &mut autotile,
        Command::LoadSnapshot {
            cells: vec![GridCoord::new(0, 0), GridCoord::new(2, 2)],
        },
        &mut visuals,
    );
    assert!(visuals.is_empty(), "snapshot loads wait for a region recompute");

    visuals = full_recompute(&world);
    submit(&mut world, &mut autotile, Command::ClearAll, &mut visuals);

    assert_eq!(query::occupied_count(&world), 0);
    assert!(visuals.values().all(Option::is_none));
}

#[test]
fn no_op_edits_still_report_their_block() {
    let mut world = World::new();
    let mut autotile = Autotile::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ClearOccupied {
            cell: GridCoord::new(4, -4),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::CellCleared {
            cell: GridCoord::new(4, -4),
            changed: false,
        }]
    );

    let mut reported = Vec::new();
    let mut layer = |cell: GridCoord, variant: Option<TileVariant>| reported.push((cell, variant));
    let count = autotile.handle(&events, |cell| query::is_occupied(&world, cell), &mut layer);

    assert_eq!(count, 4);
    assert!(reported.iter().all(|(_, variant)| variant.is_none()));
}
