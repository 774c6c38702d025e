use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use solidgrid_core::{EditorConfig, GridCoord, PointerInput, TileVariant, VisualUpdate};
use solidgrid_system_editor::{EditOutcome, GridEditor, Intent, LoadOutcome};
use solidgrid_system_viewport::grid_to_screen_center;
use solidgrid_world::query;

const TILE: u32 = 16;

fn unit_scale_editor() -> GridEditor {
    let config = EditorConfig {
        logical_tile_size: TILE,
        tiles_per_width_hint: 10.0,
        viewport_width: 160.0,
        pan_speed: 1000.0,
        vertical_pan_locked: false,
    };
    GridEditor::new(&config).expect("valid config")
}

fn pointer_at(editor: &GridEditor, cell: GridCoord) -> PointerInput {
    PointerInput::on_grid(editor.viewport().grid_to_screen_center(cell))
}

fn add(editor: &mut GridEditor, cell: GridCoord) -> Vec<VisualUpdate> {
    let mut updates: Vec<VisualUpdate> = Vec::new();
    let pointer = pointer_at(editor, cell);
    let _ = editor.add_cell(pointer, &mut updates);
    updates
}

fn remove(editor: &mut GridEditor, cell: GridCoord) -> Vec<VisualUpdate> {
    let mut updates: Vec<VisualUpdate> = Vec::new();
    let pointer = pointer_at(editor, cell);
    let _ = editor.remove_cell(pointer, &mut updates);
    updates
}

fn block(cell: GridCoord) -> Vec<GridCoord> {
    let mut cells = vec![
        cell,
        cell.offset(1, 0),
        cell.offset(0, 1),
        cell.offset(1, 1),
    ];
    cells.sort_unstable();
    cells
}

#[test]
fn single_cell_resolves_to_north_west_convex_corner() {
    let mut editor = unit_scale_editor();
    let origin = GridCoord::new(0, 0);

    let updates = add(&mut editor, origin);

    assert!(query::is_occupied(editor.world(), origin));
    assert_eq!(
        updates
            .iter()
            .find(|update| update.cell == origin)
            .map(|update| update.variant),
        Some(Some(TileVariant::NwConvex)),
    );
    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 1)),
        Some(TileVariant::SeConvex)
    );
}

#[test]
fn filled_square_resolves_shared_corner_to_middle() {
    let mut editor = unit_scale_editor();
    for cell in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let _ = add(&mut editor, cell.into());
    }

    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 1)),
        Some(TileVariant::Middle)
    );
    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 0)),
        Some(TileVariant::TopEdge)
    );
    assert_eq!(
        editor.visual_cell(GridCoord::new(0, 1)),
        Some(TileVariant::LeftEdge)
    );
    assert_eq!(
        editor.visual_cell(GridCoord::new(2, 1)),
        Some(TileVariant::RightEdge)
    );
    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 2)),
        Some(TileVariant::BottomEdge)
    );
}

#[test]
fn opposite_corners_resolve_to_diagonal_seams() {
    let mut editor = unit_scale_editor();
    let _ = add(&mut editor, GridCoord::new(0, 0));
    let _ = add(&mut editor, GridCoord::new(1, 1));
    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 1)),
        Some(TileVariant::DiagonalBack)
    );

    let _ = remove(&mut editor, GridCoord::new(0, 0));
    let _ = remove(&mut editor, GridCoord::new(1, 1));
    let _ = add(&mut editor, GridCoord::new(1, 0));
    let _ = add(&mut editor, GridCoord::new(0, 1));
    assert_eq!(
        editor.visual_cell(GridCoord::new(1, 1)),
        Some(TileVariant::DiagonalForward)
    );
}

#[test]
fn edit_reports_exactly_the_two_by_two_block() {
    let mut editor = unit_scale_editor();
    let _ = add(&mut editor, GridCoord::new(3, 3));
    let target = GridCoord::new(-2, 5);

    let updates = add(&mut editor, target);

    let reported: Vec<GridCoord> = updates.iter().map(|update| update.cell).collect();
    assert_eq!(reported, block(target));
    for update in &updates {
        assert_eq!(update.variant, editor.visual_cell(update.cell));
    }
}

#[test]
fn add_then_remove_restores_previous_variants() {
    let mut editor = unit_scale_editor();
    let mut sink: Vec<VisualUpdate> = Vec::new();
    let _ = editor.load(
        [(0, 0), (1, 0), (2, 1), (0, 2)].map(|(x, y)| GridCoord::new(x, y)),
        &mut sink,
    );
    let target = GridCoord::new(1, 1);
    let before: Vec<Option<TileVariant>> = block(target)
        .into_iter()
        .map(|cell| editor.visual_cell(cell))
        .collect();

    let _ = add(&mut editor, target);
    let restored = remove(&mut editor, target);

    let after: Vec<Option<TileVariant>> = restored.iter().map(|update| update.variant).collect();
    assert_eq!(after, before);
}

#[test]
fn pointer_mapping_survives_pan_and_zoom() {
    let mut editor = unit_scale_editor();
    editor.pan(Vec2::new(-1.0, 0.5), Duration::from_millis(37));
    editor.set_scale(2.75).expect("positive scale");

    for x in -40..40 {
        for y in [-33, -1, 0, 1, 12] {
            let cell = GridCoord::new(x, y);
            let center = grid_to_screen_center(cell, editor.view(), TILE);
            assert_eq!(editor.hovered_cell(PointerInput::on_grid(center)), Some(cell));
        }
    }
}

#[test]
fn vertical_lock_pins_pan_at_zero() {
    let mut editor = unit_scale_editor();
    editor.set_vertical_pan_locked(true);
    assert!(editor.viewport().vertical_pan_locked());
    let mut sink: Vec<VisualUpdate> = Vec::new();

    let outcome = editor.handle(
        Intent::Pan {
            delta: Vec2::new(0.0, 1.0),
            dt: Duration::from_secs(1),
        },
        &mut sink,
    );

    assert_eq!(outcome, EditOutcome::Panned { pan: Vec2::ZERO });
    assert_eq!(editor.view().pan().y, 0.0);
}

#[test]
fn intents_over_ui_leave_grid_untouched() {
    let mut editor = unit_scale_editor();
    let mut sink: Vec<VisualUpdate> = Vec::new();
    let pointer = PointerInput::over_ui(Vec2::new(5.0, 5.0));

    assert_eq!(
        editor.handle(Intent::AddCell { pointer }, &mut sink),
        EditOutcome::IgnoredOverUi
    );
    assert_eq!(
        editor.handle(Intent::RemoveCell { pointer }, &mut sink),
        EditOutcome::IgnoredOverUi
    );
    assert!(sink.is_empty());
    assert_eq!(editor.hovered_cell(pointer), None);
}

#[test]
fn load_recomputes_one_cell_past_bounds() {
    let mut editor = unit_scale_editor();
    let mut visuals: BTreeMap<GridCoord, Option<TileVariant>> = BTreeMap::new();
    let mut layer = |cell: GridCoord, variant: Option<TileVariant>| {
        let _ = visuals.insert(cell, variant);
    };

    let outcome = editor.load([GridCoord::new(-1, -1), GridCoord::new(1, 0)], &mut layer);

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            cells: 2,
            refreshed: 12,
        }
    );
    assert_eq!(visuals.len(), 12);
    assert_eq!(
        visuals.get(&GridCoord::new(2, 1)),
        Some(&Some(TileVariant::SeConvex))
    );
    assert_eq!(visuals.get(&GridCoord::new(-1, 1)), Some(&None));
}
