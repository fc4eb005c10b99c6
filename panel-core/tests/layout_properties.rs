//! Property tests for the layout model.
//!
//! Covers scale agreement between preview and export, rotation closure,
//! deletion and session round-trips over generated layouts.

use panel_core::{
    CoordinateTransform, LayoutStore, PanelSizeClass, Point, SessionCodec, WallWidth,
    PREVIEW_WIDTH,
};
use proptest::prelude::*;

fn size_class() -> impl Strategy<Value = PanelSizeClass> {
    prop::sample::select(PanelSizeClass::ALL.to_vec())
}

/// Operations applied to a fresh store.
#[derive(Debug, Clone)]
enum Op {
    Add(PanelSizeClass, Option<(f64, f64)>),
    Rotate(usize, i32),
    Move(usize, f64, f64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (size_class(), prop::option::of((-2000.0..2000.0f64, -2000.0..2000.0f64)))
            .prop_map(|(s, a)| Op::Add(s, a)),
        (0usize..16, -720i32..720).prop_map(|(i, d)| Op::Rotate(i, d)),
        (0usize..16, -2000.0..2000.0f64, -2000.0..2000.0f64).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        (0usize..16).prop_map(Op::Remove),
    ]
}

fn build(ops: &[Op]) -> LayoutStore {
    let mut store = LayoutStore::new();
    for (n, op) in ops.iter().enumerate() {
        let ids: Vec<_> = store.iter().map(|p| p.id.clone()).collect();
        let pick = |i: usize| ids.get(i % ids.len().max(1)).cloned();
        match *op {
            Op::Add(size, anchor) => {
                store.add(size, format!("mat{n}"), anchor.map(|(x, y)| Point::new(x, y)));
            }
            Op::Rotate(i, delta) => {
                if let Some(id) = pick(i) {
                    store.rotate(&id, delta).expect("known id");
                }
            }
            Op::Move(i, x, y) => {
                if let Some(id) = pick(i) {
                    store.move_panel(&id, Point::new(x, y)).expect("known id");
                }
            }
            Op::Remove(i) => {
                if let Some(id) = pick(i) {
                    store.remove(&id).expect("known id");
                }
            }
        }
    }
    store
}

proptest! {
    #[test]
    fn preview_scaled_by_photo_ratio_equals_export(
        wall_cm in 1.0..5000.0f64,
        photo_px in 1u32..20_000,
        size in size_class(),
    ) {
        let t = CoordinateTransform::new(WallWidth::new(wall_cm).unwrap(), photo_px);
        let preview = t.preview_size(size);
        let export = t.export_size(size);
        let ratio = f64::from(photo_px) / PREVIEW_WIDTH;
        let tolerance = 1e-9 * export.width.max(export.height).max(1.0);
        prop_assert!((preview.width * ratio - export.width).abs() <= tolerance);
        prop_assert!((preview.height * ratio - export.height).abs() <= tolerance);
    }

    #[test]
    fn rotation_stays_in_range_and_four_steps_close(deltas in prop::collection::vec(-1000i32..1000, 0..20)) {
        let mut store = LayoutStore::new();
        let id = store.add(PanelSizeClass::XL, "oak", None);
        for delta in deltas {
            let r = store.rotate(&id, delta).unwrap();
            prop_assert!(r < 360);
        }
        let start = store.get(&id).unwrap().rotation_deg;
        for _ in 0..4 {
            store.rotate_step(&id).unwrap();
        }
        prop_assert_eq!(store.get(&id).unwrap().rotation_deg, start);
    }

    #[test]
    fn session_round_trip_preserves_fields_and_order(
        ops in prop::collection::vec(op(), 1..40),
        wall_cm in 10.0..2000.0f64,
    ) {
        let store = build(&ops);
        let wall = WallWidth::new(wall_cm).unwrap();
        let json = SessionCodec::to_json(wall, &store).unwrap();
        let (wall2, store2) = SessionCodec::from_json(&json).unwrap();
        prop_assert_eq!(wall2, wall);
        prop_assert_eq!(store2.list(), store.list());
    }

    #[test]
    fn removal_leaves_others_untouched(ops in prop::collection::vec(op(), 1..30), pick in 0usize..64) {
        let mut store = build(&ops);
        prop_assume!(!store.is_empty());
        let victim = store.list()[pick % store.len()].id.clone();
        let expected: Vec<_> = store.iter().filter(|p| p.id != victim).cloned().collect();
        store.remove(&victim).unwrap();
        prop_assert!(!store.iter().any(|p| p.id == victim));
        prop_assert_eq!(store.list(), expected.as_slice());
    }
}

#[test]
fn reference_scenario_rotation_closure() {
    let mut store = LayoutStore::new();
    let id = store.add(PanelSizeClass::M, "Affection", None);
    let before = store.get(&id).cloned();
    assert_eq!(store.rotate_step(&id).expect("rotate"), 90);
    for _ in 0..3 {
        store.rotate_step(&id).expect("rotate");
    }
    assert_eq!(store.get(&id).cloned(), before);
}
