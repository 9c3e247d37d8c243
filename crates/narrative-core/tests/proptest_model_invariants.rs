//! Property-based invariant tests for the navigation model.
//!
//! 1. A valid activation makes exactly that item active.
//! 2. An out-of-range activation leaves the active item unchanged.
//! 3. Layout metrics tile the track for every count.
//! 4. Visited never goes from true to false outside a full reset.
//! 5. Completion holds iff every item is visited (vacuously for none).
//! 6. At most one item is active after any operation sequence.

use narrative_core::item::ItemContent;
use narrative_core::model::{ModelEvent, NavigationModel};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn model(count: usize) -> NavigationModel {
    NavigationModel::new((0..count).map(|i| ItemContent::new(format!("T{i}"), format!("B{i}"))))
}

#[derive(Debug, Clone)]
enum Op {
    Activate(usize),
    Step(isize),
    Visit(usize),
    Unvisit(usize),
    Rebroadcast,
}

fn op_strategy(count: usize) -> impl Strategy<Value = Op> {
    let bound = count + 3;
    prop_oneof![
        (0..bound).prop_map(Op::Activate),
        (-3isize..=3).prop_map(Op::Step),
        (0..bound).prop_map(Op::Visit),
        (0..bound).prop_map(Op::Unvisit),
        Just(Op::Rebroadcast),
    ]
}

fn scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (0usize..12).prop_flat_map(|count| (Just(count), prop::collection::vec(op_strategy(count), 0..40)))
}

fn apply(model: &mut NavigationModel, op: &Op) {
    match *op {
        Op::Activate(index) => {
            model.set_active_item(index);
        }
        Op::Step(delta) => {
            model.step_active(delta);
        }
        Op::Visit(index) => {
            model.toggle_visited(index, true);
        }
        Op::Unvisit(index) => {
            model.toggle_visited(index, false);
        }
        Op::Rebroadcast => {
            model.rebroadcast_active();
        }
    }
}

fn active_count(model: &NavigationModel) -> usize {
    model.items().iter().filter(|item| item.is_active()).count()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Valid activation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn valid_activation_is_exclusive(count in 1usize..20, picks in prop::collection::vec(any::<prop::sample::Index>(), 1..10)) {
        let mut m = model(count);
        for pick in picks {
            let index = pick.index(count);
            prop_assert_eq!(m.set_active_item(index), Some(index));
            prop_assert_eq!(m.active_index(), Some(index));
            prop_assert_eq!(active_count(&m), 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Out-of-range activation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_range_activation_is_ignored(count in 0usize..20, start in any::<prop::sample::Index>(), over in 0usize..1000) {
        let mut m = model(count);
        let before = if count > 0 {
            m.set_active_item(start.index(count))
        } else {
            None
        };
        m.drain_events();

        prop_assert_eq!(m.set_active_item(count + over), None);
        prop_assert_eq!(m.active_index(), before);
        prop_assert_eq!(m.pending_event_count(), 0);

        if let Some(current) = before {
            let below = -(current as isize) - 1;
            prop_assert_eq!(m.step_active(below), None);
            prop_assert_eq!(m.active_index(), before);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Layout metrics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn metrics_tile_the_track(count in 1usize..500) {
        let mut m = model(count);
        m.recompute_layout_metrics();
        let metrics = m.metrics();
        prop_assert!((metrics.item_width * count as f64 - 100.0).abs() < 1e-9);
        prop_assert_eq!(metrics.total_width, 100.0 * count as f64);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4–6. Operation sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visited_is_monotonic((count, ops) in scenario()) {
        let mut m = model(count);
        let mut seen = vec![false; count];
        for op in &ops {
            apply(&mut m, op);
            for (i, item) in m.items().iter().enumerate() {
                prop_assert!(!seen[i] || item.is_visited(), "item {} lost visited after {:?}", i, op);
                seen[i] = item.is_visited();
            }
            for event in m.drain_events() {
                prop_assert!(
                    !matches!(event, ModelEvent::VisitedChanged { visited: false, .. }),
                    "unexpected unvisit event {:?}", event
                );
            }
        }
    }

    #[test]
    fn completion_matches_visited((count, ops) in scenario()) {
        let mut m = model(count);
        for op in &ops {
            apply(&mut m, op);
            let all = m.items().iter().all(|item| item.is_visited());
            prop_assert_eq!(m.are_all_items_completed(), all);
            prop_assert_eq!(m.are_all_items_completed(), m.visited_count() == count);
        }
    }

    #[test]
    fn at_most_one_active((count, ops) in scenario()) {
        let mut m = model(count);
        let mut activated = false;
        for op in &ops {
            apply(&mut m, op);
            activated |= m.active_item().is_some();
            prop_assert!(active_count(&m) <= 1);
            if activated {
                prop_assert_eq!(active_count(&m), 1);
            }
        }
    }

    #[test]
    fn reset_clears_everything((count, ops) in scenario()) {
        let mut m = model(count).with_reset_on_revisit(true);
        for op in &ops {
            apply(&mut m, op);
        }
        prop_assert!(m.reset_for_revisit());
        prop_assert!(m.active_item().is_none());
        prop_assert_eq!(m.visited_count(), 0);
        prop_assert_eq!(m.are_all_items_completed(), count == 0);
    }
}

#[test]
fn empty_collection_is_vacuously_complete() {
    let m = model(0);
    assert!(m.are_all_items_completed());
    assert!(m.active_item().is_none());
}
