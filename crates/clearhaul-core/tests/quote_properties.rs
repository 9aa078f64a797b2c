use clearhaul_core::models::{ItemKind, LaborKind, LoadSize, PriceCatalog, QuoteSelection};
use proptest::prelude::*;

fn load_size_strategy() -> impl Strategy<Value = LoadSize> {
    proptest::sample::select(LoadSize::ALL.to_vec())
}

fn item_kind_strategy() -> impl Strategy<Value = ItemKind> {
    proptest::sample::select(ItemKind::ALL.to_vec())
}

fn labor_kind_strategy() -> impl Strategy<Value = LaborKind> {
    proptest::sample::select(LaborKind::ALL.to_vec())
}

fn selection_strategy() -> impl Strategy<Value = QuoteSelection> {
    (
        load_size_strategy(),
        proptest::collection::vec((item_kind_strategy(), 0u32..50), 0..8),
        proptest::collection::vec((labor_kind_strategy(), 0u32..50), 0..4),
    )
        .prop_map(|(load_size, items, labor)| {
            let mut selection = QuoteSelection::new(load_size);
            for (kind, qty) in items {
                selection.adjust_item(kind, i64::from(qty));
            }
            for (kind, qty) in labor {
                selection.adjust_labor(kind, i64::from(qty));
            }
            selection
        })
}

proptest! {
    #[test]
    fn estimate_is_deterministic(selection in selection_strategy()) {
        let catalog = PriceCatalog::standard();

        let first = catalog.estimate(&selection);
        let second = catalog.estimate(&selection);

        prop_assert_eq!(first.total, second.total);
        prop_assert_eq!(first.line_items, second.line_items);
    }

    #[test]
    fn incrementing_an_item_raises_total_by_its_price(
        selection in selection_strategy(),
        kind in item_kind_strategy(),
    ) {
        let catalog = PriceCatalog::standard();
        let before = catalog.estimate(&selection).total;

        let mut bumped = selection.clone();
        bumped.adjust_item(kind, 1);
        let after = catalog.estimate(&bumped).total;

        prop_assert_eq!(after - before, catalog.item_price(kind));
    }

    #[test]
    fn incrementing_a_labor_kind_raises_total_by_its_price(
        selection in selection_strategy(),
        kind in labor_kind_strategy(),
    ) {
        let catalog = PriceCatalog::standard();
        let before = catalog.estimate(&selection).total;

        let mut bumped = selection.clone();
        bumped.adjust_labor(kind, 1);
        let after = catalog.estimate(&bumped).total;

        prop_assert_eq!(after - before, catalog.labor_price(kind));
    }

    #[test]
    fn zero_quantities_never_appear_in_line_items(selection in selection_strategy()) {
        let catalog = PriceCatalog::standard();
        let estimate = catalog.estimate(&selection);

        for line in &estimate.line_items {
            prop_assert!(line.quantity > 0);
        }
        // Adjust drops entries that reach zero, so every stored entry
        // produces exactly one line item.
        prop_assert_eq!(
            estimate.line_items.len(),
            selection.items.len() + selection.labor.len()
        );
    }

    #[test]
    fn total_never_drops_below_the_base_price(selection in selection_strategy()) {
        let catalog = PriceCatalog::standard();
        let estimate = catalog.estimate(&selection);

        prop_assert_eq!(estimate.base_price, catalog.load_price(selection.load_size));
        prop_assert!(estimate.total >= estimate.base_price);
    }

    #[test]
    fn adjust_clamps_like_saturating_integer_math(
        deltas in proptest::collection::vec(-1000i64..1000, 0..64),
    ) {
        let mut selection = QuoteSelection::new(LoadSize::Quarter);
        let mut expected: i64 = 0;

        for delta in deltas {
            selection.adjust_item(ItemKind::Tire, delta);
            expected = (expected + delta).max(0);
        }

        prop_assert_eq!(i64::from(selection.item_quantity(ItemKind::Tire)), expected);
    }
}
