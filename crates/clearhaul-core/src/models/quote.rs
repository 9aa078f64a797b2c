//! Quote selection and estimate models
//!
//! A `QuoteSelection` is the caller-owned working state of an estimate: one
//! load size plus non-negative quantities per item and labor kind. It is
//! mutated through the clamping adjust operations and priced by
//! `PriceCatalog::estimate`. Selections are never persisted as-is; quote
//! requests store a snapshot instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::catalog::{ItemKind, LaborKind, LoadSize};

/// Quote selection
///
/// Quantities are `u32`, so a negative quantity is unrepresentable. Kinds
/// with zero quantity are kept out of the maps entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSelection {
    /// Selected truck load tier (defaults to the smallest)
    #[serde(default)]
    pub load_size: LoadSize,

    /// Quantity per selected item kind
    #[serde(default)]
    pub items: BTreeMap<ItemKind, u32>,

    /// Quantity per selected labor kind
    #[serde(default)]
    pub labor: BTreeMap<LaborKind, u32>,
}

impl QuoteSelection {
    /// Create a fresh selection for a load size with no extras
    pub fn new(load_size: LoadSize) -> Self {
        Self {
            load_size,
            items: BTreeMap::new(),
            labor: BTreeMap::new(),
        }
    }

    /// Add `delta` (positive or negative) to an item quantity, clamping at zero
    pub fn adjust_item(&mut self, kind: ItemKind, delta: i64) {
        Self::adjust(&mut self.items, kind, delta);
    }

    /// Add `delta` (positive or negative) to a labor quantity, clamping at zero
    pub fn adjust_labor(&mut self, kind: LaborKind, delta: i64) {
        Self::adjust(&mut self.labor, kind, delta);
    }

    /// Current quantity for an item kind (0 when unselected)
    #[inline]
    pub fn item_quantity(&self, kind: ItemKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Current quantity for a labor kind (0 when unselected)
    #[inline]
    pub fn labor_quantity(&self, kind: LaborKind) -> u32 {
        self.labor.get(&kind).copied().unwrap_or(0)
    }

    /// Check whether any item or labor quantity is non-zero
    pub fn has_extras(&self) -> bool {
        !self.items.is_empty() || !self.labor.is_empty()
    }

    fn adjust<K: Ord>(quantities: &mut BTreeMap<K, u32>, kind: K, delta: i64) {
        let current = quantities.get(&kind).copied().unwrap_or(0);
        let next = i64::from(current)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX)) as u32;

        if next == 0 {
            quantities.remove(&kind);
        } else {
            quantities.insert(kind, next);
        }
    }
}

/// One priced row of a quote breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    /// Wire label of the item or labor kind
    pub label: String,

    /// Selected quantity
    pub quantity: u32,

    /// Quantity times the kind's unit price
    pub subtotal: Decimal,
}

/// Quote estimate
///
/// Derived value, recomputed from catalog and selection on every change.
/// Carries no state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEstimate {
    /// Selected truck load tier
    pub load_size: LoadSize,

    /// Base price of the selected tier
    pub base_price: Decimal,

    /// Breakdown rows for every non-zero quantity, in catalog order
    pub line_items: Vec<QuoteLineItem>,

    /// Base price plus all line item subtotals
    pub total: Decimal,
}
