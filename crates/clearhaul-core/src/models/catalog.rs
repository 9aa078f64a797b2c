//! Price catalog model
//!
//! The fixed price table for truck loads, itemized extras, and labor
//! surcharges, plus the quote estimation over it. The catalog is built once
//! at process start and shared immutably; there is no runtime re-pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::PricingConfig;
use crate::models::quote::{QuoteEstimate, QuoteLineItem, QuoteSelection};

/// Truck load size tier
///
/// The base unit of pricing. Exactly one tier is selected per quote;
/// the smallest tier is the default for a fresh selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadSize {
    /// Quarter truck
    #[default]
    Quarter,
    /// Half truck
    Half,
    /// Three-quarter truck
    ThreeQuarter,
    /// Full truck
    Full,
}

impl LoadSize {
    /// All tiers in declaration order
    pub const ALL: [LoadSize; 4] = [
        LoadSize::Quarter,
        LoadSize::Half,
        LoadSize::ThreeQuarter,
        LoadSize::Full,
    ];

    /// Parse from wire label (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quarter" => Some(LoadSize::Quarter),
            "half" => Some(LoadSize::Half),
            "three_quarter" => Some(LoadSize::ThreeQuarter),
            "full" => Some(LoadSize::Full),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadSize::Quarter => "Quarter Truck Load",
            LoadSize::Half => "Half Truck Load",
            LoadSize::ThreeQuarter => "Three-Quarter Truck Load",
            LoadSize::Full => "Full Truck Load",
        }
    }
}

impl fmt::Display for LoadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSize::Quarter => write!(f, "quarter"),
            LoadSize::Half => write!(f, "half"),
            LoadSize::ThreeQuarter => write!(f, "three_quarter"),
            LoadSize::Full => write!(f, "full"),
        }
    }
}

/// Itemized extra kind
///
/// Per-unit priced items added on top of the base truck load.
/// Declaration order is the canonical breakdown order for line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    FurnitureSmall,
    FurnitureLarge,
    ApplianceSmall,
    ApplianceLarge,
    Electronics,
    Mattress,
    Tire,
    Hazardous,
    /// Priced per cubic yard
    YardWaste,
    /// Priced per cubic yard
    ConstructionDebris,
}

impl ItemKind {
    /// All item kinds in declaration order
    pub const ALL: [ItemKind; 10] = [
        ItemKind::FurnitureSmall,
        ItemKind::FurnitureLarge,
        ItemKind::ApplianceSmall,
        ItemKind::ApplianceLarge,
        ItemKind::Electronics,
        ItemKind::Mattress,
        ItemKind::Tire,
        ItemKind::Hazardous,
        ItemKind::YardWaste,
        ItemKind::ConstructionDebris,
    ];

    /// Parse from wire label (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "furniture_small" => Some(ItemKind::FurnitureSmall),
            "furniture_large" => Some(ItemKind::FurnitureLarge),
            "appliance_small" => Some(ItemKind::ApplianceSmall),
            "appliance_large" => Some(ItemKind::ApplianceLarge),
            "electronics" => Some(ItemKind::Electronics),
            "mattress" => Some(ItemKind::Mattress),
            "tire" => Some(ItemKind::Tire),
            "hazardous" => Some(ItemKind::Hazardous),
            "yard_waste" => Some(ItemKind::YardWaste),
            "construction_debris" => Some(ItemKind::ConstructionDebris),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::FurnitureSmall => "Small Furniture",
            ItemKind::FurnitureLarge => "Large Furniture",
            ItemKind::ApplianceSmall => "Small Appliance",
            ItemKind::ApplianceLarge => "Large Appliance",
            ItemKind::Electronics => "Electronics",
            ItemKind::Mattress => "Mattress / Box Spring",
            ItemKind::Tire => "Tire",
            ItemKind::Hazardous => "Hazardous Material",
            ItemKind::YardWaste => "Yard Waste (per yard)",
            ItemKind::ConstructionDebris => "Construction Debris (per yard)",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::FurnitureSmall => write!(f, "furniture_small"),
            ItemKind::FurnitureLarge => write!(f, "furniture_large"),
            ItemKind::ApplianceSmall => write!(f, "appliance_small"),
            ItemKind::ApplianceLarge => write!(f, "appliance_large"),
            ItemKind::Electronics => write!(f, "electronics"),
            ItemKind::Mattress => write!(f, "mattress"),
            ItemKind::Tire => write!(f, "tire"),
            ItemKind::Hazardous => write!(f, "hazardous"),
            ItemKind::YardWaste => write!(f, "yard_waste"),
            ItemKind::ConstructionDebris => write!(f, "construction_debris"),
        }
    }
}

/// Labor surcharge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborKind {
    /// Priced per flight of stairs
    Stairs,
    HeavyItem,
    Disassembly,
}

impl LaborKind {
    /// All labor kinds in declaration order
    pub const ALL: [LaborKind; 3] =
        [LaborKind::Stairs, LaborKind::HeavyItem, LaborKind::Disassembly];

    /// Parse from wire label (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stairs" => Some(LaborKind::Stairs),
            "heavy_item" => Some(LaborKind::HeavyItem),
            "disassembly" => Some(LaborKind::Disassembly),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            LaborKind::Stairs => "Stairs (per flight)",
            LaborKind::HeavyItem => "Heavy Item",
            LaborKind::Disassembly => "Disassembly",
        }
    }
}

impl fmt::Display for LaborKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaborKind::Stairs => write!(f, "stairs"),
            LaborKind::HeavyItem => write!(f, "heavy_item"),
            LaborKind::Disassembly => write!(f, "disassembly"),
        }
    }
}

/// Price catalog
///
/// Immutable mapping of every load size tier, item kind, and labor kind to
/// its price. All prices are whole dollars represented as `Decimal` so that
/// quote sums never accumulate floating-point drift.
#[derive(Debug, Clone, Serialize)]
pub struct PriceCatalog {
    truck_load: BTreeMap<LoadSize, Decimal>,
    items: BTreeMap<ItemKind, Decimal>,
    labor: BTreeMap<LaborKind, Decimal>,
}

impl PriceCatalog {
    /// Build the catalog from pricing configuration
    ///
    /// Every tier and kind receives an entry, so lookups are total.
    pub fn from_config(pricing: &PricingConfig) -> Self {
        let truck_load = BTreeMap::from([
            (LoadSize::Quarter, Decimal::from(pricing.load_quarter)),
            (LoadSize::Half, Decimal::from(pricing.load_half)),
            (LoadSize::ThreeQuarter, Decimal::from(pricing.load_three_quarter)),
            (LoadSize::Full, Decimal::from(pricing.load_full)),
        ]);

        let items = BTreeMap::from([
            (ItemKind::FurnitureSmall, Decimal::from(pricing.item_furniture_small)),
            (ItemKind::FurnitureLarge, Decimal::from(pricing.item_furniture_large)),
            (ItemKind::ApplianceSmall, Decimal::from(pricing.item_appliance_small)),
            (ItemKind::ApplianceLarge, Decimal::from(pricing.item_appliance_large)),
            (ItemKind::Electronics, Decimal::from(pricing.item_electronics)),
            (ItemKind::Mattress, Decimal::from(pricing.item_mattress)),
            (ItemKind::Tire, Decimal::from(pricing.item_tire)),
            (ItemKind::Hazardous, Decimal::from(pricing.item_hazardous)),
            (ItemKind::YardWaste, Decimal::from(pricing.item_yard_waste)),
            (
                ItemKind::ConstructionDebris,
                Decimal::from(pricing.item_construction_debris),
            ),
        ]);

        let labor = BTreeMap::from([
            (LaborKind::Stairs, Decimal::from(pricing.labor_stairs)),
            (LaborKind::HeavyItem, Decimal::from(pricing.labor_heavy_item)),
            (LaborKind::Disassembly, Decimal::from(pricing.labor_disassembly)),
        ]);

        Self {
            truck_load,
            items,
            labor,
        }
    }

    /// The catalog with standard prices
    pub fn standard() -> Self {
        Self::from_config(&PricingConfig::default())
    }

    /// Base price for a truck load tier
    #[inline]
    pub fn load_price(&self, size: LoadSize) -> Decimal {
        self.truck_load.get(&size).copied().unwrap_or(Decimal::ZERO)
    }

    /// Per-unit price for an item kind
    #[inline]
    pub fn item_price(&self, kind: ItemKind) -> Decimal {
        self.items.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    /// Per-unit surcharge for a labor kind
    #[inline]
    pub fn labor_price(&self, kind: LaborKind) -> Decimal {
        self.labor.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    /// Compute a quote estimate for a selection
    ///
    /// The total is the base load price plus quantity times unit price for
    /// every selected item and labor kind. Line items are emitted for every
    /// non-zero quantity in catalog declaration order (items first, then
    /// labor), never in selection order, so the breakdown is deterministic
    /// across repeated calls.
    ///
    /// Pure function: no side effects, total over its input domain, and no
    /// upper bound on quantities.
    pub fn estimate(&self, selection: &QuoteSelection) -> QuoteEstimate {
        let base_price = self.load_price(selection.load_size);
        let mut total = base_price;
        let mut line_items = Vec::new();

        for kind in ItemKind::ALL {
            let quantity = selection.item_quantity(kind);
            if quantity == 0 {
                continue;
            }
            let subtotal = self.item_price(kind) * Decimal::from(quantity);
            total += subtotal;
            line_items.push(QuoteLineItem {
                label: kind.to_string(),
                quantity,
                subtotal,
            });
        }

        for kind in LaborKind::ALL {
            let quantity = selection.labor_quantity(kind);
            if quantity == 0 {
                continue;
            }
            let subtotal = self.labor_price(kind) * Decimal::from(quantity);
            total += subtotal;
            line_items.push(QuoteLineItem {
                label: kind.to_string(),
                quantity,
                subtotal,
            });
        }

        QuoteEstimate {
            load_size: selection.load_size,
            base_price,
            line_items,
            total,
        }
    }
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_prices() {
        let catalog = PriceCatalog::standard();
        assert_eq!(catalog.load_price(LoadSize::Quarter), dec!(150));
        assert_eq!(catalog.load_price(LoadSize::Half), dec!(250));
        assert_eq!(catalog.load_price(LoadSize::ThreeQuarter), dec!(350));
        assert_eq!(catalog.load_price(LoadSize::Full), dec!(450));
        assert_eq!(catalog.item_price(ItemKind::FurnitureLarge), dec!(75));
        assert_eq!(catalog.item_price(ItemKind::Tire), dec!(15));
        assert_eq!(catalog.labor_price(LaborKind::Stairs), dec!(25));
    }

    #[test]
    fn test_estimate_half_load_with_extras() {
        // Half truck + 1 large furniture + 2 tires = 250 + 75 + 30 = 355
        let catalog = PriceCatalog::standard();
        let mut selection = QuoteSelection::new(LoadSize::Half);
        selection.adjust_item(ItemKind::FurnitureLarge, 1);
        selection.adjust_item(ItemKind::Tire, 2);

        let estimate = catalog.estimate(&selection);

        assert_eq!(estimate.base_price, dec!(250));
        assert_eq!(estimate.total, dec!(355));
        assert_eq!(estimate.line_items.len(), 2);
        assert_eq!(estimate.line_items[0].label, "furniture_large");
        assert_eq!(estimate.line_items[0].quantity, 1);
        assert_eq!(estimate.line_items[0].subtotal, dec!(75));
        assert_eq!(estimate.line_items[1].label, "tire");
        assert_eq!(estimate.line_items[1].quantity, 2);
        assert_eq!(estimate.line_items[1].subtotal, dec!(30));
    }

    #[test]
    fn test_estimate_full_load_alone() {
        let catalog = PriceCatalog::standard();
        let selection = QuoteSelection::new(LoadSize::Full);

        let estimate = catalog.estimate(&selection);

        assert_eq!(estimate.total, dec!(450));
        assert!(estimate.line_items.is_empty());
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let catalog = PriceCatalog::standard();
        let mut selection = QuoteSelection::new(LoadSize::Quarter);
        // Select in reverse declaration order; the breakdown must not care.
        selection.adjust_labor(LaborKind::Disassembly, 1);
        selection.adjust_item(ItemKind::ConstructionDebris, 3);
        selection.adjust_item(ItemKind::FurnitureSmall, 2);

        let first = catalog.estimate(&selection);
        let second = catalog.estimate(&selection);

        assert_eq!(first.total, second.total);
        let first_labels: Vec<_> = first.line_items.iter().map(|li| li.label.clone()).collect();
        let second_labels: Vec<_> = second.line_items.iter().map(|li| li.label.clone()).collect();
        assert_eq!(first_labels, second_labels);
        // Declaration order: items before labor, furniture before debris.
        assert_eq!(
            first_labels,
            vec!["furniture_small", "construction_debris", "disassembly"]
        );
    }

    #[test]
    fn test_estimate_adding_one_unit_adds_exactly_its_price() {
        let catalog = PriceCatalog::standard();
        let mut selection = QuoteSelection::new(LoadSize::Half);
        selection.adjust_item(ItemKind::Mattress, 4);

        let before = catalog.estimate(&selection).total;
        selection.adjust_item(ItemKind::Mattress, 1);
        let after = catalog.estimate(&selection).total;

        assert_eq!(after - before, catalog.item_price(ItemKind::Mattress));
    }

    #[test]
    fn test_estimate_never_below_base_price() {
        let catalog = PriceCatalog::standard();
        let mut selection = QuoteSelection::new(LoadSize::ThreeQuarter);
        selection.adjust_item(ItemKind::Electronics, 7);
        selection.adjust_labor(LaborKind::Stairs, 2);

        let estimate = catalog.estimate(&selection);
        assert!(estimate.total >= catalog.load_price(LoadSize::ThreeQuarter));
    }

    #[test]
    fn test_wire_labels_round_trip() {
        for size in LoadSize::ALL {
            assert_eq!(LoadSize::from_str(&size.to_string()), Some(size));
        }
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_str(&kind.to_string()), Some(kind));
        }
        for kind in LaborKind::ALL {
            assert_eq!(LaborKind::from_str(&kind.to_string()), Some(kind));
        }
        assert_eq!(ItemKind::from_str("velvet_sofa"), None);
    }

    #[test]
    fn test_serde_wire_labels() {
        let json = serde_json::to_string(&ItemKind::FurnitureLarge).unwrap();
        assert_eq!(json, "\"furniture_large\"");
        let parsed: LoadSize = serde_json::from_str("\"three_quarter\"").unwrap();
        assert_eq!(parsed, LoadSize::ThreeQuarter);
    }
}
