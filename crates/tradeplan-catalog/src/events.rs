//! Limited-time event shops as plain data.
//!
//! Each [`EventDefinition`] names its shop currency and the stock on sale.
//! Event currencies are always registered in the item space so held
//! balances resolve; shop paths are only added for events enabled in
//! [`CatalogParams`](crate::CatalogParams).

/// One shop listing: pay `price` of the event currency for `quantity` of `item`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopEntry {
    /// Currency cost per purchase.
    pub price: f64,
    /// Purchased item.
    pub item: &'static str,
    /// Units received per purchase.
    pub quantity: f64,
    /// Purchases available for the whole event.
    pub stock: f64,
}

/// A limited-time event with its own currency and shop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDefinition {
    /// Display and lookup name.
    pub name: &'static str,
    /// Item name of the event currency.
    pub currency: &'static str,
    /// Shop listings.
    pub shop: &'static [ShopEntry],
}

const fn entry(price: f64, item: &'static str, quantity: f64, stock: f64) -> ShopEntry {
    ShopEntry {
        price,
        item,
        quantity,
        stock,
    }
}

/// Event whose battle stages (code prefix `GT`) also drop its currency.
pub const KNIGHTS_AND_HUNTERS: &str = "Knights and Hunters";

/// All known events.
pub const EVENTS: &[EventDefinition] = &[EventDefinition {
    name: KNIGHTS_AND_HUNTERS,
    currency: "Knight Coin",
    shop: &[
        entry(10.0, "Frontline Battle Record", 2.0, 120.0),
        entry(25.0, "Tactical Battle Record", 2.0, 50.0),
        entry(50.0, "Strategic Battle Record", 2.0, 25.0),
        entry(80.0, "LMD (k)", 50.0, 100.0),
        entry(25.0, "Skill Summary - 2", 1.0, 50.0),
        entry(50.0, "Skill Summary - 3", 1.0, 25.0),
        entry(100.0, "Vanguard Chip", 1.0, 4.0),
        entry(25.0, "Orirock Cube", 1.0, 40.0),
        entry(35.0, "Polyester", 1.0, 25.0),
        entry(60.0, "Device", 1.0, 15.0),
        entry(120.0, "Aketon", 1.0, 15.0),
        entry(120.0, "Oriron Cluster", 1.0, 15.0),
        entry(350.0, "Orirock Concentration", 1.0, 10.0),
        entry(500.0, "Sugar Lump", 1.0, 10.0),
        entry(500.0, "RMA70-24", 1.0, 10.0),
        entry(1200.0, "Polymerization Preparation", 1.0, 5.0),
        entry(1500.0, "Headhunting Permit", 1.0, 3.0),
    ],
}];

/// Look up an event by name.
pub fn event(name: &str) -> Option<&'static EventDefinition> {
    EVENTS.iter().find(|e| e.name == name)
}
