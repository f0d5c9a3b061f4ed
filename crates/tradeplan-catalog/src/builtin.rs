//! The built-in item table and trade-path table.
//!
//! [`build_catalog`] constructs a fresh [`Catalog`] once per planning run from
//! explicit [`CatalogParams`]: the daily recovery rates shape the day-recovery
//! path and the enabled event names decide which event shops are added. No
//! global state is touched.
//!
//! Path order is stable and determines matrix column order:
//! 1. Day recovery
//! 2. Trading post and EXP feeding
//! 3. Certificate shops
//! 4. Workshop recipes
//! 5. Fixed-yield stages
//! 6. Recruitment and periodic rewards
//! 7. Enabled event shops

use crate::error::CatalogError;
use crate::events::{self, EventDefinition};
use crate::item::{DAY, EXP_K, ItemSpace, LMD_K, SANITY};
use crate::path::{PathLimits, TradePath};

/// Tag of the day-recovery path.
pub const TAG_RECOVERY: &str = "natural recovery (1 day)";
/// Tag of paths selling goods at the trading post.
pub const TAG_TRADING_POST: &str = "trading post";
/// Tag of paths feeding battle records into EXP.
pub const TAG_FEED_EXP: &str = "feed exp";
/// Tag of workshop recipes.
pub const TAG_WORKSHOP: &str = "workshop";
/// Tag prefix of certificate shops.
pub const TAG_SHOP: &str = "shop";
/// Tag prefix of event shops.
pub const TAG_EVENT_SHOP: &str = "event shop";

const JOBS: [&str; 8] = [
    "Vanguard",
    "Guard",
    "Defender",
    "Sniper",
    "Supporter",
    "Caster",
    "Medic",
    "Specialist",
];

type Bundle = &'static [(&'static str, f64)];

const ITEM_TABLE: &[(&str, &[&str])] = &[
    ("basic", &[DAY, "Originite Prime", SANITY, "Credit", LMD_K, EXP_K]),
    (
        "recruitment",
        &["Orundum", "Headhunting Permit", "Recruitment Permit", "Expedited Plan"],
    ),
    (
        "certificates",
        &[
            "Commendation Certificate",
            "Distinction Certificate",
            "Purchase Certificate",
        ],
    ),
    (
        "battle records",
        &[
            "Drill Battle Record",
            "Frontline Battle Record",
            "Tactical Battle Record",
            "Strategic Battle Record",
        ],
    ),
    (
        "T1",
        &[
            "Orirock",
            "Sugar Substitute",
            "Ester",
            "Oriron Shard",
            "Diketon",
            "Damaged Device",
        ],
    ),
    (
        "T2",
        &["Orirock Cube", "Sugar", "Polyester", "Oriron", "Polyketon", "Device"],
    ),
    (
        "T3",
        &[
            "Orirock Cluster",
            "Sugar Pack",
            "Polyester Pack",
            "Oriron Cluster",
            "Aketon",
            "Integrated Device",
            "Loxic Kohl",
            "Manganese Ore",
            "Grindstone",
            "RMA70-12",
        ],
    ),
    (
        "T4",
        &[
            "Orirock Concentration",
            "Sugar Lump",
            "Polyester Lump",
            "Oriron Block",
            "Keton Colloid",
            "Optimized Device",
            "White Horse Kohl",
            "Manganese Trihydrate",
            "Grindstone Pentahydrate",
            "RMA70-24",
        ],
    ),
    (
        "T5",
        &["Polymerization Preparation", "Bipolar Nanoflake", "D32 Steel"],
    ),
    (
        "promotion",
        &[
            "Chip Catalyst",
            "Token Copy",
            "Token Original",
            "Token Collection",
            "Heritage Token",
            "Legacy Token",
            "Royal Token",
        ],
    ),
    (
        "skills",
        &["Skill Summary - 1", "Skill Summary - 2", "Skill Summary - 3"],
    ),
    (
        "base",
        &[
            "Pure Gold",
            "Drone",
            "Carbon Stick",
            "Carbon Brick",
            "Carbon Pack",
            "Light Building Material",
            "Concrete Building Material",
            "Reinforced Building Material",
            "Furniture Part",
        ],
    ),
];

/// Battle records fed into EXP: (record, thousands of EXP).
const EXP_RECORDS: &[(&str, f64)] = &[
    ("Strategic Battle Record", 2.0),
    ("Tactical Battle Record", 1.0),
    ("Frontline Battle Record", 0.4),
    ("Drill Battle Record", 0.2),
];

/// Certificate shop listings: (tag, price, item, quantity, monthly stock).
type ShopRow = (&'static str, f64, &'static str, f64, Option<f64>);

const COMMENDATION_TIER_1: &[ShopRow] = &[
    ("commendation shop 1", 240.0, "Headhunting Permit", 1.0, Some(2.0)),
    ("commendation shop 1", 40.0, "Orundum", 100.0, Some(6.0)),
    ("commendation shop 1", 10.0, LMD_K, 4.0, Some(15.0)),
    ("commendation shop 1", 40.0, "Furniture Part", 100.0, Some(5.0)),
    ("commendation shop 1", 8.0, "Recruitment Permit", 1.0, Some(15.0)),
    ("commendation shop 1", 10.0, "Tactical Battle Record", 4.0, Some(15.0)),
    ("commendation shop 1", 10.0, "Pure Gold", 8.0, Some(15.0)),
];

const COMMENDATION_TIER_2: &[ShopRow] = &[
    ("commendation shop 2", 450.0, "Headhunting Permit", 1.0, Some(2.0)),
    ("commendation shop 2", 15.0, "Recruitment Permit", 1.0, Some(20.0)),
    ("commendation shop 2", 25.0, "Orirock Cluster", 1.0, Some(15.0)),
    ("commendation shop 2", 30.0, "Sugar Pack", 1.0, Some(15.0)),
    ("commendation shop 2", 30.0, "Polyester Pack", 1.0, Some(15.0)),
    ("commendation shop 2", 35.0, "Oriron Cluster", 1.0, Some(15.0)),
    ("commendation shop 2", 35.0, "Aketon", 1.0, Some(15.0)),
    ("commendation shop 2", 45.0, "Integrated Device", 1.0, Some(15.0)),
    ("commendation shop 2", 30.0, "Loxic Kohl", 1.0, Some(15.0)),
    ("commendation shop 2", 35.0, "Manganese Ore", 1.0, Some(15.0)),
    ("commendation shop 2", 40.0, "Grindstone", 1.0, Some(15.0)),
    ("commendation shop 2", 45.0, "RMA70-12", 1.0, Some(15.0)),
];

const COMMENDATION_TIER_3: &[ShopRow] = &[
    ("commendation shop 3", 100.0, LMD_K, 10.0, Some(15.0)),
    ("commendation shop 3", 50.0, "Orundum", 30.0, None),
];

/// Distinction listings without a monthly stock limit.
const DISTINCTION: &[ShopRow] = &[
    ("distinction shop", 10.0, "Headhunting Permit", 10.0, None),
    ("distinction shop", 5.0, "Expedited Plan", 1.0, None),
    ("distinction shop", 35.0, "Legacy Token", 1.0, None),
    ("distinction shop", 135.0, "Royal Token", 1.0, None),
    ("distinction shop", 10.0, "Orirock Concentration", 1.0, None),
    ("distinction shop", 10.0, "Sugar Lump", 1.0, None),
    ("distinction shop", 15.0, "Keton Colloid", 1.0, None),
    ("distinction shop", 20.0, "Optimized Device", 1.0, None),
    ("distinction shop", 10.0, "White Horse Kohl", 1.0, None),
    ("distinction shop", 10.0, "Manganese Trihydrate", 1.0, None),
];

const PURCHASE: &[ShopRow] = &[
    ("purchase shop", 90.0, "Chip Catalyst", 1.0, None),
    ("purchase shop", 45.0, "Heritage Token", 1.0, None),
    ("purchase shop", 180.0, "Legacy Token", 1.0, None),
    ("purchase shop", 720.0, "Royal Token", 1.0, None),
];

/// Workshop recipes: (inputs, output).
const WORKSHOP: &[(Bundle, (&str, f64))] = &[
    // T5
    (
        &[
            ("Manganese Trihydrate", 1.0),
            ("Grindstone Pentahydrate", 1.0),
            ("RMA70-24", 1.0),
            (LMD_K, 0.4),
        ],
        ("D32 Steel", 1.0),
    ),
    (
        &[("Optimized Device", 1.0), ("White Horse Kohl", 2.0), (LMD_K, 0.4)],
        ("Bipolar Nanoflake", 1.0),
    ),
    (
        &[
            ("Orirock Concentration", 1.0),
            ("Oriron Block", 1.0),
            ("Keton Colloid", 1.0),
            (LMD_K, 0.4),
        ],
        ("Polymerization Preparation", 1.0),
    ),
    // T4
    (
        &[
            ("RMA70-12", 1.0),
            ("Orirock Cluster", 2.0),
            ("Aketon", 1.0),
            (LMD_K, 0.3),
        ],
        ("RMA70-24", 1.0),
    ),
    (
        &[
            ("Grindstone", 1.0),
            ("Oriron Cluster", 1.0),
            ("Integrated Device", 1.0),
            (LMD_K, 0.3),
        ],
        ("Grindstone Pentahydrate", 1.0),
    ),
    (
        &[
            ("Manganese Ore", 2.0),
            ("Polyester Pack", 1.0),
            ("Loxic Kohl", 1.0),
            (LMD_K, 0.3),
        ],
        ("Manganese Trihydrate", 1.0),
    ),
    (
        &[
            ("Loxic Kohl", 1.0),
            ("Sugar Pack", 1.0),
            ("RMA70-12", 1.0),
            (LMD_K, 0.3),
        ],
        ("White Horse Kohl", 1.0),
    ),
    // T1 -> T4 chains
    (&[("Damaged Device", 3.0), (LMD_K, 0.1)], ("Device", 1.0)),
    (&[("Device", 4.0), (LMD_K, 0.2)], ("Integrated Device", 1.0)),
    (
        &[
            ("Integrated Device", 1.0),
            ("Orirock Cluster", 2.0),
            ("Grindstone", 1.0),
            (LMD_K, 0.3),
        ],
        ("Optimized Device", 1.0),
    ),
    (&[("Diketon", 3.0), (LMD_K, 0.1)], ("Polyketon", 1.0)),
    (&[("Polyketon", 4.0), (LMD_K, 0.2)], ("Aketon", 1.0)),
    (
        &[
            ("Aketon", 2.0),
            ("Sugar Pack", 1.0),
            ("Manganese Ore", 1.0),
            (LMD_K, 0.3),
        ],
        ("Keton Colloid", 1.0),
    ),
    (&[("Oriron Shard", 3.0), (LMD_K, 0.1)], ("Oriron", 1.0)),
    (&[("Oriron", 4.0), (LMD_K, 0.2)], ("Oriron Cluster", 1.0)),
    (
        &[
            ("Oriron Cluster", 2.0),
            ("Integrated Device", 1.0),
            ("Polyester Pack", 1.0),
            (LMD_K, 0.3),
        ],
        ("Oriron Block", 1.0),
    ),
    (&[("Ester", 3.0), (LMD_K, 0.1)], ("Polyester", 1.0)),
    (&[("Polyester", 4.0), (LMD_K, 0.2)], ("Polyester Pack", 1.0)),
    (
        &[
            ("Polyester Pack", 2.0),
            ("Aketon", 1.0),
            ("Loxic Kohl", 1.0),
            (LMD_K, 0.3),
        ],
        ("Polyester Lump", 1.0),
    ),
    (&[("Sugar Substitute", 3.0), (LMD_K, 0.1)], ("Sugar", 1.0)),
    (&[("Sugar", 4.0), (LMD_K, 0.2)], ("Sugar Pack", 1.0)),
    (
        &[
            ("Sugar Pack", 2.0),
            ("Oriron Cluster", 1.0),
            ("Manganese Ore", 1.0),
            (LMD_K, 0.3),
        ],
        ("Sugar Lump", 1.0),
    ),
    (&[("Orirock", 3.0), (LMD_K, 0.1)], ("Orirock Cube", 1.0)),
    (&[("Orirock Cube", 5.0), (LMD_K, 0.2)], ("Orirock Cluster", 1.0)),
    (
        &[("Orirock Cluster", 4.0), (LMD_K, 0.3)],
        ("Orirock Concentration", 1.0),
    ),
    // Base materials
    (
        &[("Carbon Stick", 2.0), (LMD_K, 0.8)],
        ("Light Building Material", 1.0),
    ),
    (
        &[("Carbon Brick", 2.0), (LMD_K, 2.4)],
        ("Concrete Building Material", 1.0),
    ),
    (
        &[("Carbon Pack", 2.0), (LMD_K, 7.2)],
        ("Reinforced Building Material", 1.0),
    ),
    (&[("Carbon Stick", 3.0)], ("Carbon Brick", 1.0)),
    (&[("Carbon Brick", 3.0)], ("Carbon Pack", 1.0)),
    (&[("Carbon Stick", 1.0)], ("Furniture Part", 4.0)),
    (&[("Carbon Brick", 1.0)], ("Furniture Part", 8.0)),
    (&[("Carbon Pack", 1.0)], ("Furniture Part", 12.0)),
    (&[("Light Building Material", 1.0)], ("Furniture Part", 8.0)),
    (&[("Concrete Building Material", 1.0)], ("Furniture Part", 16.0)),
    (&[("Reinforced Building Material", 1.0)], ("Furniture Part", 24.0)),
    // Skill summaries
    (&[("Skill Summary - 1", 3.0)], ("Skill Summary - 2", 1.0)),
    (&[("Skill Summary - 2", 3.0)], ("Skill Summary - 3", 1.0)),
];

/// Stages with fixed expected yields: (code, sanity cost, drops).
const FIXED_STAGES: &[(&str, f64, Bundle)] = &[
    (
        "CA-5",
        30.0,
        &[
            ("Skill Summary - 3", 2.5),
            ("Skill Summary - 2", 1.5),
            ("Skill Summary - 1", 1.5),
        ],
    ),
    (
        "LS-5",
        30.0,
        &[
            ("Strategic Battle Record", 3.0),
            ("Tactical Battle Record", 1.0),
            ("Frontline Battle Record", 1.0),
        ],
    ),
    ("AP-5", 30.0, &[("Purchase Certificate", 21.0)]),
    ("CE-5", 30.0, &[(LMD_K, 7.5)]),
];

/// Chip stages: (code suffix, first job, second job).
const CHIP_STAGES: &[(&str, &str, &str)] = &[
    ("A", "Defender", "Medic"),
    ("B", "Sniper", "Caster"),
    ("C", "Vanguard", "Supporter"),
    ("D", "Guard", "Specialist"),
];

/// Periodic rewards: (tag, bundle, executions per day).
const PERIODIC_REWARDS: &[(&str, Bundle, f64)] = &[
    (
        "daily missions",
        &[
            (LMD_K, 3.5),
            ("Skill Summary - 1", 2.0),
            ("Recruitment Permit", 1.0),
            ("Drill Battle Record", 8.0),
            ("Frontline Battle Record", 5.0),
            ("Purchase Certificate", 5.0),
            ("Orundum", 100.0),
        ],
        1.0,
    ),
    (
        "weekly missions",
        &[
            (LMD_K, 13.0),
            ("Skill Summary - 1", 5.0),
            ("Recruitment Permit", 9.0),
            ("Drill Battle Record", 4.0),
            ("Tactical Battle Record", 4.0),
            ("Strategic Battle Record", 4.0),
            ("Pure Gold", 14.0),
            ("Purchase Certificate", 30.0),
            ("Commendation Certificate", 20.0),
            ("Orundum", 500.0),
        ],
        1.0 / 7.0,
    ),
    (
        "monthly sign-in",
        &[
            (LMD_K, 30.0),
            ("Skill Summary - 1", 15.0),
            ("Skill Summary - 2", 5.0),
            ("Skill Summary - 3", 6.0),
            ("Drill Battle Record", 10.0),
            ("Frontline Battle Record", 10.0),
            ("Tactical Battle Record", 10.0),
            ("Strategic Battle Record", 9.0),
            ("Pure Gold", 31.0),
            ("Purchase Certificate", 33.0),
            ("Commendation Certificate", 10.0),
            ("Distinction Certificate", 5.0),
            ("Recruitment Permit", 5.0),
            ("Headhunting Permit", 1.0),
            ("Chip Catalyst", 1.0),
        ],
        1.0 / 30.0,
    ),
];

/// Parameters fixed for one catalog construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogParams {
    /// Sanity recovered per day.
    pub sanity_per_day: f64,
    /// LMD produced by the base per day (raw units, not thousands).
    pub lmd_per_day: f64,
    /// Tactical battle records produced by the base per day.
    pub exp_records_per_day: f64,
    /// Names of events whose shops are open.
    pub enabled_events: Vec<String>,
}

impl Default for CatalogParams {
    fn default() -> Self {
        Self {
            sanity_per_day: 240.0,
            lmd_per_day: 45_000.0,
            exp_records_per_day: 20.0,
            enabled_events: Vec::new(),
        }
    }
}

/// An item space together with the ordered paths built over it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Every item a path or ledger may reference.
    pub items: ItemSpace,
    /// Paths in matrix-column order.
    pub paths: Vec<TradePath>,
}

impl Catalog {
    /// Split into the item space and path list.
    pub fn into_parts(self) -> (ItemSpace, Vec<TradePath>) {
        (self.items, self.paths)
    }

    /// Paths carrying `tag` exactly.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TradePath> {
        self.paths.iter().filter(move |p| p.tag() == tag)
    }
}

/// Build the built-in item space.
///
/// Event currencies are registered for every known event, enabled or not.
///
/// # Errors
///
/// Returns [`CatalogError::DuplicateItem`] if the tables repeat a name.
pub fn builtin_items() -> Result<ItemSpace, CatalogError> {
    let mut space = ItemSpace::new();
    for &(category, names) in ITEM_TABLE {
        space.register_all(category, names.iter().copied())?;
    }
    for job in JOBS {
        space.register(&format!("{job} Chip"), "chips")?;
        space.register(&format!("{job} Dualchip"), "chips")?;
        space.register(&format!("{job} Chip Pack"), "chips")?;
    }
    for def in events::EVENTS {
        space.register(def.currency, &format!("event: {}", def.name))?;
    }
    Ok(space)
}

/// Build the day-recovery path for the given daily rates.
///
/// # Errors
///
/// Fails if `space` lacks the basic items or a rate is negative.
pub fn recovery_path(space: &ItemSpace, params: &CatalogParams) -> Result<TradePath, CatalogError> {
    TradePath::builder(TAG_RECOVERY)
        .cost(DAY, 1.0)
        .yields(SANITY, params.sanity_per_day)
        .yields(LMD_K, params.lmd_per_day / 1000.0)
        .yields("Tactical Battle Record", params.exp_records_per_day)
        .build(space)
}

/// Construct the full built-in catalog for one planning run.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownEvent`] for an enabled event with no
/// definition, or any validation error from the tables.
pub fn build_catalog(params: &CatalogParams) -> Result<Catalog, CatalogError> {
    let items = builtin_items()?;
    let mut paths = vec![recovery_path(&items, params)?];

    paths.push(
        TradePath::builder(TAG_TRADING_POST)
            .cost("Pure Gold", 1.0)
            .yields(LMD_K, 0.5)
            .build(&items)?,
    );
    for &(record, exp) in EXP_RECORDS {
        paths.push(
            TradePath::builder(TAG_FEED_EXP)
                .cost(record, 1.0)
                .yields(EXP_K, exp)
                .build(&items)?,
        );
    }

    shop_paths(&items, "Commendation Certificate", COMMENDATION_TIER_1, &mut paths)?;
    shop_paths(&items, "Commendation Certificate", COMMENDATION_TIER_2, &mut paths)?;
    shop_paths(&items, "Commendation Certificate", COMMENDATION_TIER_3, &mut paths)?;
    shop_paths(&items, "Distinction Certificate", DISTINCTION, &mut paths)?;
    paths.push(
        TradePath::builder("distinction shop")
            .cost("Distinction Certificate", 15.0)
            .yields("Chip Catalyst", 1.0)
            .max_count_per_day(2.0)
            .build(&items)?,
    );
    shop_paths(&items, "Purchase Certificate", PURCHASE, &mut paths)?;

    for &(inputs, (output, quantity)) in WORKSHOP {
        paths.push(TradePath::build(
            &items,
            inputs.iter().copied(),
            [(output, quantity)],
            TAG_WORKSHOP,
            PathLimits::default(),
        )?);
    }
    for job in JOBS {
        let pack = format!("{job} Chip Pack");
        let dual = format!("{job} Dualchip");
        paths.push(
            TradePath::builder(TAG_WORKSHOP)
                .cost("Chip Catalyst", 1.0)
                .cost(&pack, 2.0)
                .yields(&dual, 1.0)
                .build(&items)?,
        );
    }

    for &(code, sanity, drops) in FIXED_STAGES {
        paths.push(TradePath::build(
            &items,
            [(SANITY, sanity)],
            drops.iter().copied(),
            code,
            PathLimits::default(),
        )?);
    }
    for &(suffix, first, second) in CHIP_STAGES {
        for (stage, sanity, kind) in [(1, 18.0, "Chip"), (2, 36.0, "Chip Pack")] {
            paths.push(
                TradePath::builder(format!("PR-{suffix}-{stage}"))
                    .cost(SANITY, sanity)
                    .yields(&format!("{first} {kind}"), 0.5)
                    .yields(&format!("{second} {kind}"), 0.5)
                    .build(&items)?,
            );
        }
    }

    paths.push(
        TradePath::builder("recruitment")
            .cost("Recruitment Permit", 1.0)
            .yields("Commendation Certificate", 10.0)
            .build(&items)?,
    );
    for &(tag, bundle, per_day) in PERIODIC_REWARDS {
        paths.push(TradePath::build(
            &items,
            std::iter::empty::<(&str, f64)>(),
            bundle.iter().copied(),
            tag,
            PathLimits {
                max_count: None,
                max_count_per_day: Some(per_day),
            },
        )?);
    }

    for name in &params.enabled_events {
        let def = events::event(name).ok_or_else(|| CatalogError::UnknownEvent(name.clone()))?;
        event_paths(&items, def, &mut paths)?;
    }

    tracing::debug!(
        items = items.size(),
        paths = paths.len(),
        events = params.enabled_events.len(),
        "built-in catalog constructed"
    );
    Ok(Catalog { items, paths })
}

fn shop_paths(
    items: &ItemSpace,
    certificate: &str,
    rows: &[ShopRow],
    paths: &mut Vec<TradePath>,
) -> Result<(), CatalogError> {
    for &(tag, price, item, quantity, monthly) in rows {
        paths.push(TradePath::build(
            items,
            [(certificate, price)],
            [(item, quantity)],
            tag,
            PathLimits {
                max_count: None,
                max_count_per_day: monthly.map(|stock| stock / 30.0),
            },
        )?);
    }
    Ok(())
}

fn event_paths(
    items: &ItemSpace,
    def: &EventDefinition,
    paths: &mut Vec<TradePath>,
) -> Result<(), CatalogError> {
    let tag = format!("{TAG_EVENT_SHOP} <{}>", def.name);
    for listing in def.shop {
        paths.push(
            TradePath::builder(tag.as_str())
                .cost(def.currency, listing.price)
                .yields(listing.item, listing.quantity)
                .max_count(listing.stock)
                .build(items)?,
        );
    }
    Ok(())
}
