//! Crafting goal planner
//!
//! Expands crafting goals into their base materials, totals them across
//! goals net of the user's stash, finds salvage and recycle sources, and
//! indexes which goals need each item.

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reverse_index;
pub mod salvage;
pub mod sample;
pub mod selection;

pub use calculator::{Materials, combine, combine_stashed, expand, expand_quantity, flatten};
pub use catalog::{Catalog, LoadStats, load_catalog};
pub use config::ResolverConfig;
pub use error::{CatalogError, CatalogResult};
pub use models::{CraftingNode, CraftingTree, Item, Rarity, SalvageMethod, SalvageSource};
pub use reverse_index::{Priority, ReverseMap, UsageRecord, build_reverse_map};
pub use salvage::find_sources;
pub use selection::{Resolution, Resolver, Selection, StashToggle, resolve};
