//! Data models for catalog items and crafting trees

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type category of the bottom of every crafting chain
pub const BASIC_MATERIAL: &str = "Basic Material";

/// Type category of weapon attachments; never suggested as salvage fodder
pub const MODIFICATION: &str = "Modification";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// A catalog item record.
///
/// Quantity tables map another item id to a positive per-unit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<BTreeMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salvages_into: Option<BTreeMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycles_into: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub is_weapon: bool,
}

impl Item {
    pub fn new(id: impl Into<String>, item_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            item_type: item_type.into(),
            rarity: Rarity::Common,
            recipe: None,
            salvages_into: None,
            recycles_into: None,
            is_weapon: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_ingredient(mut self, id: impl Into<String>, count: u32) -> Self {
        self.recipe.get_or_insert_with(BTreeMap::new).insert(id.into(), count);
        self
    }

    pub fn with_salvage(mut self, id: impl Into<String>, count: u32) -> Self {
        self.salvages_into.get_or_insert_with(BTreeMap::new).insert(id.into(), count);
        self
    }

    pub fn with_recycle(mut self, id: impl Into<String>, count: u32) -> Self {
        self.recycles_into.get_or_insert_with(BTreeMap::new).insert(id.into(), count);
        self
    }

    pub fn weapon(mut self) -> Self {
        self.is_weapon = true;
        self
    }

    pub fn is_basic_material(&self) -> bool {
        self.item_type == BASIC_MATERIAL
    }

    pub fn is_modification(&self) -> bool {
        self.item_type == MODIFICATION
    }

    /// Recipe ingredients, empty when the item cannot be crafted
    pub fn ingredients(&self) -> impl Iterator<Item = (&String, u32)> {
        self.recipe.iter().flatten().map(|(id, count)| (id, *count))
    }

    pub fn has_recipe(&self) -> bool {
        self.recipe.as_ref().is_some_and(|r| !r.is_empty())
    }

    pub fn salvages_to(&self, target: &str) -> bool {
        self.salvages_into.as_ref().is_some_and(|t| t.contains_key(target))
    }

    pub fn recycles_to(&self, target: &str) -> bool {
        self.recycles_into.as_ref().is_some_and(|t| t.contains_key(target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalvageMethod {
    Salvage,
    Recycle,
}

impl fmt::Display for SalvageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalvageMethod::Salvage => write!(f, "salvage"),
            SalvageMethod::Recycle => write!(f, "recycle"),
        }
    }
}

/// An item that can be broken down into some target material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalvageSource {
    pub item_id: String,
    pub method: SalvageMethod,
}

/// One position in the expansion of a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftingNode {
    pub item_id: String,
    /// Total units needed here, already multiplied up the chain
    pub quantity: u64,
    pub depth: usize,
    /// Satisfied by the stash; never expanded
    pub stashed: bool,
    pub children: Vec<CraftingNode>,
    pub salvage_sources: Option<Vec<SalvageSource>>,
}

impl CraftingNode {
    pub fn leaf(item_id: impl Into<String>, quantity: u64, depth: usize) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            depth,
            stashed: false,
            children: Vec::new(),
            salvage_sources: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, pre-order walk over this node and every descendant
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CraftingNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Expansion of a single goal item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftingTree {
    pub goal_item_id: String,
    pub root: CraftingNode,
    /// Ids referenced by this tree that the catalog does not know
    pub missing_items: Vec<String>,
}
