//! Recipe expansion and material aggregation

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::models::{CraftingNode, CraftingTree};
use crate::salvage;

/// Leaf material id to total quantity
pub type Materials = HashMap<String, u64>;

/// Expand one goal item at quantity 1 with the default depth ceiling
pub fn expand(
    goal_id: &str,
    catalog: &Catalog,
    goal_ids: &HashSet<String>,
    stash_ids: &HashSet<String>,
) -> CraftingTree {
    expand_quantity(goal_id, 1, catalog, goal_ids, stash_ids, &ResolverConfig::default())
}

/// Expand one goal item into a quantity-weighted dependency tree.
///
/// Stashed items are satisfied leaves and their recipes are never expanded.
/// Items without a recipe, unknown ids and nodes at `config.max_depth` become
/// leaves. A repeated `(item, depth)` pair is copied from its first
/// expansion instead of being walked again, so shared sub-recipes are still
/// counted in full. Malformed or cyclic catalogs are truncated rather than
/// rejected.
pub fn expand_quantity(
    goal_id: &str,
    quantity: u64,
    catalog: &Catalog,
    goal_ids: &HashSet<String>,
    stash_ids: &HashSet<String>,
    config: &ResolverConfig,
) -> CraftingTree {
    let mut expansion = Expansion {
        catalog,
        goal_ids,
        stash_ids,
        max_depth: config.max_depth,
        expanded: HashMap::new(),
        missing: BTreeSet::new(),
    };

    let root = expansion.node(goal_id, quantity.max(1), 0);

    CraftingTree {
        goal_item_id: goal_id.to_string(),
        root,
        missing_items: expansion.missing.into_iter().collect(),
    }
}

struct Expansion<'a> {
    catalog: &'a Catalog,
    goal_ids: &'a HashSet<String>,
    stash_ids: &'a HashSet<String>,
    max_depth: usize,
    expanded: HashMap<(String, usize), CraftingNode>,
    missing: BTreeSet<String>,
}

impl Expansion<'_> {
    fn node(&mut self, item_id: &str, quantity: u64, depth: usize) -> CraftingNode {
        if self.stash_ids.contains(item_id) {
            let mut node = CraftingNode::leaf(item_id, quantity, depth);
            node.stashed = true;
            return node;
        }

        // A repeated (item, depth) pair is never expanded again; it reuses
        // the first expansion at its own quantity.
        let key = (item_id.to_string(), depth);
        if let Some(first) = self.expanded.get(&key) {
            debug!("Revisit of '{}' at depth {}, reusing first expansion", item_id, depth);
            let mut node = first.clone();
            rescale(self.catalog, &mut node, quantity);
            return node;
        }

        let node = self.expand_item(item_id, quantity, depth);
        self.expanded.insert(key, node.clone());
        node
    }

    fn expand_item(&mut self, item_id: &str, quantity: u64, depth: usize) -> CraftingNode {
        let mut node = CraftingNode::leaf(item_id, quantity, depth);

        let catalog = self.catalog;
        let Some(item) = catalog.get(item_id) else {
            warn!("Item '{}' is not in the catalog, treating it as a leaf", item_id);
            self.missing.insert(item_id.to_string());
            return node;
        };

        if !item.has_recipe() {
            return node;
        }

        if depth >= self.max_depth {
            debug!("Depth limit {} reached at '{}', truncating", self.max_depth, item_id);
            return node;
        }

        for (ingredient, count) in item.ingredients() {
            let mut child = self.node(ingredient, quantity.saturating_mul(u64::from(count)), depth + 1);

            let sources = salvage::find_sources(ingredient, catalog, self.goal_ids);
            if !sources.is_empty() {
                child.salvage_sources = Some(sources);
            }

            node.children.push(child);
        }

        node
    }
}

/// Set a copied subtree to a new root quantity, recomputing every child from
/// its parent's recipe counts.
fn rescale(catalog: &Catalog, node: &mut CraftingNode, quantity: u64) {
    node.quantity = quantity;
    if node.children.is_empty() {
        return;
    }
    let Some(item) = catalog.get(&node.item_id) else {
        return;
    };
    for (child, (_, count)) in node.children.iter_mut().zip(item.ingredients()) {
        rescale(catalog, child, quantity.saturating_mul(u64::from(count)));
    }
}

/// Sum the quantities of every unresolved leaf in a tree.
///
/// Intermediate items are only recipes and are not counted; stashed leaves
/// are already satisfied and are reported by [`stashed_items`] instead.
pub fn flatten(tree: &CraftingTree) -> Materials {
    let mut materials = Materials::new();
    tree.root.walk(&mut |node| {
        if node.is_leaf() && !node.stashed {
            add(&mut materials, &node.item_id, node.quantity);
        }
    });
    materials
}

/// Key-wise sum of [`flatten`] over several trees
pub fn combine<'a>(trees: impl IntoIterator<Item = &'a CraftingTree>) -> Materials {
    let mut materials = Materials::new();
    for tree in trees {
        for (id, quantity) in flatten(tree) {
            add(&mut materials, &id, quantity);
        }
    }
    materials
}

/// Stashed leaves of a tree and the quantity they cover
pub fn stashed_items(tree: &CraftingTree) -> Materials {
    let mut materials = Materials::new();
    tree.root.walk(&mut |node| {
        if node.stashed {
            add(&mut materials, &node.item_id, node.quantity);
        }
    });
    materials
}

/// Key-wise sum of [`stashed_items`] over several trees
pub fn combine_stashed<'a>(trees: impl IntoIterator<Item = &'a CraftingTree>) -> Materials {
    let mut materials = Materials::new();
    for tree in trees {
        for (id, quantity) in stashed_items(tree) {
            add(&mut materials, &id, quantity);
        }
    }
    materials
}

fn add(materials: &mut Materials, id: &str, quantity: u64) {
    let total = materials.entry(id.to_string()).or_default();
    *total = total.saturating_add(quantity);
}

/// Format a crafting tree as an indented listing
pub fn format_tree(tree: &CraftingTree, catalog: &Catalog) -> String {
    let mut output = String::new();
    format_node(&tree.root, catalog, 0, &mut output);
    output
}

fn format_node(node: &CraftingNode, catalog: &Catalog, indent: usize, output: &mut String) {
    let prefix = "  ".repeat(indent);
    let name = catalog.display_name(&node.item_id);

    let note = if node.stashed {
        " (in stash)".to_string()
    } else if !catalog.contains(&node.item_id) {
        " (unknown item)".to_string()
    } else if let Some(sources) = &node.salvage_sources {
        let routes: Vec<String> = sources
            .iter()
            .map(|s| format!("{} {}", s.method, catalog.display_name(&s.item_id)))
            .collect();
        format!(" [or {}]", routes.join(", "))
    } else {
        String::new()
    };

    output.push_str(&format!("{}{}x {}{}\n", prefix, node.quantity, name, note));

    for child in &node.children {
        format_node(child, catalog, indent + 1, output);
    }
}

/// Aggregate view over the trees of one resolution pass
#[derive(Debug)]
pub struct MaterialSummary {
    pub goals: Vec<String>,
    pub required: Vec<(String, u64)>,
    pub stashed: Vec<(String, u64)>,
    pub missing: Vec<String>,
}

/// Generate a summary of all required and stashed materials
pub fn summarize(trees: &[CraftingTree], catalog: &Catalog) -> MaterialSummary {
    let missing: BTreeSet<String> = trees.iter().flat_map(|t| t.missing_items.iter().cloned()).collect();

    let named = |materials: Materials| {
        let mut list: Vec<_> = materials
            .into_iter()
            .map(|(id, quantity)| (catalog.display_name(&id).to_string(), quantity))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    };

    MaterialSummary {
        goals: trees
            .iter()
            .map(|t| catalog.display_name(&t.goal_item_id).to_string())
            .collect(),
        required: named(combine(trees)),
        stashed: named(combine_stashed(trees)),
        missing: missing.into_iter().collect(),
    }
}

impl fmt::Display for MaterialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Material Summary ===")?;
        writeln!(f, "Goals: {}", self.goals.join(", "))?;
        writeln!(f)?;

        writeln!(f, "Materials required:")?;
        for (name, quantity) in &self.required {
            writeln!(f, "  {:>5}x {}", quantity, name)?;
        }

        if !self.stashed.is_empty() {
            writeln!(f)?;
            writeln!(f, "Covered by stash:")?;
            for (name, quantity) in &self.stashed {
                writeln!(f, "  {:>5}x {}", quantity, name)?;
            }
        }

        if !self.missing.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unknown items: {}", self.missing.join(", "))?;
        }

        Ok(())
    }
}
