//! Reverse usage index: which goals need an item, and how many of it

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::models::CraftingTree;

/// Goals that need an item and the amount they need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub goal_item_ids: BTreeSet<String>,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    High,
}

/// Item id to its usage records, in goal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReverseMap {
    entries: HashMap<String, Vec<UsageRecord>>,
}

/// Invert a set of trees into a per-item usage index.
///
/// Every node counts, not only leaves; stashed items are left out. When an
/// item appears more than once within the same goal's tree the record keeps
/// the largest quantity seen instead of the sum, so an ingredient shared by
/// sibling branches is not double counted.
pub fn build_reverse_map(trees: &[CraftingTree], catalog: &Catalog, stash_ids: &HashSet<String>) -> ReverseMap {
    let mut map = ReverseMap::default();

    for tree in trees {
        let goal = &tree.goal_item_id;
        tree.root.walk(&mut |node| {
            if node.stashed || stash_ids.contains(&node.item_id) {
                return;
            }
            if !catalog.contains(&node.item_id) {
                debug!("Indexing usage of unknown item '{}' for goal '{}'", node.item_id, goal);
            }

            let records = map.entries.entry(node.item_id.clone()).or_default();
            match records.iter_mut().find(|r| r.goal_item_ids.contains(goal)) {
                Some(record) => record.quantity = record.quantity.max(node.quantity),
                None => records.push(UsageRecord {
                    goal_item_ids: BTreeSet::from([goal.clone()]),
                    quantity: node.quantity,
                }),
            }
        });
    }

    map
}

impl ReverseMap {
    pub fn usages(&self, item_id: &str) -> &[UsageRecord] {
        self.entries.get(item_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    /// Number of distinct goals that need the item
    pub fn goal_count(&self, item_id: &str) -> usize {
        self.usages(item_id)
            .iter()
            .flat_map(|r| r.goal_item_ids.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Sum of the per-goal quantities
    pub fn total_quantity(&self, item_id: &str) -> u64 {
        self.usages(item_id)
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.quantity))
    }

    pub fn priority(&self, item_id: &str, config: &ResolverConfig) -> Priority {
        if self.goal_count(item_id) >= config.high_priority_goals {
            Priority::High
        } else {
            Priority::Normal
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<UsageRecord>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
