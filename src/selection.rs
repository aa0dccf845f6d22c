//! Goal, disabled and stash selections, and full resolution passes
//!
//! The selection is plain data owned by the caller. Every resolution pass is
//! a pure function of (catalog, selection, config); [`Resolver`] only adds a
//! last-result cache keyed on the selection snapshot.

use std::collections::HashSet;

use tracing::debug;

use crate::calculator::{self, Materials};
use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::models::CraftingTree;
use crate::reverse_index::{self, ReverseMap};

/// Outcome of a stash toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StashToggle {
    Added,
    Removed,
    /// The item is a current goal; the stash is unchanged
    RejectedGoal,
}

/// Flip stash membership of `item_id` unless it is one of `goal_ids`
pub fn toggle_stash(item_id: &str, goal_ids: &[String], stash: &mut HashSet<String>) -> StashToggle {
    if goal_ids.iter().any(|g| g == item_id) {
        debug!("Refusing to stash current goal '{}'", item_id);
        StashToggle::RejectedGoal
    } else if stash.remove(item_id) {
        StashToggle::Removed
    } else {
        stash.insert(item_id.to_string());
        StashToggle::Added
    }
}

/// Snapshot of the user's goal list, disabled goals and stash
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    goals: Vec<String>,
    disabled: HashSet<String>,
    stash: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a selection from persisted parts, restoring its invariants:
    /// goals are deduplicated, disabled ids must be goals, and goals are
    /// never stashed.
    pub fn from_parts(
        goals: impl IntoIterator<Item = String>,
        disabled: impl IntoIterator<Item = String>,
        stash: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut selection = Self::new();
        for goal in goals {
            selection.add_goal(&goal);
        }
        for id in disabled {
            if selection.is_goal(&id) {
                selection.disabled.insert(id);
            }
        }
        for id in stash {
            if !selection.is_goal(&id) {
                selection.stash.insert(id);
            }
        }
        selection
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn disabled(&self) -> &HashSet<String> {
        &self.disabled
    }

    pub fn stash(&self) -> &HashSet<String> {
        &self.stash
    }

    pub fn is_goal(&self, id: &str) -> bool {
        self.goals.iter().any(|g| g == id)
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.contains(id)
    }

    /// Goals that take part in resolution, in list order
    pub fn enabled_goals(&self) -> impl Iterator<Item = &String> {
        self.goals.iter().filter(|g| !self.disabled.contains(*g))
    }

    /// Append a goal. A stashed item that becomes a goal leaves the stash.
    ///
    /// Returns `false` if it was already a goal.
    pub fn add_goal(&mut self, id: &str) -> bool {
        if self.is_goal(id) {
            return false;
        }
        if self.stash.remove(id) {
            debug!("'{}' became a goal, removed from stash", id);
        }
        self.goals.push(id.to_string());
        true
    }

    pub fn remove_goal(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g != id);
        self.disabled.remove(id);
        self.goals.len() != before
    }

    /// Toggle whether a goal is skipped during resolution while staying listed.
    ///
    /// Returns the new disabled state, or `None` if `id` is not a goal.
    pub fn toggle_disabled(&mut self, id: &str) -> Option<bool> {
        if !self.is_goal(id) {
            return None;
        }
        if self.disabled.remove(id) {
            Some(false)
        } else {
            self.disabled.insert(id.to_string());
            Some(true)
        }
    }

    pub fn toggle_stash(&mut self, id: &str) -> StashToggle {
        toggle_stash(id, &self.goals, &mut self.stash)
    }
}

/// Output of one resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// One tree per enabled goal, in goal order
    pub trees: Vec<CraftingTree>,
    /// Materials still to collect across all trees
    pub materials: Materials,
    pub reverse_map: ReverseMap,
    /// Stashed items the trees ran into, kept so they can be restored
    pub stashed: Materials,
}

/// Run a full resolution pass over the enabled goals
pub fn resolve(catalog: &Catalog, selection: &Selection, config: &ResolverConfig) -> Resolution {
    let goal_ids: HashSet<String> = selection.enabled_goals().cloned().collect();

    let trees: Vec<CraftingTree> = selection
        .enabled_goals()
        .map(|goal| calculator::expand_quantity(goal, 1, catalog, &goal_ids, &selection.stash, config))
        .collect();

    Resolution {
        materials: calculator::combine(&trees),
        reverse_map: reverse_index::build_reverse_map(&trees, catalog, &selection.stash),
        stashed: calculator::combine_stashed(&trees),
        trees,
    }
}

/// Resolution with a single-entry cache on the selection snapshot.
///
/// A resolver assumes the catalog it is called with does not change;
/// call [`Resolver::invalidate`] after swapping catalogs.
#[derive(Debug, Default)]
pub struct Resolver {
    config: ResolverConfig,
    cached: Option<(Selection, Resolution)>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config, cached: None }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&mut self, catalog: &Catalog, selection: &Selection) -> &Resolution {
        if self.cached.as_ref().is_some_and(|(key, _)| key == selection) {
            debug!("Selection unchanged, reusing resolution");
        } else {
            self.cached = None;
        }

        let config = self.config;
        let (_, resolution) = self
            .cached
            .get_or_insert_with(|| (selection.clone(), resolve(catalog, selection, &config)));
        resolution
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
