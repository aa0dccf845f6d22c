//! Alternative acquisition routes: items that break down into a material

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{SalvageMethod, SalvageSource};

/// Find every catalog item that yields `target` through salvage or recycle.
///
/// Excluded candidates: basic materials, current goals, weapons,
/// modifications and the target itself. A basic-material target never has
/// sources. When a candidate both salvages and recycles into the target only
/// the salvage route is reported. Results follow catalog order.
pub fn find_sources(target: &str, catalog: &Catalog, goal_ids: &HashSet<String>) -> Vec<SalvageSource> {
    match catalog.get(target) {
        Some(item) if item.is_basic_material() => return Vec::new(),
        Some(_) => {}
        None => debug!("Salvage target '{}' is not in the catalog", target),
    }

    catalog
        .iter()
        .filter(|candidate| {
            candidate.id != target
                && !candidate.is_basic_material()
                && !candidate.is_weapon
                && !candidate.is_modification()
                && !goal_ids.contains(&candidate.id)
        })
        .filter_map(|candidate| {
            let method = if candidate.salvages_to(target) {
                SalvageMethod::Salvage
            } else if candidate.recycles_to(target) {
                SalvageMethod::Recycle
            } else {
                return None;
            };
            Some(SalvageSource {
                item_id: candidate.id.clone(),
                method,
            })
        })
        .collect()
}
