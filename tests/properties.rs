//! Property tests for expansion, aggregation and the reverse index

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use craft_planner::config::{MAX_DEPTH, ResolverConfig};
use craft_planner::models::{BASIC_MATERIAL, MODIFICATION};
use craft_planner::{
    Catalog, CraftingNode, CraftingTree, Item, Materials, build_reverse_map, combine, expand, expand_quantity,
    flatten,
};

const TYPES: [&str; 3] = [BASIC_MATERIAL, "Part", MODIFICATION];

#[derive(Debug, Clone)]
struct ItemShape {
    type_index: usize,
    recipe: BTreeMap<usize, u32>,
    salvage: BTreeMap<usize, u32>,
}

fn shape_strategy(n: usize) -> impl Strategy<Value = ItemShape> {
    (
        0..TYPES.len(),
        prop::collection::btree_map(0..n, 1u32..5, 0..4),
        prop::collection::btree_map(0..n, 1u32..3, 0..3),
    )
        .prop_map(|(type_index, recipe, salvage)| ItemShape {
            type_index,
            recipe,
            salvage,
        })
}

fn id(i: usize) -> String {
    format!("item{}", i)
}

/// Random catalog; when `acyclic`, item i only uses ingredients below i
fn catalog_strategy(acyclic: bool) -> impl Strategy<Value = Catalog> {
    (2usize..12)
        .prop_flat_map(|n| prop::collection::vec(shape_strategy(n), n))
        .prop_map(move |shapes| {
            Catalog::from_items(shapes.into_iter().enumerate().map(|(i, shape)| {
                let mut item = Item::new(id(i), TYPES[shape.type_index]);
                for (ingredient, count) in shape.recipe {
                    if !acyclic || ingredient < i {
                        item = item.with_ingredient(id(ingredient), count);
                    }
                }
                for (target, count) in shape.salvage {
                    item = item.with_salvage(id(target), count);
                }
                item
            }))
        })
}

fn goal_of(catalog: &Catalog) -> String {
    catalog.iter().last().map(|item| item.id.clone()).unwrap_or_default()
}

fn goals(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn sum_maps(a: &Materials, b: &Materials) -> Materials {
    let mut total = a.clone();
    for (id, quantity) in b {
        *total.entry(id.clone()).or_default() += quantity;
    }
    total
}

fn interior(tree: &CraftingTree) -> HashSet<String> {
    let mut ids = HashSet::new();
    tree.root.walk(&mut |node: &CraftingNode| {
        if !node.is_leaf() {
            ids.insert(node.item_id.clone());
        }
    });
    ids
}

proptest! {
    #[test]
    fn flatten_never_reports_interior_items(catalog in catalog_strategy(true)) {
        let goal = goal_of(&catalog);
        let tree = expand(&goal, &catalog, &goals(&[goal.as_str()]), &HashSet::new());
        let interior_ids = interior(&tree);
        for id in flatten(&tree).keys() {
            prop_assert!(!interior_ids.contains(id), "flattened {} has children elsewhere", id);
        }
    }

    #[test]
    fn child_quantity_is_parent_times_count(catalog in catalog_strategy(true)) {
        let goal = goal_of(&catalog);
        let tree = expand(&goal, &catalog, &goals(&[goal.as_str()]), &HashSet::new());
        let mut ok = true;
        tree.root.walk(&mut |node: &CraftingNode| {
            if let Some(item) = catalog.get(&node.item_id) {
                for child in &node.children {
                    let count = item.recipe.as_ref().and_then(|r| r.get(&child.item_id)).copied();
                    ok &= count.map(u64::from) == Some(child.quantity / node.quantity)
                        && child.quantity % node.quantity == 0;
                }
            }
        });
        prop_assert!(ok);
    }

    #[test]
    fn scaling_goal_quantity_scales_leaves(catalog in catalog_strategy(true), k in 1u64..6) {
        let goal = goal_of(&catalog);
        let goal_ids = goals(&[goal.as_str()]);
        let stash = HashSet::new();
        let config = ResolverConfig::default();

        let base = flatten(&expand_quantity(&goal, 1, &catalog, &goal_ids, &stash, &config));
        let scaled = flatten(&expand_quantity(&goal, k, &catalog, &goal_ids, &stash, &config));

        let expected: Materials = base.into_iter().map(|(id, q)| (id, q * k)).collect();
        prop_assert_eq!(scaled, expected);
    }

    #[test]
    fn combine_is_keywise_sum(catalog in catalog_strategy(true)) {
        let ids: Vec<String> = catalog.iter().map(|item| item.id.clone()).collect();
        let goal_ids: HashSet<String> = ids.iter().cloned().collect();
        let stash = HashSet::new();
        let trees: Vec<CraftingTree> = ids
            .iter()
            .rev()
            .take(3)
            .map(|g| expand(g, &catalog, &goal_ids, &stash))
            .collect();

        let a = &trees[0];
        let b = &trees[1];
        prop_assert_eq!(combine([a, b]), sum_maps(&flatten(a), &flatten(b)));
        prop_assert_eq!(combine([a, b]), combine([b, a]));

        if let Some(c) = trees.get(2) {
            let left = sum_maps(&combine([a, b]), &flatten(c));
            let right = sum_maps(&flatten(a), &combine([b, c]));
            prop_assert_eq!(&left, &right);
            prop_assert_eq!(combine(&trees), left);
        }
    }

    #[test]
    fn reverse_map_is_idempotent(catalog in catalog_strategy(true)) {
        let ids: Vec<String> = catalog.iter().map(|item| item.id.clone()).collect();
        let goal_ids: HashSet<String> = ids.iter().cloned().collect();
        let stash: HashSet<String> = ids.iter().step_by(3).cloned().collect();
        let trees: Vec<CraftingTree> = ids
            .iter()
            .filter(|g| !stash.contains(*g))
            .map(|g| expand(g, &catalog, &goal_ids, &stash))
            .collect();

        let first = build_reverse_map(&trees, &catalog, &stash);
        let second = build_reverse_map(&trees, &catalog, &stash);
        prop_assert_eq!(&first, &second);
        for id in &stash {
            prop_assert!(!first.contains(id));
        }
    }

    #[test]
    fn cyclic_catalogs_terminate_within_depth(catalog in catalog_strategy(false)) {
        let goal = goal_of(&catalog);
        let tree = expand(&goal, &catalog, &goals(&[goal.as_str()]), &HashSet::new());
        let mut deepest = 0;
        tree.root.walk(&mut |node: &CraftingNode| deepest = deepest.max(node.depth));
        prop_assert!(deepest <= MAX_DEPTH);
    }

    #[test]
    fn basic_materials_never_have_sources(catalog in catalog_strategy(false)) {
        let goal = goal_of(&catalog);
        let tree = expand(&goal, &catalog, &goals(&[goal.as_str()]), &HashSet::new());
        let mut ok = true;
        tree.root.walk(&mut |node: &CraftingNode| {
            let basic = catalog.get(&node.item_id).is_some_and(|item| item.is_basic_material());
            if basic {
                ok &= node.salvage_sources.is_none();
            }
            for source in node.salvage_sources.iter().flatten() {
                let item = catalog.get(&source.item_id);
                ok &= item.is_some_and(|i| !i.is_basic_material() && !i.is_modification());
                ok &= source.item_id != goal;
            }
        });
        prop_assert!(ok);
    }
}
