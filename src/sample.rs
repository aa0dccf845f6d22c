//! Built-in demo catalog for trying the planner without external data

use crate::catalog::Catalog;
use crate::models::{BASIC_MATERIAL, Item, MODIFICATION, Rarity};

/// Sample items covering recipes, salvage and recycle tables, and the
/// excluded source kinds (weapons, modifications, basic materials)
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::new("battery", BASIC_MATERIAL).with_name("Battery"),
        Item::new("metal_parts", BASIC_MATERIAL).with_name("Metal Parts"),
        Item::new("plastic_parts", BASIC_MATERIAL).with_name("Plastic Parts"),
        Item::new("fabric", BASIC_MATERIAL).with_name("Fabric"),
        Item::new("scrap_metal", BASIC_MATERIAL)
            .with_name("Scrap Metal")
            .with_recycle("metal_parts", 1),
        Item::new("wire", "Refined Material")
            .with_name("Wire")
            .with_rarity(Rarity::Uncommon)
            .with_ingredient("battery", 3),
        Item::new("advanced_circuit", "Refined Material")
            .with_name("Advanced Circuit")
            .with_rarity(Rarity::Rare)
            .with_ingredient("wire", 2)
            .with_ingredient("plastic_parts", 1),
        Item::new("gadget", "Quick Use")
            .with_name("Gadget")
            .with_rarity(Rarity::Uncommon)
            .with_ingredient("battery", 2)
            .with_ingredient("wire", 1),
        Item::new("widget", "Quick Use")
            .with_name("Widget")
            .with_ingredient("battery", 4)
            .with_ingredient("metal_parts", 2),
        Item::new("field_kit", "Gear")
            .with_name("Field Kit")
            .with_rarity(Rarity::Epic)
            .with_ingredient("advanced_circuit", 1)
            .with_ingredient("fabric", 5)
            .with_ingredient("gadget", 2),
        Item::new("old_radio", "Trinket")
            .with_name("Old Radio")
            .with_salvage("wire", 1)
            .with_salvage("battery", 1)
            .with_recycle("wire", 2),
        Item::new("broken_flashlight", "Trinket")
            .with_name("Broken Flashlight")
            .with_recycle("battery", 2)
            .with_recycle("plastic_parts", 1),
        Item::new("rifle", "Weapon")
            .with_name("Rifle")
            .with_rarity(Rarity::Rare)
            .weapon()
            .with_ingredient("metal_parts", 6)
            .with_recycle("metal_parts", 3),
        Item::new("silencer", MODIFICATION)
            .with_name("Silencer")
            .with_salvage("metal_parts", 1),
    ]
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_items(sample_items())
}
