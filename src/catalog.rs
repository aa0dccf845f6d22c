//! Catalog index and JSON catalog loading
//!
//! A catalog source is either a single JSON file or a directory of them.
//! Each file holds an array of item records (or `{ "items": [...] }`).
//! Records that fail to deserialize are skipped with a warning so one bad
//! entry in an externally maintained catalog does not sink the whole load.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Item;

/// Read-only, id-keyed item lookup that remembers load order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Insert an item, replacing any previous record with the same id in place.
    ///
    /// Returns `true` when a record was replaced.
    pub fn insert(&mut self, item: Item) -> bool {
        match self.index.get(&item.id) {
            Some(&pos) => {
                self.items[pos] = item;
                true
            }
            None => {
                self.index.insert(item.id.clone(), self.items.len());
                self.items.push(item);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Items in load order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display name for an id, falling back to the id itself
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |item| item.name.as_str())
    }
}

/// Load a catalog from a JSON file or a directory of JSON files
pub fn load_catalog(path: &Path) -> CatalogResult<(Catalog, LoadStats)> {
    let mut catalog = Catalog::new();
    let mut stats = LoadStats::default();

    if path.is_dir() {
        let files = find_catalog_files(path)?;
        debug!("Found {} catalog files under {}", files.len(), path.display());

        for file in &files {
            match read_catalog_file(file, &mut catalog, &mut stats) {
                Ok(()) => stats.files += 1,
                Err(e) => {
                    warn!("Skipping catalog file {}: {}", file.display(), e);
                    stats.errors += 1;
                }
            }
        }
    } else {
        read_catalog_file(path, &mut catalog, &mut stats)?;
        stats.files += 1;
    }

    info!("Loaded {} catalog items from {}", catalog.len(), path.display());
    Ok((catalog, stats))
}

/// Find all `*.json` files below a directory, sorted by path
pub fn find_catalog_files(dir: &Path) -> CatalogResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| CatalogError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn read_catalog_file(path: &Path, catalog: &mut Catalog, stats: &mut LoadStats) -> CatalogResult<()> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content, catalog, stats)
}

/// Parse one JSON document of item records into `catalog`
pub fn parse_catalog(json: &str, catalog: &mut Catalog, stats: &mut LoadStats) -> CatalogResult<()> {
    let records = match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(records)) => records,
            _ => return Err(CatalogError::UnexpectedShape),
        },
        _ => return Err(CatalogError::UnexpectedShape),
    };

    for (position, record) in records.into_iter().enumerate() {
        let item = match serde_json::from_value::<Item>(record) {
            Ok(item) if item.id.trim().is_empty() => {
                warn!("Skipping catalog record #{}: empty id", position);
                stats.skipped += 1;
                continue;
            }
            Ok(item) => item,
            Err(e) => {
                warn!("Skipping malformed catalog record #{}: {}", position, e);
                stats.skipped += 1;
                continue;
            }
        };

        let item = normalize_item(item, stats);
        let id = item.id.clone();
        if catalog.insert(item) {
            warn!("Duplicate item id '{}', overwriting", id);
            stats.duplicates += 1;
        } else {
            stats.items += 1;
        }
    }

    Ok(())
}

/// Fill defaults and drop table entries that would break the positive-quantity invariant
fn normalize_item(mut item: Item, stats: &mut LoadStats) -> Item {
    if item.name.is_empty() {
        item.name = item.id.clone();
    }

    let id = item.id.clone();

    for (label, table) in [
        ("recipe", &mut item.recipe),
        ("salvagesInto", &mut item.salvages_into),
        ("recyclesInto", &mut item.recycles_into),
    ] {
        if let Some(entries) = table {
            entries.retain(|target, count| {
                if *count == 0 {
                    warn!("Item '{}': dropping zero-count {} entry '{}'", id, label, target);
                    stats.dropped_entries += 1;
                    false
                } else {
                    true
                }
            });
        }
    }

    item
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub files: usize,
    pub items: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub dropped_entries: usize,
    pub errors: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {} items from {} files. Duplicates: {}, Skipped: {}, Dropped entries: {}, Errors: {}",
            self.items, self.files, self.duplicates, self.skipped, self.dropped_entries, self.errors
        )
    }
}
