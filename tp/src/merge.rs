//! List merge engine
//!
//! Deterministic, order-preserving merges over raw lists. Categories and items
//! are matched by [`name_key`]; the first spelling seen wins. Deduplication is
//! per category only, so the same item may appear under two categories.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Provenance, RawCategory, RawItem, item_key, name_key};
use crate::templates;

/// Ordered accumulator of categories with per-category item dedup
#[derive(Debug, Default)]
struct ListBuilder {
    categories: Vec<RawCategory>,
    index: HashMap<String, usize>,
    seen: Vec<HashSet<String>>,
}

impl ListBuilder {
    /// Position of the category, creating it at the end if new
    fn category(&mut self, name: &str) -> usize {
        let key = name_key(name);
        if let Some(&pos) = self.index.get(&key) {
            return pos;
        }
        let pos = self.categories.len();
        self.categories.push(RawCategory::new(name, Vec::new()));
        self.seen.push(HashSet::new());
        self.index.insert(key, pos);
        pos
    }

    fn contains(&self, pos: usize, name: &str) -> bool {
        self.seen[pos].contains(&name_key(name))
    }

    /// Append unless an item with the same key is already there
    fn push(&mut self, pos: usize, item: RawItem) -> bool {
        if !self.seen[pos].insert(name_key(&item.name)) {
            return false;
        }
        self.categories[pos].items.push(item);
        true
    }

    fn finish(self) -> Vec<RawCategory> {
        self.categories
    }
}

/// Merge the selected templates into one base list, every item tagged user
///
/// Templates are visited in selection order and their categories in definition
/// order. Unknown names contribute nothing.
pub fn build_base_list<S: AsRef<str>>(selected: &[S]) -> Vec<RawCategory> {
    let mut builder = ListBuilder::default();

    for name in selected {
        let name = name.as_ref();
        let Some(categories) = templates::lookup(name) else {
            debug!(%name, "build_base_list: unknown template, skipping");
            continue;
        };
        for category in categories {
            let pos = builder.category(&category.name);
            for item in category.items {
                builder.push(pos, RawItem::user(item.name));
            }
        }
    }

    let list = builder.finish();
    debug!(categories = list.len(), "build_base_list: built");
    list
}

/// Add oracle suggestions to a base list
///
/// Base categories and items come through in order, every base item tagged
/// user. A suggested category that matches a base one only contributes items
/// new to it; any other category is appended after the base ones. Added items
/// are tagged oracle. Suggested categories with a blank name are dropped.
pub fn merge_suggestions(base: Vec<RawCategory>, suggestions: Vec<RawCategory>) -> Vec<RawCategory> {
    let mut builder = ListBuilder::default();

    for mut category in base {
        for item in category.items.iter_mut() {
            item.source = Provenance::User;
        }
        let key = name_key(&category.name);
        let pos = builder.categories.len();
        builder.index.entry(key).or_insert(pos);
        builder
            .seen
            .push(category.items.iter().map(|i| name_key(&i.name)).collect());
        builder.categories.push(category);
    }

    let mut added = 0usize;
    for category in suggestions {
        if category.name.trim().is_empty() {
            debug!(items = category.items.len(), "merge_suggestions: dropping unnamed category");
            continue;
        }
        let pos = builder.category(&category.name);
        for item in category.items {
            if item.name.trim().is_empty() || builder.contains(pos, &item.name) {
                continue;
            }
            if builder.push(pos, RawItem::oracle(item.name)) {
                added += 1;
            }
        }
    }

    debug!(%added, "merge_suggestions: merged");
    builder.finish()
}

/// Fold a refined list back into a well-formed one
///
/// Repeated categories fold into the first; repeated items within a category,
/// items with blank names and categories with blank names are dropped.
pub fn normalize(list: Vec<RawCategory>) -> Vec<RawCategory> {
    let mut builder = ListBuilder::default();

    for category in list {
        if category.name.trim().is_empty() {
            debug!(items = category.items.len(), "normalize: dropping unnamed category");
            continue;
        }
        let pos = builder.category(&category.name);
        for item in category.items {
            if item.name.trim().is_empty() {
                continue;
            }
            builder.push(pos, item);
        }
    }

    builder.finish()
}

/// Restore provenance from the list the oracle was shown
///
/// An item whose (category, name) key existed before keeps its old source. An
/// item moved to another category keeps the source of the first previous item
/// with the same name. Anything else is new and tagged oracle.
pub fn restore_provenance(list: &mut [RawCategory], previous: &[RawCategory]) {
    let mut by_key: HashMap<String, Provenance> = HashMap::new();
    let mut by_name: HashMap<String, Provenance> = HashMap::new();
    for category in previous {
        for item in &category.items {
            by_key.entry(item_key(&category.name, &item.name)).or_insert(item.source);
            by_name.entry(name_key(&item.name)).or_insert(item.source);
        }
    }

    for category in list.iter_mut() {
        for item in category.items.iter_mut() {
            item.source = by_key
                .get(&item_key(&category.name, &item.name))
                .or_else(|| by_name.get(&name_key(&item.name)))
                .copied()
                .unwrap_or(Provenance::Oracle);
        }
    }
}
