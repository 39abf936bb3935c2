//! Packed-state reconciliation
//!
//! Identity for rendering and identity for state are kept apart: every
//! full-list replacement mints fresh identifiers, while packed flags travel by
//! `(category, item name)` key.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{IdKind, PackingCategory, PackingItem, PackingList, RawCategory, generate_id, item_key};

/// Packed flags of a list, by item key
pub fn packed_state(list: &[PackingCategory]) -> HashMap<String, bool> {
    list.iter()
        .flat_map(|c| c.items.iter().map(move |i| (item_key(&c.name, &i.name), i.packed)))
        .collect()
}

/// Turn a raw list into a persisted one with fresh identifiers, nothing packed
pub fn mint_list(raw: Vec<RawCategory>) -> PackingList {
    carry_packed_state(&[], raw)
}

/// Build the replacement for `old`, carrying packed flags over by key
///
/// Items whose key existed in `old` keep its flag; every other item starts
/// unpacked. Every category and item gets a new identifier.
pub fn carry_packed_state(old: &[PackingCategory], new: Vec<RawCategory>) -> PackingList {
    let state = packed_state(old);
    let mut carried = 0usize;

    let list: PackingList = new
        .into_iter()
        .map(|category| {
            let items = category
                .items
                .into_iter()
                .map(|item| {
                    let packed = state.get(&item_key(&category.name, &item.name)).copied().unwrap_or(false);
                    carried += usize::from(packed);
                    PackingItem {
                        id: generate_id(IdKind::Item),
                        name: item.name,
                        source: item.source,
                        packed,
                    }
                })
                .collect();
            PackingCategory {
                id: generate_id(IdKind::Category),
                name: category.name,
                items,
            }
        })
        .collect();

    debug!(categories = list.len(), %carried, "carry_packed_state: built");
    list
}

/// Flip one item's packed flag in place
///
/// Returns the new flag, or `None` when either position is out of range (the
/// list is then unchanged). Identifiers are never touched.
pub fn toggle(list: &mut [PackingCategory], category_index: usize, item_index: usize) -> Option<bool> {
    let item = list.get_mut(category_index)?.items.get_mut(item_index)?;
    item.packed = !item.packed;
    debug!(%category_index, %item_index, packed = item.packed, "toggle: flipped");
    Some(item.packed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Provenance, RawItem, simplify};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn sample() -> PackingList {
        let mut list = mint_list(vec![
            RawCategory::new("ציוד חיוני", vec![RawItem::user("אולר"), RawItem::user("כובעים")]),
            RawCategory::new("Hiking", vec![RawItem::oracle("Headlamp")]),
        ]);
        list[0].items[1].packed = true;
        list[1].items[0].packed = true;
        list
    }

    #[test]
    fn test_mint_list_fresh_and_unpacked() {
        let list = sample();
        let ids: HashSet<&str> = list
            .iter()
            .map(|c| c.id.as_str())
            .chain(list.iter().flat_map(|c| c.items.iter().map(|i| i.id.as_str())))
            .collect();
        assert_eq!(ids.len(), 5);

        let fresh = mint_list(vec![RawCategory::new("A", vec![RawItem::user("x")])]);
        assert!(!fresh[0].items[0].packed);
        assert!(fresh[0].id.starts_with("cat-"));
        assert!(fresh[0].items[0].id.starts_with("item-"));
    }

    #[test]
    fn test_carry_packed_state_by_key() {
        let old = sample();
        let new = vec![
            RawCategory::new(" ציוד חיוני ", vec![RawItem::user("כובעים"), RawItem::oracle("מפה")]),
            RawCategory::new("hiking", vec![RawItem::oracle("HEADLAMP")]),
            RawCategory::new("Other", vec![RawItem::oracle("Headlamp")]),
        ];

        let list = carry_packed_state(&old, new);

        assert!(list[0].items[0].packed);
        assert!(!list[0].items[1].packed);
        assert!(list[1].items[0].packed);
        // Same name, different category: no carryover
        assert!(!list[2].items[0].packed);
        // Every id is new
        assert_ne!(list[0].items[0].id, old[0].items[1].id);
        assert_eq!(list[0].items[1].source, Provenance::Oracle);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut list = sample();
        let before = list.clone();
        assert_eq!(toggle(&mut list, 5, 0), None);
        assert_eq!(toggle(&mut list, 0, 9), None);
        assert_eq!(list, before);
    }

    #[test]
    fn test_toggle_keeps_ids() {
        let mut list = sample();
        let id = list[0].items[0].id.clone();
        assert_eq!(toggle(&mut list, 0, 0), Some(true));
        assert_eq!(list[0].items[0].id, id);
    }

    fn raw_list() -> impl Strategy<Value = Vec<RawCategory>> {
        let item = "[a-d]{1,2}".prop_map(|n: String| RawItem::user(n));
        let category = ("[pqr]", prop::collection::vec(item, 0..6)).prop_map(|(n, items)| RawCategory::new(n, items));
        prop::collection::vec(category, 1..4)
    }

    proptest! {
        #[test]
        fn prop_toggle_is_self_inverse(raw in raw_list(), ci in 0usize..5, ii in 0usize..8) {
            let mut list = mint_list(raw);
            let before = list.clone();
            let first = toggle(&mut list, ci, ii);
            let second = toggle(&mut list, ci, ii);
            prop_assert_eq!(first.is_some(), second.is_some());
            prop_assert_eq!(list, before);
        }

        #[test]
        fn prop_packed_flags_follow_keys(raw in raw_list(), flips in prop::collection::vec((0usize..4, 0usize..6), 0..10), next in raw_list()) {
            let mut old = mint_list(raw);
            for (ci, ii) in flips {
                toggle(&mut old, ci, ii);
            }
            let state = packed_state(&old);

            let list = carry_packed_state(&old, next);
            for category in &list {
                for item in &category.items {
                    let expected = state.get(&item_key(&category.name, &item.name)).copied().unwrap_or(false);
                    prop_assert_eq!(item.packed, expected);
                }
            }
        }

        #[test]
        fn prop_replacing_with_same_list_keeps_flags(raw in raw_list(), flips in prop::collection::vec((0usize..4, 0usize..6), 0..10)) {
            // Only meaningful without duplicate keys
            let raw = crate::merge::normalize(raw);
            let mut old = mint_list(raw);
            for (ci, ii) in flips {
                toggle(&mut old, ci, ii);
            }

            let list = carry_packed_state(&old, simplify(&old));
            let flags = |l: &PackingList| l.iter().flat_map(|c| c.items.iter().map(|i| i.packed)).collect::<Vec<_>>();
            prop_assert_eq!(flags(&list), flags(&old));
        }
    }
}
