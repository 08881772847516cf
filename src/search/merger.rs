//! Merging of sub-search result lists.
//!
//! Both strategies key on [`Restaurant::restaurant_id`] for the membership
//! check and the insertion alike.

use ahash::AHashMap;
use ahash::AHashSet;

use crate::model::Restaurant;

/// Concatenate `lists`, keeping only the first occurrence of each restaurant.
pub fn merge_first_occurrence<I>(lists: I) -> Vec<Restaurant>
where
    I: IntoIterator<Item = Vec<Restaurant>>,
{
    let mut seen = AHashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for restaurant in list {
            if seen.insert(restaurant.restaurant_id.clone()) {
                merged.push(restaurant);
            }
        }
    }

    merged
}

/// Map-style merge: a later list's copy of a restaurant replaces an earlier
/// one, but keeps the position where the identifier was first seen.
pub fn merge_last_wins<I>(lists: I) -> Vec<Restaurant>
where
    I: IntoIterator<Item = Vec<Restaurant>>,
{
    let mut slots: AHashMap<String, usize> = AHashMap::new();
    let mut merged: Vec<Restaurant> = Vec::new();

    for list in lists {
        for restaurant in list {
            match slots.get(&restaurant.restaurant_id) {
                Some(&slot) => merged[slot] = restaurant,
                None => {
                    slots.insert(restaurant.restaurant_id.clone(), merged.len());
                    merged.push(restaurant);
                }
            }
        }
    }

    merged
}
