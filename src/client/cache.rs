use std::collections::HashMap;

use crate::dates::DateKey;

use super::day::DayMeals;

/// Per-date lifecycle: absent → `Loading` → `Ready` | `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Loading,
    /// Server data, or empty defaults when the server had nothing for the date.
    Ready(DayMeals),
    /// Empty defaults installed after a failed fetch.
    Failed(DayMeals),
}

impl CacheEntry {
    pub fn meals(&self) -> Option<&DayMeals> {
        match self {
            CacheEntry::Loading => None,
            CacheEntry::Ready(day) | CacheEntry::Failed(day) => Some(day),
        }
    }

    pub fn is_populated(&self) -> bool {
        !matches!(self, CacheEntry::Loading)
    }
}

/// Session-scoped date → meals cache. Entries are never evicted.
#[derive(Debug, Default)]
pub struct NutritionCache {
    entries: HashMap<DateKey, CacheEntry>,
}

impl NutritionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the date is populated by either path. A `Loading` entry does not count.
    pub fn has(&self, key: DateKey) -> bool {
        self.entries.get(&key).is_some_and(CacheEntry::is_populated)
    }

    pub fn get(&self, key: DateKey) -> Option<&DayMeals> {
        self.entries.get(&key).and_then(CacheEntry::meals)
    }

    pub fn entry(&self, key: DateKey) -> Option<&CacheEntry> {
        self.entries.get(&key)
    }

    pub fn set(&mut self, key: DateKey, day: DayMeals) {
        self.entries.insert(key, CacheEntry::Ready(day));
    }

    pub fn mark_loading(&mut self, key: DateKey) {
        self.entries.insert(key, CacheEntry::Loading);
    }

    pub fn mark_failed(&mut self, key: DateKey) {
        self.entries.insert(key, CacheEntry::Failed(DayMeals::empty()));
    }

    pub fn is_failed(&self, key: DateKey) -> bool {
        matches!(self.entries.get(&key), Some(CacheEntry::Failed(_)))
    }

    /// Meals for `key` for in-place patching. `None` unless a fetch has populated the date.
    pub fn meals_mut(&mut self, key: DateKey) -> Option<&mut DayMeals> {
        match self.entries.get_mut(&key)? {
            CacheEntry::Loading => None,
            CacheEntry::Ready(day) | CacheEntry::Failed(day) => Some(day),
        }
    }

    pub fn remove(&mut self, key: DateKey) -> Option<CacheEntry> {
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::day::FoodEntry;
    use crate::client::slots::MealSlot;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    #[test]
    fn loading_is_not_populated() {
        let mut cache = NutritionCache::new();
        let k = key("2024-03-05");
        assert!(!cache.has(k));
        cache.mark_loading(k);
        assert!(!cache.has(k));
        assert_eq!(cache.get(k), None);
        assert_eq!(cache.entry(k), Some(&CacheEntry::Loading));

        cache.set(k, DayMeals::empty());
        assert!(cache.has(k));
        assert_eq!(cache.get(k), Some(&DayMeals::empty()));
    }

    #[test]
    fn failed_entries_hold_defaults() {
        let mut cache = NutritionCache::new();
        let k = key("2024-03-06");
        cache.mark_loading(k);
        cache.mark_failed(k);
        assert!(cache.has(k));
        assert!(cache.is_failed(k));
        assert_eq!(cache.get(k), Some(&DayMeals::empty()));
    }

    #[test]
    fn meals_mut_only_patches_populated_dates() {
        let mut cache = NutritionCache::new();
        let k = key("2024-03-07");
        assert!(cache.meals_mut(k).is_none());
        cache.mark_loading(k);
        assert!(cache.meals_mut(k).is_none());
        assert!(!cache.has(k));

        cache.set(k, DayMeals::empty());
        cache.meals_mut(k).unwrap().push_food(
            MealSlot::Lunch,
            FoodEntry {
                id: 1,
                name: "Salad".into(),
                calories: Some(150.0),
                protein: None,
                carbs: None,
                fat: None,
                date: Some("2024-03-07".into()),
            },
        );
        assert_eq!(cache.get(k).unwrap().slot(MealSlot::Lunch).foods.len(), 1);
    }
}
