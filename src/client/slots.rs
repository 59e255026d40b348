use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three fixed daily meal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Display order.
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn index(self) -> usize {
        match self {
            MealSlot::Breakfast => 0,
            MealSlot::Lunch => 1,
            MealSlot::Dinner => 2,
        }
    }

    /// Local slot identifier, independent of any database id.
    pub fn key(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }

    pub fn default_icon(self) -> MealIcon {
        match self {
            MealSlot::Breakfast => MealIcon::Coffee,
            MealSlot::Lunch => MealIcon::Sun,
            MealSlot::Dinner => MealIcon::Moon,
        }
    }

    /// Id of the seeded meal row for this slot.
    pub fn default_meal_id(self) -> i64 {
        self.index() as i64 + 1
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|slot| slot.key().eq_ignore_ascii_case(name))
    }

    pub fn from_meal_id(id: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.default_meal_id() == id)
    }

    /// Name first, then the seeded meal id. `None` means the record belongs to no slot.
    pub fn resolve(name: Option<&str>, meal_id: Option<i64>) -> Option<Self> {
        name.and_then(Self::from_name)
            .or_else(|| meal_id.and_then(Self::from_meal_id))
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealIcon {
    Coffee,
    Sun,
    Moon,
}

impl MealIcon {
    /// Unknown icon names display as `Coffee`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Sun" => MealIcon::Sun,
            "Moon" => MealIcon::Moon,
            _ => MealIcon::Coffee,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MealIcon::Coffee => "Coffee",
            MealIcon::Sun => "Sun",
            MealIcon::Moon => "Moon",
        }
    }
}
