use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::slots::{MealIcon, MealSlot};

/// A logged food as the client holds it. Macro fields tolerate numeric strings; anything
/// that is not a number decodes as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// One meal record of a `GET /meals/{date}` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMeal {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
}

fn lenient_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(de)?;
    let n = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|v| v.is_finite()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotMeals {
    pub slot: MealSlot,
    /// Database id of the meal row; used as `meal_id` when creating foods.
    pub meal_id: i64,
    pub name: String,
    pub icon: MealIcon,
    pub foods: Vec<FoodEntry>,
}

impl SlotMeals {
    pub fn empty(slot: MealSlot) -> Self {
        Self {
            slot,
            meal_id: slot.default_meal_id(),
            name: slot.display_name().to_string(),
            icon: slot.default_icon(),
            foods: Vec::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.slot.key()
    }
}

/// The three meal slots of one calendar day, always in breakfast, lunch, dinner order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayMeals {
    slots: [SlotMeals; 3],
}

impl Default for DayMeals {
    fn default() -> Self {
        Self::empty()
    }
}

impl DayMeals {
    pub fn empty() -> Self {
        Self {
            slots: MealSlot::ALL.map(SlotMeals::empty),
        }
    }

    /// Normalizes a server response into the fixed slots.
    ///
    /// The first record seen for a slot supplies its id, name and icon. Later records for
    /// the same slot only contribute foods. Records that resolve to no slot are dropped
    /// with a warning.
    pub fn from_response(raw: Vec<RawMeal>) -> Self {
        let mut day = Self::empty();
        let mut seen = [false; 3];

        for meal in raw {
            let Some(slot) = MealSlot::resolve(meal.name.as_deref(), meal.id) else {
                warn!(
                    name = ?meal.name,
                    id = ?meal.id,
                    foods = meal.foods.len(),
                    "meal record matches no slot; skipped"
                );
                continue;
            };

            let target = &mut day.slots[slot.index()];
            if !seen[slot.index()] {
                seen[slot.index()] = true;
                if let Some(id) = meal.id {
                    target.meal_id = id;
                }
                if let Some(name) = meal.name.filter(|n| !n.trim().is_empty()) {
                    target.name = name;
                }
                if let Some(icon) = meal.icon.as_deref() {
                    target.icon = MealIcon::from_name(icon);
                }
            }
            target.foods.extend(meal.foods);
        }
        day
    }

    pub fn slots(&self) -> &[SlotMeals; 3] {
        &self.slots
    }

    pub fn slot(&self, slot: MealSlot) -> &SlotMeals {
        &self.slots[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut SlotMeals {
        &mut self.slots[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotMeals> {
        self.slots.iter()
    }

    pub fn push_food(&mut self, slot: MealSlot, food: FoodEntry) {
        self.slot_mut(slot).foods.push(food);
    }

    /// Returns whether an entry with that id was present.
    pub fn remove_food(&mut self, slot: MealSlot, food_id: i64) -> bool {
        let foods = &mut self.slot_mut(slot).foods;
        let before = foods.len();
        foods.retain(|f| f.id != food_id);
        foods.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.foods.is_empty())
    }
}
