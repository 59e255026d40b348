//! Client core: date-keyed meal cache, response normalization, macro totals and
//! add/remove orchestration against the meals API.

pub mod api;
pub mod cache;
pub mod day;
pub mod error;
pub mod slots;
pub mod totals;
pub mod tracker;

pub use api::{DeleteOutcome, HttpApi, NewFoodRequest, NutritionApi};
pub use cache::{CacheEntry, NutritionCache};
pub use day::{DayMeals, FoodEntry, RawMeal, SlotMeals};
pub use error::ClientError;
pub use slots::{MealIcon, MealSlot};
pub use totals::{daily_totals, meal_totals, DailyTotals, MacroTotals};
pub use tracker::{FetchOutcome, FoodForm, Tracker, TrackerError};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("NUTRILOG_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080/api".into()),
        }
    }
}
