use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::dates::DateKey;

use super::api::{DeleteOutcome, NewFoodRequest, NutritionApi};
use super::cache::{CacheEntry, NutritionCache};
use super::day::{DayMeals, FoodEntry};
use super::error::ClientError;
use super::slots::MealSlot;
use super::totals::{daily_totals, DailyTotals};

pub const LOAD_FAILED: &str = "Failed to load meals data";
pub const ADD_FAILED: &str = "Failed to add food";
pub const REMOVE_FAILED: &str = "Failed to remove food";

/// Add-food form input. Only `name` and `calories` are required; the other macros
/// default to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodForm {
    pub name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("{message}: {source}")]
    Api {
        message: &'static str,
        #[source]
        source: ClientError,
    },
}

/// How a date selection was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    CacheHit,
    Loaded,
    /// The backend had nothing for the date; empty defaults were cached.
    Empty,
    /// The fetch failed; empty defaults were cached and the error message set.
    Failed,
}

/// One user session: a selected date, the per-date cache and the last user-visible error.
///
/// The cache is only changed after the backend confirms a write.
pub struct Tracker<A> {
    api: A,
    cache: NutritionCache,
    selected: DateKey,
    error: Option<String>,
    defaults: DayMeals,
}

impl<A: NutritionApi> Tracker<A> {
    /// Creates a session on `date` without fetching; call [`Tracker::select_date`] to load.
    pub fn new(api: A, date: impl Into<DateKey>) -> Self {
        Self {
            api,
            cache: NutritionCache::new(),
            selected: date.into(),
            error: None,
            defaults: DayMeals::empty(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &NutritionCache {
        &self.cache
    }

    pub fn selected(&self) -> DateKey {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.cache.entry(self.selected), Some(CacheEntry::Loading))
    }

    /// Meals for the selected date, or the empty defaults if nothing is cached yet.
    pub fn meals(&self) -> &DayMeals {
        self.cache.get(self.selected).unwrap_or(&self.defaults)
    }

    pub fn totals(&self) -> DailyTotals {
        daily_totals(self.meals())
    }

    #[instrument(skip(self, date))]
    pub async fn select_date(&mut self, date: impl Into<DateKey> + Send) -> FetchOutcome {
        self.selected = date.into();
        if self.cache.has(self.selected) {
            debug!(date = %self.selected, "cache hit");
            return FetchOutcome::CacheHit;
        }
        self.load(self.selected).await
    }

    /// Clears the error and re-fetches the selected date if its last fetch failed.
    pub async fn retry(&mut self) -> FetchOutcome {
        self.error = None;
        if self.cache.has(self.selected) && !self.cache.is_failed(self.selected) {
            return FetchOutcome::CacheHit;
        }
        self.cache.remove(self.selected);
        self.load(self.selected).await
    }

    async fn load(&mut self, key: DateKey) -> FetchOutcome {
        self.cache.mark_loading(key);
        self.error = None;
        debug!(date = %key, "fetching meals");

        match self.api.fetch_day(key).await {
            Ok(Some(raw)) if !raw.is_empty() => {
                self.cache.set(key, DayMeals::from_response(raw));
                FetchOutcome::Loaded
            }
            Ok(_) => {
                debug!(date = %key, "no meals for date; using defaults");
                self.cache.set(key, DayMeals::empty());
                FetchOutcome::Empty
            }
            Err(e) => {
                warn!(error = %e, date = %key, "fetch meals failed");
                self.error = Some(LOAD_FAILED.into());
                self.cache.mark_failed(key);
                FetchOutcome::Failed
            }
        }
    }

    /// Creates a food in `slot` on the selected date and appends the server's copy.
    /// A date that was never fetched is left unpopulated so its next selection loads
    /// everything from the backend.
    #[instrument(skip(self, form))]
    pub async fn add_food(
        &mut self,
        slot: MealSlot,
        form: FoodForm,
    ) -> Result<FoodEntry, TrackerError> {
        let name = form.name.trim();
        let Some(calories) = form.calories.filter(|_| !name.is_empty()) else {
            return Err(TrackerError::InvalidInput(
                "Food name and calories are required",
            ));
        };

        let key = self.selected;
        let request = NewFoodRequest {
            meal_id: self.meals().slot(slot).meal_id,
            date: key,
            name: name.to_string(),
            calories,
            protein: form.protein.unwrap_or(0.0),
            carbs: form.carbs.unwrap_or(0.0),
            fat: form.fat.unwrap_or(0.0),
        };

        let food = match self.api.create_food(&request).await {
            Ok(food) => food,
            Err(source) => {
                warn!(error = %source, %slot, "add food failed");
                self.error = Some(ADD_FAILED.into());
                return Err(TrackerError::Api {
                    message: ADD_FAILED,
                    source,
                });
            }
        };

        info!(food_id = food.id, %slot, date = %key, "food added");
        if let Some(day) = self.cache.meals_mut(key) {
            day.push_food(slot, food.clone());
        }
        Ok(food)
    }

    /// Deletes a food by server id. A food already gone server-side is still removed
    /// locally.
    #[instrument(skip(self))]
    pub async fn remove_food(&mut self, slot: MealSlot, food_id: i64) -> Result<(), TrackerError> {
        let key = self.selected;
        match self.api.delete_food(food_id).await {
            Ok(DeleteOutcome::Deleted) => info!(food_id, %slot, date = %key, "food removed"),
            Ok(DeleteOutcome::NotFound) => debug!(food_id, "food already gone"),
            Err(source) => {
                warn!(error = %source, food_id, "remove food failed");
                self.error = Some(REMOVE_FAILED.into());
                return Err(TrackerError::Api {
                    message: REMOVE_FAILED,
                    source,
                });
            }
        }
        if let Some(day) = self.cache.meals_mut(key) {
            day.remove_food(slot, food_id);
        }
        Ok(())
    }
}
