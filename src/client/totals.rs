use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

use super::day::{DayMeals, FoodEntry, SlotMeals};
use super::slots::MealSlot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTotals {
    /// Missing macros count as zero.
    pub fn of_food(food: &FoodEntry) -> Self {
        Self {
            calories: food.calories.unwrap_or(0.0),
            protein: food.protein.unwrap_or(0.0),
            carbs: food.carbs.unwrap_or(0.0),
            fat: food.fat.unwrap_or(0.0),
        }
    }

    pub fn of_foods<'a>(foods: impl IntoIterator<Item = &'a FoodEntry>) -> Self {
        foods.into_iter().map(Self::of_food).sum()
    }
}

impl Add for MacroTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotals {
    /// Indexed by [`MealSlot::index`].
    pub meals: [MacroTotals; 3],
    pub day: MacroTotals,
}

impl DailyTotals {
    pub fn meal(&self, slot: MealSlot) -> MacroTotals {
        self.meals[slot.index()]
    }
}

pub fn meal_totals(meal: &SlotMeals) -> MacroTotals {
    MacroTotals::of_foods(&meal.foods)
}

pub fn daily_totals(day: &DayMeals) -> DailyTotals {
    let meals = MealSlot::ALL.map(|slot| meal_totals(day.slot(slot)));
    DailyTotals {
        meals,
        day: meals.into_iter().sum(),
    }
}
