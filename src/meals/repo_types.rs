use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Meal reference row. Seeded by migration, never written by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: i32,
    pub name: String,
    pub icon: String,
}

/// Food record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: i64,
    pub meal_id: i32,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: Date,
}

/// One row of the meals ⋈ foods join for a single date.
#[derive(Debug, Clone, FromRow)]
pub struct MealFoodRow {
    pub meal_id: i32,
    pub meal_name: String,
    pub meal_icon: String,
    pub food_id: i64,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: Date,
}

/// Validated input for a food insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub meal_id: i32,
    pub date: Date,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}
