use serde::{Deserialize, Serialize};

use crate::dates::DateKey;
use crate::meals::repo_types::Food;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: DateKey,
}

/// A meal together with the foods logged against it on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealWithFoods {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub foods: Vec<FoodItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedFood {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: DateKey,
    pub meal_id: i32,
}

impl From<Food> for CreatedFood {
    fn from(f: Food) -> Self {
        Self {
            id: f.id,
            name: f.name,
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fat: f.fat,
            date: DateKey::new(f.date),
            meal_id: f.meal_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFoodResponse {
    pub message: String,
    pub food: CreatedFood,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
