use serde_json::Value;
use tracing::{info, warn};

use crate::dates::DateKey;
use crate::error::{AppError, FieldErrors};
use crate::meals::dto::{CreatedFood, FoodItem, MealWithFoods};
use crate::meals::repo::MealRepo;
use crate::meals::repo_types::{MealFoodRow, NewFood};

const MACRO_FIELDS: [&str; 4] = ["calories", "protein", "carbs", "fat"];

/// Meals that have at least one food on `date`, each with only that date's foods.
pub async fn meals_for_date(
    repo: &dyn MealRepo,
    date: DateKey,
) -> Result<Vec<MealWithFoods>, AppError> {
    let rows = repo.rows_for_date(date.date()).await?;
    let meals = group_by_meal(rows);
    if meals.is_empty() {
        return Err(AppError::NoMealsForDate(date));
    }
    Ok(meals)
}

pub async fn create_food(repo: &dyn MealRepo, body: &Value) -> Result<CreatedFood, AppError> {
    let new_food = parse_new_food(body)?;

    if !repo.meal_exists(new_food.meal_id).await? {
        warn!(meal_id = new_food.meal_id, "create_food unknown meal");
        return Err(AppError::invalid_field(
            "meal_id",
            "The selected meal id is invalid.",
        ));
    }

    let food = repo.insert_food(&new_food).await?;
    info!(food_id = food.id, meal_id = food.meal_id, date = %food.date, "food created");
    Ok(food.into())
}

pub async fn delete_food(repo: &dyn MealRepo, food_id: i64) -> Result<(), AppError> {
    if !repo.delete_food(food_id).await? {
        return Err(AppError::FoodNotFound(food_id));
    }
    info!(food_id, "food deleted");
    Ok(())
}

/// Folds joined rows into per-meal groups. Rows arrive ordered by meal id, but grouping
/// does not depend on that.
pub fn group_by_meal(rows: Vec<MealFoodRow>) -> Vec<MealWithFoods> {
    let mut meals: Vec<MealWithFoods> = Vec::new();
    for row in rows {
        let food = FoodItem {
            id: row.food_id,
            name: row.food_name,
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fat: row.fat,
            date: DateKey::new(row.date),
        };
        match meals.iter_mut().find(|m| m.id == row.meal_id) {
            Some(meal) => meal.foods.push(food),
            None => meals.push(MealWithFoods {
                id: row.meal_id,
                name: row.meal_name,
                icon: row.meal_icon,
                foods: vec![food],
            }),
        }
    }
    meals
}

/// Validates a create-food body. Every problem is collected, not just the first.
pub fn parse_new_food(body: &Value) -> Result<NewFood, AppError> {
    let mut errors = FieldErrors::new();
    let field = |name: &str| body.get(name).filter(|v| !is_blank(v));

    let meal_id = match field("meal_id") {
        None => {
            errors.insert("meal_id", vec!["The meal id field is required.".into()]);
            None
        }
        Some(v) => match as_integer(v).and_then(|n| i32::try_from(n).ok()) {
            Some(id) => Some(id),
            None => {
                errors.insert("meal_id", vec!["The selected meal id is invalid.".into()]);
                None
            }
        },
    };

    let date = match field("date") {
        None => {
            errors.insert("date", vec!["The date field is required.".into()]);
            None
        }
        Some(v) => match v.as_str().map(DateKey::parse) {
            Some(Ok(d)) => Some(d),
            _ => {
                errors.insert(
                    "date",
                    vec!["The date field must be a valid date (YYYY-MM-DD).".into()],
                );
                None
            }
        },
    };

    let name = match field("name") {
        None => {
            errors.insert("name", vec!["The name field is required.".into()]);
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.insert("name", vec!["The name field must be a string.".into()]);
            None
        }
    };

    let mut macros = [0.0_f64; 4];
    for (slot, key) in macros.iter_mut().zip(MACRO_FIELDS) {
        match field(key).map(as_number) {
            None => {
                errors.insert(key, vec![format!("The {key} field is required.")]);
            }
            Some(None) => {
                errors.insert(key, vec![format!("The {key} field must be a number.")]);
            }
            Some(Some(n)) if n < 0.0 => {
                errors.insert(key, vec![format!("The {key} field must be at least 0.")]);
            }
            Some(Some(n)) => *slot = n,
        }
    }

    match (meal_id, date, name) {
        (Some(meal_id), Some(date), Some(name)) if errors.is_empty() => {
            let [calories, protein, carbs, fat] = macros;
            Ok(NewFood {
                meal_id,
                date: date.date(),
                name,
                calories,
                protein,
                carbs,
                fat,
            })
        }
        _ => {
            warn!(fields = ?errors.keys().collect::<Vec<_>>(), "create_food validation failed");
            Err(AppError::validation(errors))
        }
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn row(meal_id: i32, food_id: i64, calories: f64) -> MealFoodRow {
        let (meal_name, meal_icon) = match meal_id {
            1 => ("Breakfast", "Coffee"),
            2 => ("Lunch", "Sun"),
            _ => ("Dinner", "Moon"),
        };
        MealFoodRow {
            meal_id,
            meal_name: meal_name.into(),
            meal_icon: meal_icon.into(),
            food_id,
            food_name: format!("food-{food_id}"),
            calories,
            protein: 1.0,
            carbs: 2.0,
            fat: 3.0,
            date: date!(2024 - 03 - 05),
        }
    }

    #[test]
    fn group_by_meal_keeps_row_order_and_merges_foods() {
        let meals = group_by_meal(vec![row(1, 10, 100.0), row(1, 11, 200.0), row(3, 12, 50.0)]);
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].name, "Breakfast");
        assert_eq!(
            meals[0].foods.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(meals[1].icon, "Moon");
        assert_eq!(meals[1].foods[0].date.to_string(), "2024-03-05");
    }

    #[test]
    fn group_by_meal_of_nothing_is_empty() {
        assert!(group_by_meal(Vec::new()).is_empty());
    }

    #[test]
    fn parse_accepts_numbers_and_numeric_strings() {
        let food = parse_new_food(&json!({
            "meal_id": "1",
            "date": "2024-03-05",
            "name": "  Oats ",
            "calories": 300,
            "protein": "10",
            "carbs": 50.5,
            "fat": " 5 "
        }))
        .unwrap();
        assert_eq!(
            food,
            NewFood {
                meal_id: 1,
                date: date!(2024 - 03 - 05),
                name: "Oats".into(),
                calories: 300.0,
                protein: 10.0,
                carbs: 50.5,
                fat: 5.0,
            }
        );
    }

    #[test]
    fn parse_collects_every_field_error() {
        let err = parse_new_food(&json!({
            "meal_id": 1,
            "date": "05/03/2024",
            "name": "",
            "calories": "lots",
            "protein": -1,
            "carbs": 0
        }))
        .unwrap_err();
        let AppError::Validation { errors, .. } = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.keys().copied().collect();
        assert_eq!(fields, vec!["calories", "date", "fat", "name", "protein"]);
        assert_eq!(errors["fat"], vec!["The fat field is required.".to_string()]);
        assert_eq!(
            errors["protein"],
            vec!["The protein field must be at least 0.".to_string()]
        );
    }

    #[test]
    fn parse_rejects_non_object_bodies() {
        let err = parse_new_food(&json!(["Oats"])).unwrap_err();
        let AppError::Validation { errors, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn parse_rejects_fractional_meal_id() {
        let err = parse_new_food(&json!({
            "meal_id": 1.5, "date": "2024-03-05", "name": "x",
            "calories": 1, "protein": 1, "carbs": 1, "fat": 1
        }))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref errors, .. } if errors.contains_key("meal_id")));
    }
}
