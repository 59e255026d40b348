use std::sync::Mutex;

use async_trait::async_trait;
use time::Date;

use super::repo::MealRepo;
use super::repo_types::{Food, Meal, MealFoodRow, NewFood};

/// In-process store with the same observable behavior as [`super::repo::PgMealRepo`].
/// Seeded with the three reference meals.
pub struct MemoryMealRepo {
    inner: Mutex<Inner>,
}

struct Inner {
    meals: Vec<Meal>,
    foods: Vec<Food>,
    next_food_id: i64,
}

impl MemoryMealRepo {
    pub fn seeded() -> Self {
        let meals = [(1, "Breakfast", "Coffee"), (2, "Lunch", "Sun"), (3, "Dinner", "Moon")]
            .into_iter()
            .map(|(id, name, icon)| Meal {
                id,
                name: name.into(),
                icon: icon.into(),
            })
            .collect();
        Self {
            inner: Mutex::new(Inner {
                meals,
                foods: Vec::new(),
                next_food_id: 1,
            }),
        }
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory repo lock poisoned"))
    }
}

#[async_trait]
impl MealRepo for MemoryMealRepo {
    async fn rows_for_date(&self, date: Date) -> anyhow::Result<Vec<MealFoodRow>> {
        let inner = self.lock()?;
        let mut rows: Vec<MealFoodRow> = inner
            .foods
            .iter()
            .filter(|f| f.date == date)
            .filter_map(|f| {
                let meal = inner.meals.iter().find(|m| m.id == f.meal_id)?;
                Some(MealFoodRow {
                    meal_id: meal.id,
                    meal_name: meal.name.clone(),
                    meal_icon: meal.icon.clone(),
                    food_id: f.id,
                    food_name: f.name.clone(),
                    calories: f.calories,
                    protein: f.protein,
                    carbs: f.carbs,
                    fat: f.fat,
                    date: f.date,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.meal_id, r.food_id));
        Ok(rows)
    }

    async fn meal_exists(&self, meal_id: i32) -> anyhow::Result<bool> {
        Ok(self.lock()?.meals.iter().any(|m| m.id == meal_id))
    }

    async fn insert_food(&self, food: &NewFood) -> anyhow::Result<Food> {
        let mut inner = self.lock()?;
        anyhow::ensure!(
            inner.meals.iter().any(|m| m.id == food.meal_id),
            "meal {} does not exist",
            food.meal_id
        );
        let id = inner.next_food_id;
        inner.next_food_id += 1;
        let row = Food {
            id,
            meal_id: food.meal_id,
            name: food.name.clone(),
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            date: food.date,
        };
        inner.foods.push(row.clone());
        Ok(row)
    }

    async fn delete_food(&self, food_id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.foods.len();
        inner.foods.retain(|f| f.id != food_id);
        Ok(inner.foods.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn oats(meal_id: i32, date: Date) -> NewFood {
        NewFood {
            meal_id,
            date,
            name: "Oats".into(),
            calories: 300.0,
            protein: 10.0,
            carbs: 50.0,
            fat: 5.0,
        }
    }

    #[tokio::test]
    async fn rows_are_filtered_by_date_and_ordered() {
        let repo = MemoryMealRepo::seeded();
        let day = date!(2024 - 03 - 05);
        repo.insert_food(&oats(3, day)).await.unwrap();
        repo.insert_food(&oats(1, day)).await.unwrap();
        repo.insert_food(&oats(1, date!(2024 - 03 - 06))).await.unwrap();

        let rows = repo.rows_for_date(day).await.unwrap();
        let keys: Vec<_> = rows.iter().map(|r| (r.meal_id, r.food_id)).collect();
        assert_eq!(keys, vec![(1, 2), (3, 1)]);
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() {
        let repo = MemoryMealRepo::seeded();
        let food = repo.insert_food(&oats(2, date!(2024 - 03 - 05))).await.unwrap();
        assert!(repo.delete_food(food.id).await.unwrap());
        assert!(!repo.delete_food(food.id).await.unwrap());
    }

    #[tokio::test]
    async fn insert_rejects_unknown_meal() {
        let repo = MemoryMealRepo::seeded();
        assert!(!repo.meal_exists(42).await.unwrap());
        assert!(repo.insert_food(&oats(42, date!(2024 - 03 - 05))).await.is_err());
    }
}
