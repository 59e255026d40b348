use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use super::repo_types::{Food, MealFoodRow, NewFood};

/// Persistence seam for meals and foods.
#[async_trait]
pub trait MealRepo: Send + Sync {
    /// Joined meal/food rows for one date, ordered by meal id then food id.
    async fn rows_for_date(&self, date: Date) -> anyhow::Result<Vec<MealFoodRow>>;
    async fn meal_exists(&self, meal_id: i32) -> anyhow::Result<bool>;
    async fn insert_food(&self, food: &NewFood) -> anyhow::Result<Food>;
    /// Returns `false` when no food had that id.
    async fn delete_food(&self, food_id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn rows_for_date(&self, date: Date) -> anyhow::Result<Vec<MealFoodRow>> {
        let rows = sqlx::query_as::<_, MealFoodRow>(
            r#"
            SELECT m.id   AS meal_id,
                   m.name AS meal_name,
                   m.icon AS meal_icon,
                   f.id   AS food_id,
                   f.name AS food_name,
                   f.calories, f.protein, f.carbs, f.fat, f.date
              FROM meals m
              JOIN foods f ON f.meal_id = m.id
             WHERE f.date = $1
             ORDER BY m.id ASC, f.id ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await
        .context("list foods by date")?;
        Ok(rows)
    }

    async fn meal_exists(&self, meal_id: i32) -> anyhow::Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM meals WHERE id = $1)"#)
                .bind(meal_id)
                .fetch_one(&self.db)
                .await
                .context("check meal exists")?;
        Ok(exists)
    }

    async fn insert_food(&self, food: &NewFood) -> anyhow::Result<Food> {
        let row = sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods (meal_id, name, calories, protein, carbs, fat, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, meal_id, name, calories, protein, carbs, fat, date
            "#,
        )
        .bind(food.meal_id)
        .bind(&food.name)
        .bind(food.calories)
        .bind(food.protein)
        .bind(food.carbs)
        .bind(food.fat)
        .bind(food.date)
        .fetch_one(&self.db)
        .await
        .context("insert food")?;
        Ok(row)
    }

    async fn delete_food(&self, food_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM foods WHERE id = $1"#)
            .bind(food_id)
            .execute(&self.db)
            .await
            .context("delete food")?;
        Ok(res.rows_affected() > 0)
    }
}
