use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{dates::DateKey, error::AppError, state::AppState};

use super::dto::{CreateFoodResponse, MealWithFoods, MessageResponse};
use super::services;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_food))
        .route("/meals/:date", get(list_for_date))
}

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/foods/:food_id", delete(delete_food))
}

/// GET /meals/{date}
#[instrument(skip(state))]
pub async fn list_for_date(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> Result<Json<Vec<MealWithFoods>>, AppError> {
    let date = DateKey::parse(&raw_date).map_err(|e| {
        warn!(error = %e, %raw_date, "invalid date in path");
        AppError::invalid_field("date", "The date field must be a valid date (YYYY-MM-DD).")
    })?;
    let meals = services::meals_for_date(state.meals.as_ref(), date).await?;
    Ok(Json(meals))
}

/// POST /meals { meal_id, date, name, calories, protein, carbs, fat }
#[instrument(skip(state, body))]
pub async fn create_food(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateFoodResponse>), AppError> {
    let Json(body) = body.map_err(|e| {
        warn!(error = %e, "unreadable create_food body");
        AppError::invalid_field("body", e.body_text())
    })?;
    let food = services::create_food(state.meals.as_ref(), &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateFoodResponse {
            message: "Food item added successfully".into(),
            food,
        }),
    ))
}

/// DELETE /foods/{food_id}
#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // a non-numeric id can never match a row
    let food_id = raw_id
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::FoodNotFound(0))?;
    services::delete_food(state.meals.as_ref(), food_id).await?;
    Ok(Json(MessageResponse {
        message: "Food item deleted successfully".into(),
    }))
}
