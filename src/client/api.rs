use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::dates::DateKey;

use super::day::{FoodEntry, RawMeal};
use super::error::ClientError;
use super::ClientConfig;

/// Body of `POST /meals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFoodRequest {
    pub meal_id: i64,
    pub date: DateKey,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The id did not exist. Nothing changed server-side.
    NotFound,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    food: FoodEntry,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// The three backend operations the client depends on.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    /// `Ok(None)` when the backend has no foods for the date.
    async fn fetch_day(&self, date: DateKey) -> Result<Option<Vec<RawMeal>>, ClientError>;
    async fn create_food(&self, food: &NewFoodRequest) -> Result<FoodEntry, ClientError>;
    async fn delete_food(&self, food_id: i64) -> Result<DeleteOutcome, ClientError>;
}

#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            client,
            base: Url::parse(&base)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }
}

async fn unexpected(res: Response) -> ClientError {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    ClientError::UnexpectedStatus { status, body }
}

#[async_trait]
impl NutritionApi for HttpApi {
    async fn fetch_day(&self, date: DateKey) -> Result<Option<Vec<RawMeal>>, ClientError> {
        let url = self.url(&format!("meals/{date}"))?;
        debug!(%url, "fetching day");
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(unexpected(res).await);
        }
        let body: Value = res.json().await?;
        // anything but a list is treated as "nothing logged"
        match body {
            Value::Array(_) => Ok(Some(serde_json::from_value(body)?)),
            _ => Ok(Some(Vec::new())),
        }
    }

    async fn create_food(&self, food: &NewFoodRequest) -> Result<FoodEntry, ClientError> {
        let url = self.url("meals")?;
        let res = self.client.post(url).json(food).send().await?;
        let status = res.status();
        if status.is_success() {
            let created: CreatedEnvelope = res.json().await?;
            return Ok(created.food);
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            let body = res.text().await?;
            let message = serde_json::from_str::<MessageBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            return Err(ClientError::Validation { message });
        }
        Err(unexpected(res).await)
    }

    async fn delete_food(&self, food_id: i64) -> Result<DeleteOutcome, ClientError> {
        let url = self.url(&format!("foods/{food_id}"))?;
        let res = self.client.delete(url).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            Ok(DeleteOutcome::NotFound)
        } else if status.is_success() {
            Ok(DeleteOutcome::Deleted)
        } else {
            Err(unexpected(res).await)
        }
    }
}
