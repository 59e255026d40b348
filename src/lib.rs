//! Nutrition logging: an HTTP API for meals and their foods, and the client core that
//! caches per-date meal structures and computes macro totals.

pub mod app;
pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod meals;
pub mod state;
