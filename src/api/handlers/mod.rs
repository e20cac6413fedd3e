pub mod auth;
pub mod health;
pub mod payments;
pub mod transactions;

pub use health::{HealthResponse, health_check};
