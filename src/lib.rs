pub mod config;
pub mod error;
pub mod secrets;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
