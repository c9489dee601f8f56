pub mod client;
pub mod models;

pub use client::{ApiError, PageClient, Result};
pub use models::ClientConfig;
