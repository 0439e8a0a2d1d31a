pub mod client;
pub mod endpoints;
pub mod models;
pub mod wire;

pub use client::ApiClient;
pub use models::*;
