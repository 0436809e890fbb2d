//! Client construction and the shared handle every service is created from.

pub mod builder;
pub mod config;
pub mod core;

pub use builder::ClientBuilder;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use self::core::Client;
