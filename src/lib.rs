pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod parser;
pub mod repository;
pub mod schema;
pub mod service;
pub mod store;

pub use cli::{dispatch, Cli, Commands};
pub use error::{ServiceError, ServiceResult};
pub use loader::{seed_on_startup, SeedReport, Seeder};
pub use service::Services;
pub use store::Database;
