//! Fixture seeding pipeline.
//!
//! Tables are loaded parents first. Each table's `LoadPolicy` decides
//! whether the file is read whole or streamed and how many rows go into
//! each committed transaction.

pub mod progress;
pub mod seeder;

pub use progress::{ConsoleProgress, SeedProgress, SilentProgress};
pub use seeder::{seed_on_startup, SeedReport, Seeder, TableLoad};
