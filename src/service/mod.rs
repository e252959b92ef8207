//! Services: input validation and logging around the repositories.

mod championship;
mod circuit;
mod driver;
pub mod validate;

pub use championship::ChampionshipService;
pub use circuit::CircuitService;
pub use driver::DriverService;

use std::sync::Arc;

use crate::repository::{
    SqliteChampionshipRepository, SqliteCircuitRepository, SqliteDriverRepository,
};
use crate::store::Database;

/// All services wired to one store
pub struct Services {
    pub circuits: CircuitService,
    pub drivers: DriverService,
    pub championships: ChampionshipService,
}

impl Services {
    pub fn from_database(db: &Database, min_year: i32) -> Self {
        let drivers = Arc::new(SqliteDriverRepository::new(db.connection()));

        Self {
            circuits: CircuitService::new(Arc::new(SqliteCircuitRepository::new(
                db.connection(),
            ))),
            drivers: DriverService::new(drivers.clone()),
            championships: ChampionshipService::new(
                Arc::new(SqliteChampionshipRepository::new(db.connection())),
                drivers,
                min_year,
            ),
        }
    }
}

#[cfg(test)]
mod tests;
