//! Read-only repositories over the reference tables.
//!
//! Each entity family is exposed as a trait so the services can be driven
//! by any store; the `Sqlite*` types implement them over the shared
//! connection.

mod championship;
mod circuit;
mod driver;

pub use championship::SqliteChampionshipRepository;
pub use circuit::SqliteCircuitRepository;
pub use driver::SqliteDriverRepository;

use anyhow::Result;

use crate::models::{Circuit, CircuitSummary, Driver, DriverStanding, DriverSummary, Race};

pub trait CircuitRepository: Send + Sync {
    fn get_all(&self) -> Result<Vec<Circuit>>;
    fn get_by_id(&self, id: i64) -> Result<Option<Circuit>>;
    /// Summary for every circuit, ordered by id
    fn get_summaries(&self) -> Result<Vec<CircuitSummary>>;
    /// `None` when the circuit does not exist
    fn get_summary_by_id(&self, id: i64) -> Result<Option<CircuitSummary>>;
}

pub trait DriverRepository: Send + Sync {
    fn get_all(&self) -> Result<Vec<Driver>>;
    fn get_by_id(&self, id: i64) -> Result<Option<Driver>>;
    /// Summary for every driver, ordered by id
    fn get_summaries(&self) -> Result<Vec<DriverSummary>>;
    /// `None` when the driver does not exist
    fn get_summary_by_id(&self, id: i64) -> Result<Option<DriverSummary>>;
}

pub trait ChampionshipRepository: Send + Sync {
    /// Race with the highest round in the given season
    fn latest_race_in_year(&self, year: i32) -> Result<Option<Race>>;

    fn standings_for_race(&self, race_id: i64) -> Result<Vec<DriverStanding>>;

    /// Standings snapshot taken after the last race of the season.
    ///
    /// Standings are cumulative, so only the final race reflects the whole
    /// season. Empty when the season has no races.
    fn driver_standings_by_year(&self, year: i32) -> Result<Vec<DriverStanding>> {
        match self.latest_race_in_year(year)? {
            Some(race) => self.standings_for_race(race.id),
            None => Ok(Vec::new()),
        }
    }
}
