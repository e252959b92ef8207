use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::validate::validate_year;
use crate::error::ServiceResult;
use crate::models::DriverChampionshipSummary;
use crate::repository::{ChampionshipRepository, DriverRepository};

pub struct ChampionshipService {
    championships: Arc<dyn ChampionshipRepository>,
    drivers: Arc<dyn DriverRepository>,
    min_year: i32,
}

impl ChampionshipService {
    pub fn new(
        championships: Arc<dyn ChampionshipRepository>,
        drivers: Arc<dyn DriverRepository>,
        min_year: i32,
    ) -> Self {
        Self {
            championships,
            drivers,
            min_year,
        }
    }

    /// Final driver standings of a season, ordered by position.
    ///
    /// Empty when the season has no races. Standings whose driver is
    /// unknown are left out. Positions are reported as stored, not re-ranked.
    pub fn driver_championship_by_year(
        &self,
        year: i32,
    ) -> ServiceResult<Vec<DriverChampionshipSummary>> {
        validate_year(year, self.min_year)?;
        info!(year, "Getting driver championship");

        let standings = self.championships.driver_standings_by_year(year)?;
        if standings.is_empty() {
            return Ok(Vec::new());
        }

        let drivers: HashMap<i64, _> = self
            .drivers
            .get_all()?
            .into_iter()
            .map(|driver| (driver.id, driver))
            .collect();

        let mut summaries: Vec<DriverChampionshipSummary> = standings
            .into_iter()
            .filter_map(|standing| {
                let Some(driver) = drivers.get(&standing.driver_id) else {
                    debug!(
                        driver_id = standing.driver_id,
                        race_id = standing.race_id,
                        "Dropping standing for unknown driver"
                    );
                    return None;
                };

                Some(DriverChampionshipSummary {
                    driver_id: driver.id,
                    driver_reference: driver.driver_reference.clone(),
                    full_name: driver.full_name(),
                    total_points: standing.points,
                    position: standing.position,
                    wins: standing.wins,
                })
            })
            .collect();

        summaries.sort_by_key(|summary| summary.position);
        Ok(summaries)
    }
}
