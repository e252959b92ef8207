use super::validate::DEFAULT_MIN_YEAR;
use super::*;
use crate::error::ServiceError;
use crate::models::{
    Circuit, CircuitSummary, Driver, DriverStanding, DriverSummary, Race, SessionTime,
};
use crate::repository::{ChampionshipRepository, CircuitRepository, DriverRepository};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn driver(id: i64, forename: &str, surname: &str) -> Driver {
    Driver {
        id,
        driver_reference: surname.to_lowercase(),
        number: None,
        code: None,
        forename: forename.into(),
        surname: surname.into(),
        date_of_birth: None,
        nationality: Some("British".into()),
        url: None,
    }
}

fn standing(race_id: i64, driver_id: i64, points: f64, position: i32, wins: i32) -> DriverStanding {
    DriverStanding {
        id: race_id * 1000 + driver_id,
        race_id,
        driver_id,
        points,
        position,
        position_text: Some(position.to_string()),
        wins,
    }
}

fn race(id: i64, year: i32, round: i32) -> Race {
    Race {
        id,
        year,
        round,
        circuit_id: 1,
        name: format!("Round {}", round),
        date: NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
        time: None,
        url: None,
        free_practice_1: SessionTime::default(),
        free_practice_2: SessionTime::default(),
        free_practice_3: SessionTime::default(),
        qualifying: SessionTime::default(),
        sprint: SessionTime::default(),
    }
}

#[derive(Default)]
struct FakeDrivers {
    drivers: Vec<Driver>,
    calls: AtomicUsize,
}

impl DriverRepository for FakeDrivers {
    fn get_all(&self) -> Result<Vec<Driver>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.drivers.clone())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Driver>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.drivers.iter().find(|d| d.id == id).cloned())
    }

    fn get_summaries(&self) -> Result<Vec<DriverSummary>> {
        Ok(Vec::new())
    }

    fn get_summary_by_id(&self, id: i64) -> Result<Option<DriverSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.drivers.iter().find(|d| d.id == id).map(|d| DriverSummary {
            driver_id: d.id,
            driver_reference: d.driver_reference.clone(),
            full_name: d.full_name(),
            nationality: d.nationality.clone(),
            podium_count: 0,
            total_races_entered: 0,
        }))
    }
}

/// Races per season and standings per race
#[derive(Default)]
struct FakeChampionships {
    races: Vec<Race>,
    standings: HashMap<i64, Vec<DriverStanding>>,
    fail: bool,
}

impl ChampionshipRepository for FakeChampionships {
    fn latest_race_in_year(&self, year: i32) -> Result<Option<Race>> {
        if self.fail {
            return Err(anyhow!("database is locked"));
        }
        Ok(self
            .races
            .iter()
            .filter(|r| r.year == year)
            .max_by_key(|r| r.round)
            .cloned())
    }

    fn standings_for_race(&self, race_id: i64) -> Result<Vec<DriverStanding>> {
        Ok(self.standings.get(&race_id).cloned().unwrap_or_default())
    }
}

struct FakeCircuits;

impl CircuitRepository for FakeCircuits {
    fn get_all(&self) -> Result<Vec<Circuit>> {
        Ok(Vec::new())
    }

    fn get_by_id(&self, _id: i64) -> Result<Option<Circuit>> {
        Ok(None)
    }

    fn get_summaries(&self) -> Result<Vec<CircuitSummary>> {
        Ok(Vec::new())
    }

    fn get_summary_by_id(&self, _id: i64) -> Result<Option<CircuitSummary>> {
        Err(anyhow!("no such table: lap_times"))
    }
}

fn championship_service(championships: FakeChampionships, drivers: Vec<Driver>) -> ChampionshipService {
    ChampionshipService::new(
        Arc::new(championships),
        Arc::new(FakeDrivers {
            drivers,
            ..Default::default()
        }),
        DEFAULT_MIN_YEAR,
    )
}

#[test]
fn test_championship_returns_sorted_summaries() {
    let mut championships = FakeChampionships {
        races: vec![race(1, 2025, 1), race(2, 2025, 2)],
        ..Default::default()
    };
    championships.standings.insert(
        2,
        vec![
            standing(2, 832, 40.0, 2, 1),
            standing(2, 1, 43.0, 1, 1),
        ],
    );
    let service = championship_service(
        championships,
        vec![driver(1, "Lewis", "Hamilton"), driver(832, "Carlos", "Sainz")],
    );

    let result = service.driver_championship_by_year(2025).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].driver_id, 1);
    assert_eq!(result[0].full_name, "Lewis Hamilton");
    assert_eq!(result[0].total_points, 43.0);
    assert_eq!(result[0].position, 1);
    assert_eq!(result[0].wins, 1);
    assert_eq!(result[1].driver_id, 832);
    assert_eq!(result[1].position, 2);
}

#[test]
fn test_championship_uses_only_last_round() {
    let mut championships = FakeChampionships {
        races: vec![race(1, 2024, 1), race(2, 2024, 2)],
        ..Default::default()
    };
    championships
        .standings
        .insert(1, vec![standing(1, 1, 25.0, 1, 1)]);
    championships
        .standings
        .insert(2, vec![standing(2, 2, 50.0, 1, 2), standing(2, 1, 25.0, 2, 1)]);
    let service = championship_service(
        championships,
        vec![driver(1, "Lewis", "Hamilton"), driver(2, "Max", "Verstappen")],
    );

    let result = service.driver_championship_by_year(2024).unwrap();
    let leaders: Vec<i64> = result.iter().map(|s| s.driver_id).collect();
    assert_eq!(leaders, vec![2, 1]);
}

#[test]
fn test_championship_empty_year_skips_driver_lookup() {
    let drivers = Arc::new(FakeDrivers {
        drivers: vec![driver(1, "Lewis", "Hamilton")],
        ..Default::default()
    });
    let service = ChampionshipService::new(
        Arc::new(FakeChampionships::default()),
        drivers.clone(),
        DEFAULT_MIN_YEAR,
    );

    let result = service.driver_championship_by_year(2030).unwrap();

    assert!(result.is_empty());
    assert_eq!(drivers.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_championship_drops_unknown_drivers() {
    let mut championships = FakeChampionships {
        races: vec![race(7, 2023, 1)],
        ..Default::default()
    };
    championships.standings.insert(
        7,
        vec![standing(7, 1, 25.0, 1, 1), standing(7, 404, 18.0, 2, 0)],
    );
    let service = championship_service(championships, vec![driver(1, "Lewis", "Hamilton")]);

    let result = service.driver_championship_by_year(2023).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].driver_id, 1);
}

#[test]
fn test_championship_keeps_duplicate_positions() {
    let mut championships = FakeChampionships {
        races: vec![race(3, 2022, 1)],
        ..Default::default()
    };
    championships.standings.insert(
        3,
        vec![
            standing(3, 2, 10.0, 3, 0),
            standing(3, 1, 10.0, 3, 0),
            standing(3, 3, 30.0, 1, 1),
        ],
    );
    let service = championship_service(
        championships,
        vec![
            driver(1, "Lewis", "Hamilton"),
            driver(2, "Max", "Verstappen"),
            driver(3, "Charles", "Leclerc"),
        ],
    );

    let positions: Vec<i32> = service
        .driver_championship_by_year(2022)
        .unwrap()
        .iter()
        .map(|s| s.position)
        .collect();
    assert_eq!(positions, vec![1, 3, 3]);
}

#[test]
fn test_championship_rejects_years_before_floor() {
    let service = championship_service(FakeChampionships::default(), Vec::new());

    let err = service.driver_championship_by_year(1949).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_championship_propagates_storage_failure() {
    let service = championship_service(
        FakeChampionships {
            fail: true,
            ..Default::default()
        },
        Vec::new(),
    );

    let err = service.driver_championship_by_year(2020).unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(err.status_code(), 500);
}

#[test]
fn test_driver_service_validates_before_storage() {
    let repo = Arc::new(FakeDrivers {
        drivers: vec![driver(1, "Lewis", "Hamilton")],
        ..Default::default()
    });
    let service = DriverService::new(repo.clone());

    assert!(matches!(service.get_by_id(0), Err(ServiceError::InvalidInput(_))));
    assert!(matches!(
        service.get_summary_by_id(-1),
        Err(ServiceError::InvalidInput(_))
    ));
    assert_eq!(repo.calls.load(Ordering::SeqCst), 0);

    assert_eq!(
        service.get_by_id(1).unwrap().map(|d| d.full_name()),
        Some("Lewis Hamilton".to_string())
    );
    assert!(service.get_by_id(999).unwrap().is_none());
    assert!(service.get_summary_by_id(999).unwrap().is_none());
}

#[test]
fn test_circuit_service_maps_errors() {
    let service = CircuitService::new(Arc::new(FakeCircuits));

    assert!(matches!(service.get_by_id(-1), Err(ServiceError::InvalidInput(_))));
    assert!(service.get_by_id(999).unwrap().is_none());
    assert!(matches!(
        service.get_summary_by_id(1),
        Err(ServiceError::Storage(_))
    ));
    assert!(service.get_all().unwrap().is_empty());
}
