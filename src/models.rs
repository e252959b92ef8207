//! Reference records read from the store and the summaries derived from them.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Placeholder reported when a summary has no fastest lap to show
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub id: i64,
    pub circuit_reference: String,
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub driver_reference: String,
    pub number: Option<i64>,
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub url: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

/// Date and optional start time of a weekend session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTime {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: i64,
    pub year: i32,
    pub round: i32,
    pub circuit_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub url: Option<String>,
    pub free_practice_1: SessionTime,
    pub free_practice_2: SessionTime,
    pub free_practice_3: SessionTime,
    pub qualifying: SessionTime,
    pub sprint: SessionTime,
}

/// A driver's cumulative season standing as of one race
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    pub id: i64,
    pub race_id: i64,
    pub driver_id: i64,
    pub points: f64,
    pub position: i32,
    pub position_text: Option<String>,
    pub wins: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitSummary {
    pub circuit_id: i64,
    pub circuit_reference: String,
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub fastest_lap_time: String,
    pub fastest_lap_time_milliseconds: Option<f64>,
    pub fastest_lap_driver: String,
    pub fastest_lap_race_year: i32,
    pub total_races_completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub driver_id: i64,
    pub driver_reference: String,
    pub full_name: String,
    pub nationality: Option<String>,
    pub podium_count: u32,
    pub total_races_entered: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverChampionshipSummary {
    pub driver_id: i64,
    pub driver_reference: String,
    pub full_name: String,
    pub total_points: f64,
    pub position: i32,
    pub wins: i32,
}

/// Render a lap duration as `m:ss.mmm`
pub fn format_lap_time(milliseconds: f64) -> String {
    let total = milliseconds.round().max(0.0) as u64;
    let minutes = total / 60_000;
    let seconds = (total % 60_000) / 1000;
    let millis = total % 1000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
