use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};

use super::CircuitRepository;
use crate::models::{format_lap_time, Circuit, CircuitSummary, NOT_AVAILABLE};
use crate::store::{lock, DbConn};

const CIRCUIT_COLUMNS: &str = "id, circuit_ref, name, location, country, lat, lng, alt, url";

/// Circuit queries backed by SQLite
pub struct SqliteCircuitRepository {
    conn: DbConn,
}

impl SqliteCircuitRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }
}

impl CircuitRepository for SqliteCircuitRepository {
    fn get_all(&self) -> Result<Vec<Circuit>> {
        let conn = lock(&self.conn)?;
        all_circuits(&conn)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Circuit>> {
        let conn = lock(&self.conn)?;
        circuit_by_id(&conn, id)
    }

    fn get_summaries(&self) -> Result<Vec<CircuitSummary>> {
        let conn = lock(&self.conn)?;
        all_circuits(&conn)?
            .into_iter()
            .map(|circuit| summarize(&conn, circuit))
            .collect()
    }

    fn get_summary_by_id(&self, id: i64) -> Result<Option<CircuitSummary>> {
        let conn = lock(&self.conn)?;
        circuit_by_id(&conn, id)?
            .map(|circuit| summarize(&conn, circuit))
            .transpose()
    }
}

fn circuit_from_row(row: &Row) -> rusqlite::Result<Circuit> {
    Ok(Circuit {
        id: row.get(0)?,
        circuit_reference: row.get(1)?,
        name: row.get(2)?,
        location: row.get(3)?,
        country: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        altitude: row.get(7)?,
        url: row.get(8)?,
    })
}

fn all_circuits(conn: &Connection) -> Result<Vec<Circuit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM circuits ORDER BY id",
        CIRCUIT_COLUMNS
    ))?;
    let rows = stmt.query_map([], circuit_from_row)?;
    rows.collect::<Result<Vec<_>, _>>()
        .context("Failed to read circuits")
}

fn circuit_by_id(conn: &Connection, id: i64) -> Result<Option<Circuit>> {
    conn.query_row(
        &format!("SELECT {} FROM circuits WHERE id = ?1", CIRCUIT_COLUMNS),
        [id],
        circuit_from_row,
    )
    .optional()
    .with_context(|| format!("Failed to read circuit {}", id))
}

/// Fastest recorded lap at a circuit with its driver and season
struct FastestLap {
    time: Option<String>,
    milliseconds: f64,
    driver: Option<String>,
    year: i32,
}

fn summarize(conn: &Connection, circuit: Circuit) -> Result<CircuitSummary> {
    let total_races: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM races WHERE circuit_id = ?1",
            [circuit.id],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to count races at circuit {}", circuit.id))?;

    // Ties on milliseconds resolve to the lowest race, then driver, then lap
    let fastest = conn
        .query_row(
            r#"
            SELECT lt.time, lt.milliseconds, d.forename || ' ' || d.surname, r.year
            FROM lap_times lt
            JOIN races r ON r.id = lt.race_id
            LEFT JOIN drivers d ON d.id = lt.driver_id
            WHERE r.circuit_id = ?1 AND lt.milliseconds IS NOT NULL
            ORDER BY lt.milliseconds ASC, lt.race_id ASC, lt.driver_id ASC, lt.lap ASC
            LIMIT 1
            "#,
            [circuit.id],
            |row| {
                Ok(FastestLap {
                    time: row.get(0)?,
                    milliseconds: row.get(1)?,
                    driver: row.get(2)?,
                    year: row.get(3)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Failed to find fastest lap at circuit {}", circuit.id))?;

    let (fastest_lap_time, fastest_lap_time_milliseconds, fastest_lap_driver, fastest_lap_race_year) =
        match fastest {
            Some(lap) => (
                lap.time
                    .unwrap_or_else(|| format_lap_time(lap.milliseconds)),
                Some(lap.milliseconds),
                lap.driver.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                lap.year,
            ),
            None => (NOT_AVAILABLE.to_string(), None, NOT_AVAILABLE.to_string(), 0),
        };

    Ok(CircuitSummary {
        circuit_id: circuit.id,
        circuit_reference: circuit.circuit_reference,
        name: circuit.name,
        location: circuit.location,
        country: circuit.country,
        fastest_lap_time,
        fastest_lap_time_milliseconds,
        fastest_lap_driver,
        fastest_lap_race_year,
        total_races_completed: total_races as u32,
    })
}
