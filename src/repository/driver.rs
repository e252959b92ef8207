use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};

use super::DriverRepository;
use crate::models::{Driver, DriverSummary};
use crate::store::{lock, DbConn};

const DRIVER_COLUMNS: &str =
    "id, driver_ref, number, code, forename, surname, dob, nationality, url";

/// Driver queries backed by SQLite
pub struct SqliteDriverRepository {
    conn: DbConn,
}

impl SqliteDriverRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }
}

impl DriverRepository for SqliteDriverRepository {
    fn get_all(&self) -> Result<Vec<Driver>> {
        let conn = lock(&self.conn)?;
        all_drivers(&conn)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Driver>> {
        let conn = lock(&self.conn)?;
        driver_by_id(&conn, id)
    }

    fn get_summaries(&self) -> Result<Vec<DriverSummary>> {
        let conn = lock(&self.conn)?;
        all_drivers(&conn)?
            .into_iter()
            .map(|driver| summarize(&conn, driver))
            .collect()
    }

    fn get_summary_by_id(&self, id: i64) -> Result<Option<DriverSummary>> {
        let conn = lock(&self.conn)?;
        driver_by_id(&conn, id)?
            .map(|driver| summarize(&conn, driver))
            .transpose()
    }
}

fn driver_from_row(row: &Row) -> rusqlite::Result<Driver> {
    Ok(Driver {
        id: row.get(0)?,
        driver_reference: row.get(1)?,
        number: row.get(2)?,
        code: row.get(3)?,
        forename: row.get(4)?,
        surname: row.get(5)?,
        date_of_birth: row.get(6)?,
        nationality: row.get(7)?,
        url: row.get(8)?,
    })
}

fn all_drivers(conn: &Connection) -> Result<Vec<Driver>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM drivers ORDER BY id", DRIVER_COLUMNS))?;
    let rows = stmt.query_map([], driver_from_row)?;
    rows.collect::<Result<Vec<_>, _>>()
        .context("Failed to read drivers")
}

fn driver_by_id(conn: &Connection, id: i64) -> Result<Option<Driver>> {
    conn.query_row(
        &format!("SELECT {} FROM drivers WHERE id = ?1", DRIVER_COLUMNS),
        [id],
        driver_from_row,
    )
    .optional()
    .with_context(|| format!("Failed to read driver {}", id))
}

fn summarize(conn: &Connection, driver: Driver) -> Result<DriverSummary> {
    let races_entered: i64 = conn
        .query_row(
            "SELECT COUNT(DISTINCT race_id) FROM driver_standings WHERE driver_id = ?1",
            [driver.id],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to count races for driver {}", driver.id))?;

    // A podium is a race whose last recorded lap puts the driver in the top three
    let podiums: i64 = conn
        .query_row(
            r#"
            SELECT COUNT(DISTINCT lt.race_id)
            FROM lap_times lt
            WHERE lt.driver_id = ?1
              AND lt.position BETWEEN 1 AND 3
              AND lt.lap = (
                  SELECT MAX(last.lap)
                  FROM lap_times last
                  WHERE last.race_id = lt.race_id AND last.driver_id = lt.driver_id
              )
            "#,
            [driver.id],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to count podiums for driver {}", driver.id))?;

    Ok(DriverSummary {
        full_name: driver.full_name(),
        driver_id: driver.id,
        driver_reference: driver.driver_reference,
        nationality: driver.nationality,
        podium_count: podiums as u32,
        total_races_entered: races_entered as u32,
    })
}
