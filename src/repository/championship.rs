use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row};

use super::ChampionshipRepository;
use crate::models::{DriverStanding, Race, SessionTime};
use crate::store::{lock, DbConn};

const RACE_COLUMNS: &str = "id, year, round, circuit_id, name, date, time, url, \
     fp1_date, fp1_time, fp2_date, fp2_time, fp3_date, fp3_time, \
     quali_date, quali_time, sprint_date, sprint_time";

/// Season and standings queries backed by SQLite
pub struct SqliteChampionshipRepository {
    conn: DbConn,
}

impl SqliteChampionshipRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }
}

impl ChampionshipRepository for SqliteChampionshipRepository {
    fn latest_race_in_year(&self, year: i32) -> Result<Option<Race>> {
        let conn = lock(&self.conn)?;
        conn.query_row(
            &format!(
                "SELECT {} FROM races WHERE year = ?1 ORDER BY round DESC LIMIT 1",
                RACE_COLUMNS
            ),
            [year],
            race_from_row,
        )
        .optional()
        .with_context(|| format!("Failed to find last race of {}", year))
    }

    fn standings_for_race(&self, race_id: i64) -> Result<Vec<DriverStanding>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, race_id, driver_id, points, position, position_text, wins
             FROM driver_standings WHERE race_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map([race_id], |row| {
            Ok(DriverStanding {
                id: row.get(0)?,
                race_id: row.get(1)?,
                driver_id: row.get(2)?,
                points: row.get(3)?,
                position: row.get(4)?,
                position_text: row.get(5)?,
                wins: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read standings for race {}", race_id))
    }
}

fn session(row: &Row, date_idx: usize) -> rusqlite::Result<SessionTime> {
    Ok(SessionTime {
        date: row.get(date_idx)?,
        time: row.get(date_idx + 1)?,
    })
}

fn race_from_row(row: &Row) -> rusqlite::Result<Race> {
    Ok(Race {
        id: row.get(0)?,
        year: row.get(1)?,
        round: row.get(2)?,
        circuit_id: row.get(3)?,
        name: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
        url: row.get(7)?,
        free_practice_1: session(row, 8)?,
        free_practice_2: session(row, 10)?,
        free_practice_3: session(row, 12)?,
        qualifying: session(row, 14)?,
        sprint: session(row, 16)?,
    })
}
