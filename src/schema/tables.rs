//! Table schema definitions for the Formula-1 reference tables

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static CIRCUITS: TableSchema = TableSchema {
    name: "circuits",
    source_file: "circuits.json",
    columns: &[
        Column::required("id", ColumnType::Integer).json("circuitId"),
        Column::required("circuit_ref", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::new("location", ColumnType::Text),
        Column::new("country", ColumnType::Text),
        Column::new("lat", ColumnType::Real),
        Column::new("lng", ColumnType::Real),
        Column::new("alt", ColumnType::Integer),
        Column::new("url", ColumnType::Text),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    indexes: &[Index::on(&["circuit_ref"])],
    load_policy: LoadPolicy::WholeFile,
};

pub static DRIVERS: TableSchema = TableSchema {
    name: "drivers",
    source_file: "drivers.json",
    columns: &[
        Column::required("id", ColumnType::Integer).json("driverId"),
        Column::required("driver_ref", ColumnType::Text),
        Column::new("number", ColumnType::Integer),
        Column::new("code", ColumnType::Text),
        Column::required("forename", ColumnType::Text),
        Column::required("surname", ColumnType::Text),
        Column::new("dob", ColumnType::Date),
        Column::new("nationality", ColumnType::Text),
        Column::new("url", ColumnType::Text),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    indexes: &[Index::on(&["driver_ref"])],
    load_policy: LoadPolicy::WholeFile,
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static RACES: TableSchema = TableSchema {
    name: "races",
    source_file: "races.json",
    columns: &[
        Column::required("id", ColumnType::Integer).json("raceId"),
        Column::required("year", ColumnType::Integer),
        Column::required("round", ColumnType::Integer),
        Column::required("circuit_id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("date", ColumnType::Date),
        Column::new("time", ColumnType::Time),
        Column::new("url", ColumnType::Text),
        Column::new("fp1_date", ColumnType::Date).json("fp1_date"),
        Column::new("fp1_time", ColumnType::Time).json("fp1_time"),
        Column::new("fp2_date", ColumnType::Date).json("fp2_date"),
        Column::new("fp2_time", ColumnType::Time).json("fp2_time"),
        Column::new("fp3_date", ColumnType::Date).json("fp3_date"),
        Column::new("fp3_time", ColumnType::Time).json("fp3_time"),
        Column::new("quali_date", ColumnType::Date).json("quali_date"),
        Column::new("quali_time", ColumnType::Time).json("quali_time"),
        Column::new("sprint_date", ColumnType::Date).json("sprint_date"),
        Column::new("sprint_time", ColumnType::Time).json("sprint_time"),
    ],
    primary_key: &["id"],
    foreign_keys: &[ForeignKey::new("circuit_id", "circuits")],
    indexes: &[Index::unique(&["year", "round"])],
    load_policy: LoadPolicy::WholeFile,
};

pub static DRIVER_STANDINGS: TableSchema = TableSchema {
    name: "driver_standings",
    source_file: "driver_standings.json",
    columns: &[
        Column::required("id", ColumnType::Integer).json("driverStandingsId"),
        Column::required("race_id", ColumnType::Integer),
        Column::required("driver_id", ColumnType::Integer),
        Column::required("points", ColumnType::Real),
        Column::required("position", ColumnType::Integer),
        Column::new("position_text", ColumnType::Text),
        Column::required("wins", ColumnType::Integer),
    ],
    primary_key: &["id"],
    foreign_keys: &[
        ForeignKey::new("race_id", "races"),
        ForeignKey::new("driver_id", "drivers"),
    ],
    indexes: &[],
    load_policy: LoadPolicy::Batched { batch_size: 5000 },
};

pub static LAP_TIMES: TableSchema = TableSchema {
    name: "lap_times",
    source_file: "lap_times.json",
    columns: &[
        Column::required("race_id", ColumnType::Integer),
        Column::required("driver_id", ColumnType::Integer),
        Column::required("lap", ColumnType::Integer),
        Column::required("position", ColumnType::Integer),
        Column::new("time", ColumnType::Text),
        Column::new("milliseconds", ColumnType::Real),
    ],
    primary_key: &["race_id", "driver_id", "lap"],
    foreign_keys: &[
        ForeignKey::new("race_id", "races"),
        ForeignKey::new("driver_id", "drivers"),
    ],
    indexes: &[Index::on(&["driver_id", "race_id", "lap"])],
    load_policy: LoadPolicy::Streamed { batch_size: 10_000 },
};

/// All tables in dependency order (parents first)
pub static ALL_TABLES: &[&TableSchema] = &[
    &CIRCUITS,
    &DRIVERS,
    &RACES,
    &DRIVER_STANDINGS,
    &LAP_TIMES,
];

/// Look up a table by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_source_files_are_unique() {
        let files: HashSet<_> = ALL_TABLES.iter().map(|t| t.source_file).collect();
        assert_eq!(files.len(), ALL_TABLES.len());
    }

    #[test]
    fn test_primary_keys_name_real_columns() {
        for table in ALL_TABLES {
            let columns = table.column_names();
            for pk in table.primary_key {
                assert!(columns.contains(pk), "{} has no column {}", table.name, pk);
            }
        }
    }

    #[test]
    fn test_large_tables_are_batched() {
        assert_eq!(DRIVER_STANDINGS.load_policy.batch_size(), Some(5000));
        assert!(LAP_TIMES.load_policy.is_streamed());
        assert_eq!(CIRCUITS.load_policy.batch_size(), None);
    }

    #[test]
    fn test_get_table() {
        assert_eq!(get_table("races").map(|t| t.name), Some("races"));
        assert!(get_table("results").is_none());
    }
}
