use anyhow::{Context, Result};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::progress::SeedProgress;
use crate::parser::{parse_record, read_fixture, ParsedRow};
use crate::schema::{DependencyResolver, TableSchema};
use crate::store::schema_gen::generate_insert;
use crate::store::Database;

/// Rows loaded for one table; `rows` is `None` when its fixture was missing
#[derive(Debug, Clone, PartialEq)]
pub struct TableLoad {
    pub table: &'static str,
    pub rows: Option<u64>,
}

/// Outcome of a seed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// The store already held data, nothing was inserted
    pub skipped: bool,
    pub tables: Vec<TableLoad>,
}

impl SeedReport {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().filter_map(|t| t.rows).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .and_then(|t| t.rows)
    }
}

/// Loads the fixture directory into the store
pub struct Seeder {
    db: Database,
    data_dir: PathBuf,
}

impl Seeder {
    pub fn new(db: Database, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Seed every table unless the store already holds data.
    ///
    /// The guard table is the first table in load order whose fixture is
    /// present (circuits for a complete data directory). A missing fixture
    /// is skipped with a warning; malformed JSON or a storage failure aborts
    /// the run and is returned to the caller.
    pub fn seed(&self, progress: &mut dyn SeedProgress) -> Result<SeedReport> {
        let tables = DependencyResolver::new().load_order()?;

        let guard = tables
            .iter()
            .find(|schema| self.data_dir.join(schema.source_file).exists())
            .or_else(|| tables.first());

        if let Some(guard) = guard {
            if self.db.has_rows(guard.name)? {
                info!(
                    table = guard.name,
                    "Database already contains data. Skipping seed operation."
                );
                return Ok(SeedReport {
                    skipped: true,
                    tables: Vec::new(),
                });
            }
        }

        info!(data_dir = ?self.data_dir, "Starting database seeding");
        let mut report = SeedReport::default();

        for schema in tables {
            let rows = self.load_table(schema, progress).map_err(|err| {
                error!(table = schema.name, error = %format!("{:#}", err), "Error seeding table");
                err
            })?;
            report.tables.push(TableLoad {
                table: schema.name,
                rows,
            });
        }

        info!(
            total_rows = report.total_rows(),
            "Database seeding completed successfully"
        );
        Ok(report)
    }

    /// Truncate every table, then seed from scratch
    pub fn reseed(&self, progress: &mut dyn SeedProgress) -> Result<SeedReport> {
        info!("Truncating all tables before reseeding");
        self.db.truncate_all()?;
        self.seed(progress)
    }

    /// Load one fixture file into its table.
    ///
    /// Returns `None` when the file does not exist.
    pub fn load_table(
        &self,
        schema: &'static TableSchema,
        progress: &mut dyn SeedProgress,
    ) -> Result<Option<u64>> {
        let file_path = self.data_dir.join(schema.source_file);

        if !file_path.exists() {
            warn!(table = schema.name, path = ?file_path, "File not found");
            progress.table_skipped(schema.name, "file not found");
            return Ok(None);
        }

        info!(table = schema.name, path = ?file_path, policy = ?schema.load_policy, "Seeding table");
        progress.table_started(schema.name);

        let mut conn = self.db.lock()?;
        let mut writer = BatchWriter::new(&mut conn, schema, progress);

        read_fixture(&file_path, schema.load_policy.is_streamed(), |record| {
            writer.push(record)
        })
        .with_context(|| format!("Failed to load {:?} into {}", file_path, schema.name))?;

        let count = writer.finish()?;
        if count == 0 {
            warn!(table = schema.name, path = ?file_path, "No items found");
        }
        info!(table = schema.name, rows = count, "Inserted records");
        progress.table_finished(schema.name, count);

        Ok(Some(count))
    }
}

/// Seed at process startup, keeping the process alive on failure.
///
/// Returns `None` when seeding failed; the store is then partially seeded or
/// empty and queries return whatever is present.
pub fn seed_on_startup(seeder: &Seeder, progress: &mut dyn SeedProgress) -> Option<SeedReport> {
    match seeder.seed(progress) {
        Ok(report) => Some(report),
        Err(err) => {
            error!(
                error = %format!("{:#}", err),
                "Error seeding database, continuing with partial data"
            );
            None
        }
    }
}

/// Buffers parsed rows and commits them in bounded transactions
struct BatchWriter<'a, P: SeedProgress + ?Sized> {
    conn: &'a mut Connection,
    schema: &'static TableSchema,
    insert_sql: String,
    /// `None` commits everything in a single transaction at the end
    batch_size: Option<usize>,
    pending: Vec<ParsedRow>,
    committed: u64,
    batches: u64,
    progress: &'a mut P,
}

impl<'a, P: SeedProgress + ?Sized> BatchWriter<'a, P> {
    fn new(conn: &'a mut Connection, schema: &'static TableSchema, progress: &'a mut P) -> Self {
        let batch_size = schema.load_policy.batch_size();
        Self {
            conn,
            schema,
            insert_sql: generate_insert(schema),
            batch_size,
            pending: Vec::with_capacity(batch_size.unwrap_or(1024)),
            committed: 0,
            batches: 0,
            progress,
        }
    }

    fn push(&mut self, record: Value) -> Result<()> {
        let row = parse_record(&record, self.schema).with_context(|| {
            format!(
                "Failed to parse record #{} of {}",
                self.committed + self.pending.len() as u64 + 1,
                self.schema.source_file
            )
        })?;
        self.pending.push(row);

        if let Some(size) = self.batch_size {
            if self.pending.len() >= size {
                self.flush()?;
            }
        }

        Ok(())
    }

    /// Insert the pending rows in one transaction and commit
    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&self.insert_sql)?;
            for (offset, row) in self.pending.iter().enumerate() {
                stmt.execute(params_from_iter(row.values.iter()))
                    .with_context(|| {
                        format!(
                            "Failed to insert record #{} into {}",
                            self.committed + offset as u64 + 1,
                            self.schema.name
                        )
                    })?;
            }
        }
        tx.commit()
            .with_context(|| format!("Failed to commit batch for {}", self.schema.name))?;

        self.committed += self.pending.len() as u64;
        self.batches += 1;
        self.pending.clear();

        info!(
            table = self.schema.name,
            batch = self.batches,
            rows = self.committed,
            "Committed batch"
        );
        self.progress
            .batch_committed(self.schema.name, self.batches, self.committed);

        Ok(())
    }

    fn finish(mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SilentProgress;
    use crate::schema::tables::{CIRCUITS, DRIVER_STANDINGS};
    use serde_json::json;

    #[derive(Default)]
    struct RecordingProgress {
        batches: Vec<(String, u64, u64)>,
    }

    impl SeedProgress for RecordingProgress {
        fn table_started(&mut self, _table: &str) {}
        fn batch_committed(&mut self, table: &str, batch: u64, rows_so_far: u64) {
            self.batches.push((table.to_string(), batch, rows_so_far));
        }
        fn table_skipped(&mut self, _table: &str, _reason: &str) {}
        fn table_finished(&mut self, _table: &str, _rows: u64) {}
    }

    fn standing(id: i64) -> Value {
        json!({
            "driverStandingsId": id,
            "raceId": 1,
            "driverId": id,
            "points": 1.0,
            "position": id,
            "wins": 0
        })
    }

    #[test]
    fn test_batch_writer_commits_every_batch() {
        let db = Database::open_in_memory().unwrap();
        let mut progress = RecordingProgress::default();
        let count = {
            let mut conn = db.lock().unwrap();
            let mut writer = BatchWriter::new(&mut conn, &DRIVER_STANDINGS, &mut progress);
            writer.batch_size = Some(2);
            for id in 1..=5 {
                writer.push(standing(id)).unwrap();
            }
            writer.finish().unwrap()
        };

        assert_eq!(count, 5);
        assert_eq!(db.row_count("driver_standings").unwrap(), 5);
        let rows: Vec<u64> = progress.batches.iter().map(|b| b.2).collect();
        assert_eq!(rows, vec![2, 4, 5]);
    }

    #[test]
    fn test_whole_file_policy_uses_single_transaction() {
        let db = Database::open_in_memory().unwrap();
        let mut progress = RecordingProgress::default();
        {
            let mut conn = db.lock().unwrap();
            let mut writer = BatchWriter::new(&mut conn, &CIRCUITS, &mut progress);
            for id in 1..=3 {
                writer
                    .push(json!({"circuitId": id, "circuitRef": format!("c{}", id), "name": "Circuit"}))
                    .unwrap();
            }
            writer.finish().unwrap();
        }

        assert_eq!(progress.batches.len(), 1);
        assert_eq!(db.row_count("circuits").unwrap(), 3);
    }

    #[test]
    fn test_missing_required_column_fails_insert() {
        let db = Database::open_in_memory().unwrap();
        let mut progress = SilentProgress::new();
        let mut conn = db.lock().unwrap();
        let mut writer = BatchWriter::new(&mut conn, &CIRCUITS, &mut progress);
        writer.push(json!({"circuitId": 1})).unwrap();

        assert!(writer.finish().is_err());
    }
}
