//! Progress sinks for the seeding pipeline

/// Receives per-table and per-batch events while fixtures are loaded
pub trait SeedProgress {
    fn table_started(&mut self, table: &str);
    fn batch_committed(&mut self, table: &str, batch: u64, rows_so_far: u64);
    fn table_skipped(&mut self, table: &str, reason: &str);
    fn table_finished(&mut self, table: &str, rows: u64);
}

/// Prints one line per table to stderr, keeping stdout free for query output
#[derive(Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl SeedProgress for ConsoleProgress {
    fn table_started(&mut self, table: &str) {
        eprintln!("{}: loading...", table);
    }

    fn batch_committed(&mut self, table: &str, batch: u64, rows_so_far: u64) {
        eprintln!("{}: batch {} committed ({} records)", table, batch, rows_so_far);
    }

    fn table_skipped(&mut self, table: &str, reason: &str) {
        eprintln!("{}: skipped ({})", table, reason);
    }

    fn table_finished(&mut self, table: &str, rows: u64) {
        eprintln!("{}: {} records", table, rows);
    }
}

/// Silent implementation for the startup path and tests
#[derive(Default)]
pub struct SilentProgress;

impl SilentProgress {
    pub fn new() -> Self {
        Self
    }
}

impl SeedProgress for SilentProgress {
    fn table_started(&mut self, _table: &str) {}
    fn batch_committed(&mut self, _table: &str, _batch: u64, _rows_so_far: u64) {}
    fn table_skipped(&mut self, _table: &str, _reason: &str) {}
    fn table_finished(&mut self, _table: &str, _rows: u64) {}
}
