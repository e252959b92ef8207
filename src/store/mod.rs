//! SQLite store holding the reference tables.
//!
//! A single connection is shared between the loader and the repositories
//! behind an `Arc<Mutex<_>>`; every operation holds the lock only for its
//! own statements.

pub mod schema_gen;

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::schema::{DependencyResolver, ALL_TABLES};
use schema_gen::{generate_create_table, generate_indexes};

pub type DbConn = Arc<Mutex<Connection>>;

/// Handle to the reference-data database
#[derive(Clone)]
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Open (or create) the database file and make sure every table exists
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Self::from_connection(conn)
    }

    /// Create an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.create_tables()?;
        Ok(db)
    }

    /// Shared connection handle for repositories
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    /// Lock the shared connection
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        lock(&self.conn)
    }

    /// Create all tables and indexes if they do not exist yet
    fn create_tables(&self) -> Result<()> {
        let conn = self.lock()?;

        for schema in ALL_TABLES {
            conn.execute(&generate_create_table(schema), [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                conn.execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Whether a table holds at least one row
    pub fn has_rows(&self, table: &str) -> Result<bool> {
        let conn = self.lock()?;
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {})", table);
        let exists: bool = conn
            .query_row(&sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to check rows in {}", table))?;
        Ok(exists)
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: &str) -> Result<u64> {
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to count rows in {}", table))?;
        Ok(count as u64)
    }

    /// Delete every row of every table, children first, in one transaction
    pub fn truncate_all(&self) -> Result<()> {
        let order = DependencyResolver::new().truncate_order()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for schema in order {
            let deleted = tx
                .execute(&format!("DELETE FROM {}", schema.name), [])
                .with_context(|| format!("Failed to truncate table: {}", schema.name))?;
            debug!(table = schema.name, deleted, "truncated table");
        }

        tx.commit()?;
        Ok(())
    }
}

/// Lock a shared connection, surfacing a poisoned mutex as an error
pub fn lock(conn: &DbConn) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Database connection lock poisoned"))
}
