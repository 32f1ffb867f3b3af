//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure for integration tests.

#![allow(dead_code)]

pub mod fixtures;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use client_store::db::{create_client_table, ClientRepository, ConnectionProvider, SqliteConnectionProvider};

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Test context holding a fresh SQLite database with the client table
pub struct TestContext {
    pub provider: SqliteConnectionProvider,
    /// Temporary directory for the database file
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a fresh database
    pub fn new() -> Self {
        let ctx = Self::without_schema();
        let mut conn = ctx
            .provider
            .get_connection()
            .expect("Failed to get connection");
        create_client_table(&mut conn, ctx.provider.dialect()).expect("Failed to create table");
        drop(conn);
        ctx
    }

    /// Context whose database file exists but has no tables.
    /// The provider it hands out never creates files.
    pub fn without_schema() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_path = temp_dir.path().join(format!("test_db_{}.db", counter));

        SqliteConnectionProvider::create_if_missing(&db_path)
            .get_connection()
            .expect("Failed to create database file");

        Self {
            provider: SqliteConnectionProvider::new(db_path),
            temp_dir,
        }
    }

    pub fn repository(&self) -> ClientRepository<&SqliteConnectionProvider> {
        ClientRepository::new(&self.provider)
    }

    /// Provider whose every connection attempt fails
    pub fn unreachable_provider(&self) -> SqliteConnectionProvider {
        SqliteConnectionProvider::new(self.missing_dir().join("unreachable.db"))
    }

    fn missing_dir(&self) -> PathBuf {
        self.temp_dir.path().join("does-not-exist")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
