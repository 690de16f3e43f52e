use rusqlite::Connection;
use std::sync::Once;
use tempfile::TempDir;

use crate::config::Config;

static INIT: Once = Once::new();

pub const SCHEMA: &str = include_str!("../testdata/schema.sql");
pub const SEED: &str = include_str!("../testdata/seed.sql");

pub fn init() -> TempDir {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")))
            .with_test_writer()
            .try_init();
    });
    TempDir::new().expect("failed to create temp dir")
}

// Creates a catalog database with the schema and the given inserts. The returned config points at it.
pub fn store_with(seed: &str) -> (Config, TempDir) {
    let temp_dir = init();
    let path = temp_dir.path().join("catalog.db");

    let conn = Connection::open(&path).expect("failed to open database");
    conn.execute_batch(SCHEMA).expect("failed to create schema");
    conn.execute_batch(seed).expect("failed to insert test data");
    drop(conn);

    (Config::new(path), temp_dir)
}

// Creates a catalog database seeded with the default fixture.
pub fn seeded_store() -> (Config, TempDir) {
    store_with(SEED)
}
