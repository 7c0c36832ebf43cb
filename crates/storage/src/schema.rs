use rusqlite::Connection;

use crate::error::StorageError;

/// Apply connection pragmas and make sure the administered tables exist.
/// All DDL is idempotent; against a live game database this is a no-op.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS characters (
    charidentifier INTEGER PRIMARY KEY,
    steamname TEXT NOT NULL DEFAULT '',
    firstname TEXT NOT NULL DEFAULT '',
    lastname TEXT NOT NULL DEFAULT '',
    money REAL NOT NULL DEFAULT 0,
    "group" TEXT NOT NULL DEFAULT 'user',
    skinPlayer TEXT,
    coords TEXT
);

CREATE TABLE IF NOT EXISTS aprts_ranch_config_animals (
    animal_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price INTEGER NOT NULL DEFAULT 0,
    model TEXT NOT NULL DEFAULT '',
    m_model TEXT NOT NULL DEFAULT '',
    health INTEGER NOT NULL DEFAULT 0,
    adultAge INTEGER NOT NULL DEFAULT 0,
    WalkOnly INTEGER NOT NULL DEFAULT 0,
    offsetX REAL NOT NULL DEFAULT 0,
    offsetY REAL NOT NULL DEFAULT 0,
    offsetZ REAL NOT NULL DEFAULT 0,
    food INTEGER NOT NULL DEFAULT 0,
    water INTEGER NOT NULL DEFAULT 0,
    foodMax INTEGER NOT NULL DEFAULT 0,
    waterMax INTEGER NOT NULL DEFAULT 0,
    kibble TEXT NOT NULL DEFAULT '',
    kibbleFood INTEGER NOT NULL DEFAULT 0,
    poop TEXT NOT NULL DEFAULT '',
    poopChance REAL NOT NULL DEFAULT 0,
    dieAge INTEGER NOT NULL DEFAULT 0,
    pregnancyTime INTEGER NOT NULL DEFAULT 0,
    pregnancyChance INTEGER NOT NULL DEFAULT 0,
    noFuckTime INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS aprts_ranch_config_animal_products (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id INTEGER NOT NULL
        REFERENCES aprts_ranch_config_animals (animal_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    item TEXT NOT NULL DEFAULT '',
    prop TEXT,
    gather INTEGER NOT NULL DEFAULT 1,
    amount INTEGER NOT NULL DEFAULT 0,
    maxAmount INTEGER,
    lifetime INTEGER NOT NULL DEFAULT 0,
    tool TEXT,
    anim TEXT,
    chance INTEGER NOT NULL DEFAULT 100,
    gender TEXT
);
CREATE INDEX IF NOT EXISTS idx_products_animal
    ON aprts_ranch_config_animal_products (animal_id);

CREATE TABLE IF NOT EXISTS items (
    item TEXT PRIMARY KEY,
    label TEXT NOT NULL DEFAULT ''
);
"#;
