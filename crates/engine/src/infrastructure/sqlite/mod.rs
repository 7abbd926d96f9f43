//! SQLite-backed battle and character storage.
//!
//! The pool holds a single connection: SQLite allows one writer at a time,
//! and a unit of work keeps its connection until it commits or is dropped.

mod battles;
mod characters;
mod rows;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        health INTEGER NOT NULL CHECK (health BETWEEN 0 AND 100),
        level INTEGER NOT NULL CHECK (level BETWEEN 1 AND 10),
        race_skill TEXT NOT NULL,
        primary_item_id TEXT,
        secondary_item_id TEXT,
        in_battle INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_items (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        character_id TEXT NOT NULL REFERENCES characters(id),
        item_id TEXT NOT NULL,
        category TEXT NOT NULL,
        value INTEGER NOT NULL,
        UNIQUE (character_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS battles (
        id TEXT PRIMARY KEY NOT NULL,
        opponent1_id TEXT NOT NULL,
        opponent2_id TEXT NOT NULL,
        active INTEGER NOT NULL,
        last_move_id TEXT,
        start_date TEXT NOT NULL,
        end_date TEXT,
        CHECK (opponent1_id <> opponent2_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS battle_moves (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        battle_id TEXT NOT NULL REFERENCES battles(id),
        opponent_id TEXT NOT NULL,
        move TEXT NOT NULL,
        create_date TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_battle_moves_battle ON battle_moves (battle_id, seq)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_character ON inventory_items (character_id, seq)",
];

/// SQLite implementation of the battle and character ports.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and ensure the schema exists.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }

        tracing::info!(db_path, "SQLite store ready");
        Ok(Self { pool })
    }
}
