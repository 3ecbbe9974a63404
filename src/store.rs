//! Persistence handle passed through the context bundle
//!
//! Handlers see only [`TripStore`]. The bundle borrows it and never commits
//! or closes anything; [`Database`] is the SQLite implementation `main` owns.

mod schema;

use crate::plan::TravelPlan;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Database lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Narrow persistence interface used during one message cycle
pub trait TripStore: Send + Sync {
    /// Persist a plan and return its id
    fn save_trip(&self, user_id: &str, session_id: &str, plan: &TravelPlan) -> StoreResult<String>;

    /// Append one message/response pair to the conversation log
    fn record_exchange(
        &self,
        user_id: &str,
        session_id: &str,
        message: &str,
        response: &str,
    ) -> StoreResult<()>;
}

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn get_trip(&self, id: &str) -> StoreResult<Option<TravelPlan>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row("SELECT plan FROM trips WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        raw.map(|r| serde_json::from_str(&r).map_err(StoreError::from))
            .transpose()
    }

    pub fn session_exchanges(&self, session_id: &str) -> StoreResult<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT message, response FROM exchanges WHERE session_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![session_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let exchanges = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(exchanges)
    }
}

impl TripStore for Database {
    fn save_trip(&self, user_id: &str, session_id: &str, plan: &TravelPlan) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let json = serde_json::to_string(plan)?;
        self.conn()?.execute(
            "INSERT INTO trips (id, user_id, session_id, destination, plan, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                user_id,
                session_id,
                plan.destination,
                json,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(id)
    }

    fn record_exchange(
        &self,
        user_id: &str,
        session_id: &str,
        message: &str,
        response: &str,
    ) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT INTO exchanges (user_id, session_id, message, response, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, session_id, message, response, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
