//! Optional on-disk store of evaluation results.
//!
//! Layered beneath the in-memory cache so repeated runs over the same
//! corpus skip the subprocess cost entirely. Strictly optional; the engine
//! is fully functional without it.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use stylefit_core::serde::{from_json_slice, to_canonical_json_bytes};
use stylefit_core::{sha256_hex, ErrorInfo, StyleFitError};

use crate::cache::{CacheKey, Evaluation};

fn store_error(code: &str, err: impl ToString) -> StyleFitError {
    StyleFitError::Cache(ErrorInfo::new(code, err.to_string()))
}

/// SQLite-backed evaluation store keyed by a digest of the cache key.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StyleFitError> {
        let conn = Connection::open(path).map_err(|err| store_error("store-open", err))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS evaluations (
                 key TEXT PRIMARY KEY,
                 summary BLOB NOT NULL,
                 output BLOB
             )",
        )
        .map_err(|err| store_error("store-schema", err))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn key_digest(key: &CacheKey) -> String {
        sha256_hex(format!("{}\0{}\0{}", key.formatter.0, key.style.0, key.source.0).as_bytes())
    }

    /// Fetches a stored evaluation, if present.
    pub fn get(&self, key: &CacheKey) -> Result<Option<(Evaluation, Option<Vec<u8>>)>, StyleFitError> {
        let digest = Self::key_digest(key);
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let row: Option<(Vec<u8>, Option<Vec<u8>>)> = conn
            .query_row(
                "SELECT summary, output FROM evaluations WHERE key = ?1",
                params![digest],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|err| store_error("store-read", err))?;
        match row {
            None => Ok(None),
            Some((summary_bytes, output)) => {
                let summary: Evaluation = from_json_slice(&summary_bytes)?;
                Ok(Some((summary, output)))
            }
        }
    }

    /// Persists an evaluation. Failed evaluations are not stored, so a
    /// transient tool failure never poisons later runs.
    pub fn put(
        &self,
        key: &CacheKey,
        evaluation: &Evaluation,
        output: Option<&[u8]>,
    ) -> Result<(), StyleFitError> {
        if evaluation.failure.is_some() {
            return Ok(());
        }
        let digest = Self::key_digest(key);
        let summary_bytes = to_canonical_json_bytes(evaluation)?;
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        conn.execute(
            "INSERT OR REPLACE INTO evaluations (key, summary, output) VALUES (?1, ?2, ?3)",
            params![digest, summary_bytes, output],
        )
        .map_err(|err| store_error("store-write", err))?;
        Ok(())
    }
}
