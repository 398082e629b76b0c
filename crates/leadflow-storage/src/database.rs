// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes -- the
//! single writer is what makes the queue's conditional status updates atomic
//! with respect to overlapping dispatcher and response-tracker invocations.

use leadflow_core::LeadflowError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to the Leadflow SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection`. Query modules accept
/// `&Database` and go through [`Database::connection`] + `call()`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` with WAL mode and
    /// run all pending migrations.
    pub async fn open(path: &str) -> Result<Self, LeadflowError> {
        Self::open_with(path, true).await
    }

    /// Open the database at `path`, optionally without WAL journaling.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, LeadflowError> {
        let conn = Connection::open(path.to_owned())
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let pragmas = if wal_mode {
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;"
        } else {
            "PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;"
        };

        conn.call(move |conn| -> Result<(), LeadflowError> {
            conn.execute_batch(pragmas)
                .map_err(|e| LeadflowError::Storage {
                    source: Box::new(e),
                })?;
            crate::migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| LeadflowError::Storage {
            source: Box::new(e),
        })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// Returns the underlying connection handle for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), LeadflowError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the storage error taxonomy.
pub(crate) fn map_tr_err(err: tokio_rusqlite::Error) -> LeadflowError {
    LeadflowError::Storage {
        source: Box::new(err),
    }
}
