//! SQLite sink implementation
//!
//! This module provides a SQLite-based implementation of the DataSink trait.

use crate::sink::schema::initialize_schema;
use crate::sink::traits::{DataSink, SinkError, SinkResult};
use crate::sink::{OutputRecord, RunRecord, RunStatus};
use crate::url::host_of;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;

/// SQLite record store
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Creates a new SqliteSink instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new crawl run and returns its ID
    pub fn create_run(&mut self, config_hash: &str) -> SinkResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Marks a run as completed with a finish timestamp
    pub fn complete_run(&mut self, run_id: i64) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        Ok(())
    }

    /// Gets a run by ID
    pub fn get_run(&self, run_id: i64) -> SinkResult<RunRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
        )?;

        let run = stmt
            .query_row(params![run_id], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?
            .ok_or(SinkError::RunNotFound(run_id))?;

        Ok(run)
    }

    fn tags_for(&self, record_id: i64) -> SinkResult<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM record_tags WHERE record_id = ?1")?;
        let tags = stmt
            .query_map(params![record_id], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;
        Ok(tags)
    }
}

impl DataSink for SqliteSink {
    fn append(&mut self, record: &OutputRecord, run_id: i64) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        let host = host_of(&record.url).unwrap_or_default();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO records (company, title, date, pdf_url, exec_summary, url, host, run_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.company,
                record.title,
                record.date,
                record.pdf_url,
                record.exec_summary,
                record.url,
                host,
                run_id,
                now
            ],
        )?;
        let record_id = tx.last_insert_rowid();

        for tag in &record.tags {
            tx.execute(
                "INSERT OR IGNORE INTO record_tags (record_id, tag) VALUES (?1, ?2)",
                params![record_id, tag],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn count_records(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_pdf_records(&self) -> SinkResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE pdf_url != ''",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_distinct_pages(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(DISTINCT url) FROM records", [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    fn records_per_host(&self) -> SinkResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT host, COUNT(*) AS n FROM records GROUP BY host ORDER BY n DESC, host ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn top_tags(&self, limit: usize) -> SinkResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tag, COUNT(*) AS n FROM record_tags GROUP BY tag ORDER BY n DESC, tag ASC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn load_records(&self) -> SinkResult<Vec<OutputRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company, title, date, pdf_url, exec_summary, url FROM records ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    OutputRecord {
                        company: row.get(1)?,
                        title: row.get(2)?,
                        date: row.get(3)?,
                        pdf_url: row.get(4)?,
                        exec_summary: row.get(5)?,
                        tags: BTreeSet::new(),
                        url: row.get(6)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, mut record) in rows {
            record.tags = self.tags_for(id)?;
            records.push(record);
        }
        Ok(records)
    }
}
