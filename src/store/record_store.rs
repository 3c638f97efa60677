//! SQLite-backed per-app record store
//!
//! One database file per app (`<databases_dir>/<app>.db`), one table per
//! declared model. Every call opens its own connection and closes it before
//! returning; nothing is cached between calls.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use crate::error::Result;
use crate::store::entry::Entry;
use crate::store::model::{resolve_model, validate_app_name, ModelCatalog, ModelSpec};

/// A database file found in the databases directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFile {
    /// File stem, i.e. the app name
    pub app_name: String,
    /// Size in bytes
    pub size: u64,
}

/// Record store for all apps under one databases directory
#[derive(Debug, Clone)]
pub struct RecordStore<C> {
    databases_dir: PathBuf,
    catalog: C,
    /// Explicit model choice for apps declaring several models
    model: Option<String>,
}

impl<C: ModelCatalog> RecordStore<C> {
    pub fn new(databases_dir: impl Into<PathBuf>, catalog: C) -> Self {
        Self {
            databases_dir: databases_dir.into(),
            catalog,
            model: None,
        }
    }

    /// Target a specific model instead of requiring a single declared one
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn databases_dir(&self) -> &Path {
        &self.databases_dir
    }

    /// Path of the database file backing an app
    pub fn database_path(&self, app_name: &str) -> Result<PathBuf> {
        validate_app_name(app_name)?;
        Ok(self.databases_dir.join(format!("{}.db", app_name)))
    }

    /// Create the backing table of every declared model that is missing.
    ///
    /// Returns whether at least one table was created. All model names are
    /// validated before anything touches the disk.
    pub fn init(&self, app_name: &str, models: &[ModelSpec]) -> Result<bool> {
        let tables = models
            .iter()
            .map(ModelSpec::table_name)
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.open(app_name)?;
        let tx = conn.transaction()?;
        let mut created = false;

        for table in &tables {
            if !table_exists(&tx, table)? {
                tx.execute(&create_table_sql(table, false), [])?;
                info!(app = app_name, table = %table, "created table");
                created = true;
            }
        }

        tx.commit()?;
        Ok(created)
    }

    /// Insert a record into the app's model table, returning its id
    pub fn save(&self, app_name: &str, content: &str) -> Result<i64> {
        let table = self.target_table(app_name)?;
        let conn = self.open(app_name)?;

        conn.execute(&create_table_sql(&table, true), [])?;
        conn.execute(
            &format!("INSERT INTO \"{}\" (content) VALUES (?1)", table),
            params![content],
        )?;

        let id = conn.last_insert_rowid();
        debug!(app = app_name, table = %table, id, "saved entry");
        Ok(id)
    }

    /// All entries, newest first (ties: most recently inserted first)
    pub fn list(&self, app_name: &str) -> Result<Vec<Entry>> {
        let table = self.target_table(app_name)?;
        let Some(conn) = self.open_existing_table(app_name, &table)? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT id, created_at, content FROM \"{}\" ORDER BY created_at DESC, id DESC",
            table
        ))?;
        let entries = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let created_at: NaiveDateTime = row.get(1)?;
                let content: String = row.get(2)?;
                Ok(Entry::new(id, created_at, content))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(app = app_name, count = entries.len(), "listed entries");
        Ok(entries)
    }

    /// Number of stored entries
    pub fn count(&self, app_name: &str) -> Result<usize> {
        let table = self.target_table(app_name)?;
        let Some(conn) = self.open_existing_table(app_name, &table)? else {
            return Ok(0);
        };

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", table),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Remove one entry; true iff it existed
    pub fn delete(&self, app_name: &str, id: i64) -> Result<bool> {
        Ok(self.delete_many(app_name, &[id])? == 1)
    }

    /// Remove several entries in one transaction; returns how many existed
    pub fn delete_many(&self, app_name: &str, ids: &[i64]) -> Result<usize> {
        let table = self.target_table(app_name)?;
        let Some(mut conn) = self.open_existing_table(app_name, &table)? else {
            return Ok(0);
        };

        let tx = conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare(&format!("DELETE FROM \"{}\" WHERE id = ?1", table))?;
            for id in ids {
                removed += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;

        debug!(app = app_name, requested = ids.len(), removed, "deleted entries");
        Ok(removed)
    }

    /// Every `*.db` file in the databases directory, sorted by app name
    pub fn list_databases(&self) -> Result<Vec<DatabaseFile>> {
        if !self.databases_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.databases_dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("db") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push(DatabaseFile {
                    app_name: stem.to_string(),
                    size: fs::metadata(&path)?.len(),
                });
            }
        }

        files.sort_by(|a, b| a.app_name.cmp(&b.app_name));
        Ok(files)
    }

    /// Resolve the table operations on `app_name` target.
    ///
    /// Fails with a configuration error for unknown apps, apps without
    /// models, and multi-model apps without a model selector.
    pub fn target_table(&self, app_name: &str) -> Result<String> {
        let models = self.catalog.models(app_name)?;
        resolve_model(app_name, &models, self.model.as_deref())?.table_name()
    }

    /// Open (creating if needed) the app's database
    fn open(&self, app_name: &str) -> Result<Connection> {
        let path = self.database_path(app_name)?;
        fs::create_dir_all(&self.databases_dir)?;
        Ok(Connection::open(path)?)
    }

    /// Open the app's database only if both the file and table exist
    fn open_existing_table(&self, app_name: &str, table: &str) -> Result<Option<Connection>> {
        let path = self.database_path(app_name)?;
        if !path.exists() {
            return Ok(None);
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        if table_exists(&conn, table)? {
            Ok(Some(conn))
        } else {
            Ok(None)
        }
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// `table` must already be validated
fn create_table_sql(table: &str, if_not_exists: bool) -> String {
    format!(
        "CREATE TABLE {}\"{}\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            content TEXT NOT NULL
        )",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        table
    )
}
