//! SQLite issue store
//!
//! Each issue is one row of the `issues` table. Insertion order is kept in
//! the `seq` column and is the order `find` returns.

use super::{IssueStore, Result, StoreError};
use crate::filter::{Condition, FieldValue, IssueField, IssueFilter, IssueUpdate};
use crate::issue::{Issue, IssueId, NewIssue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Unicode-aware lowercase, registered on every connection
const FOLD_CASE_FN: &str = "fold_case";

const SELECT_COLUMNS: &str = "seq, id, project, issue_title, issue_text, created_by, \
     assigned_to, status_text, created_on, updated_on, open";

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Memory,
    File(PathBuf),
}

impl StorageLocation {
    /// Parse a connection string
    pub fn parse(connection_string: &str) -> Result<Self> {
        let raw = connection_string.trim();

        if raw == "sqlite::memory:" || raw == ":memory:" {
            return Ok(Self::Memory);
        }

        let path = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);

        if path.is_empty() || path.contains("://") {
            return Err(StoreError::InvalidConnectionString(
                connection_string.to_string(),
            ));
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Issue store backed by a single SQLite connection
pub struct SqliteIssueStore {
    conn: Mutex<Connection>,
    location: StorageLocation,
}

impl SqliteIssueStore {
    /// Open or create the database and make sure the schema exists
    pub fn open(location: StorageLocation) -> Result<Self> {
        let conn = match &location {
            StorageLocation::Memory => {
                tracing::info!("Opening in-memory issue database");
                Connection::open_in_memory()?
            }
            StorageLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                tracing::info!(path = %path.display(), "Opening issue database");
                let conn = Connection::open(path)?;
                conn.pragma_update(None, "journal_mode", &"WAL")?;
                conn
            }
        };

        register_functions(&conn)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// Private in-memory store
    pub fn in_memory() -> Result<Self> {
        Self::open(StorageLocation::Memory)
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }
}

/// SQLite's built-in `lower()` only folds ASCII letters
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )?;

    Ok(())
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS issues (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            project TEXT NOT NULL,
            issue_title TEXT NOT NULL,
            issue_text TEXT NOT NULL,
            created_by TEXT NOT NULL,
            assigned_to TEXT NOT NULL DEFAULT '',
            status_text TEXT NOT NULL DEFAULT '',
            created_on INTEGER NOT NULL,
            updated_on INTEGER NOT NULL,
            open INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project);
        "#,
    )?;

    Ok(())
}

#[async_trait]
impl IssueStore for SqliteIssueStore {
    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let conn = self.conn.lock().await;
        let rows = select_rows(&conn, filter, None)?;

        tracing::debug!(
            project = filter.project(),
            conditions = filter.conditions().len(),
            count = rows.len(),
            "Found issues"
        );

        Ok(rows.into_iter().map(|(_, issue)| issue).collect())
    }

    async fn insert(&self, issue: NewIssue) -> Result<IssueId> {
        let id = IssueId::generate();
        let conn = self.conn.lock().await;

        conn.execute(
            r#"
            INSERT INTO issues (
                id, project, issue_title, issue_text, created_by,
                assigned_to, status_text, created_on, updated_on, open
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                id.as_string(),
                &issue.project,
                &issue.issue_title,
                &issue.issue_text,
                &issue.created_by,
                &issue.assigned_to,
                &issue.status_text,
                issue.created_on.timestamp_millis(),
                issue.updated_on.timestamp_millis(),
                issue.open,
            ],
        )?;

        tracing::debug!(project = %issue.project, id = %id, "Inserted issue");
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        filter: &IssueFilter,
        update: &IssueUpdate,
    ) -> Result<Option<Issue>> {
        let conn = self.conn.lock().await;
        let tx = conn.unchecked_transaction()?;

        let Some((seq, _)) = select_rows(&tx, filter, Some(1))?.into_iter().next() else {
            return Ok(None);
        };

        let mut assignments = Vec::with_capacity(update.changes().len() + 1);
        let mut values = Vec::with_capacity(update.changes().len() + 2);
        for change in update.changes() {
            assignments.push(format!("{} = ?", change.field.column()));
            values.push(to_sql_value(&change.value));
        }
        // updated_on never drops below created_on
        assignments.push("updated_on = MAX(?, created_on)".to_string());
        values.push(Value::Integer(update.updated_on().timestamp_millis()));
        values.push(Value::Integer(seq));

        let sql = format!("UPDATE issues SET {} WHERE seq = ?", assignments.join(", "));
        tx.execute(&sql, params_from_iter(values.iter()))?;

        let updated = select_by_seq(&tx, seq)?;
        tx.commit()?;

        tracing::debug!(
            project = filter.project(),
            changes = update.changes().len(),
            "Updated issue"
        );
        Ok(updated)
    }

    async fn delete_one(&self, filter: &IssueFilter) -> Result<u64> {
        let conn = self.conn.lock().await;
        let tx = conn.unchecked_transaction()?;

        let Some((seq, issue)) = select_rows(&tx, filter, Some(1))?.into_iter().next() else {
            return Ok(0);
        };

        let deleted = tx.execute("DELETE FROM issues WHERE seq = ?", params![seq])?;
        tx.commit()?;

        tracing::debug!(project = %issue.project, id = %issue.id, deleted, "Deleted issue");
        Ok(deleted as u64)
    }
}

/// Raw column values before validation
struct IssueRow {
    seq: i64,
    id: String,
    project: String,
    issue_title: String,
    issue_text: String,
    created_by: String,
    assigned_to: String,
    status_text: String,
    created_on: i64,
    updated_on: i64,
    open: bool,
}

impl IssueRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            id: row.get(1)?,
            project: row.get(2)?,
            issue_title: row.get(3)?,
            issue_text: row.get(4)?,
            created_by: row.get(5)?,
            assigned_to: row.get(6)?,
            status_text: row.get(7)?,
            created_on: row.get(8)?,
            updated_on: row.get(9)?,
            open: row.get(10)?,
        })
    }

    fn into_issue(self) -> Result<(i64, Issue)> {
        let id = IssueId::parse(&self.id).map_err(|e| StoreError::CorruptRecord {
            id: self.id.clone(),
            reason: e.to_string(),
        })?;
        let created_on = millis_to_datetime(&self.id, self.created_on)?;
        let updated_on = millis_to_datetime(&self.id, self.updated_on)?;

        Ok((
            self.seq,
            Issue {
                id,
                project: self.project,
                issue_title: self.issue_title,
                issue_text: self.issue_text,
                created_by: self.created_by,
                assigned_to: self.assigned_to,
                status_text: self.status_text,
                created_on,
                updated_on,
                open: self.open,
            },
        ))
    }
}

fn millis_to_datetime(id: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| StoreError::CorruptRecord {
        id: id.to_string(),
        reason: format!("timestamp out of range: {}", millis),
    })
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Flag(flag) => Value::Integer(i64::from(*flag)),
        FieldValue::Timestamp(ts) => Value::Integer(ts.timestamp_millis()),
    }
}

/// Translate a filter into a WHERE clause and its bound values
///
/// Column names come from [`IssueField::column`], never from request input.
fn where_clause(filter: &IssueFilter) -> (String, Vec<Value>) {
    let mut terms = vec![format!("{} = ?", IssueField::Project.column())];
    let mut values = vec![Value::Text(filter.project().to_string())];

    for condition in filter.conditions() {
        match condition {
            Condition::Equals { field, value } => {
                terms.push(format!("{} = ?", field.column()));
                values.push(to_sql_value(value));
            }
            Condition::Contains { field, needle } => {
                terms.push(format!(
                    "instr({fold}({}), {fold}(?)) > 0",
                    field.column(),
                    fold = FOLD_CASE_FN
                ));
                values.push(Value::Text(needle.clone()));
            }
        }
    }

    (terms.join(" AND "), values)
}

fn select_rows(
    conn: &Connection,
    filter: &IssueFilter,
    limit: Option<usize>,
) -> Result<Vec<(i64, Issue)>> {
    let (clause, values) = where_clause(filter);
    let mut sql = format!(
        "SELECT {} FROM issues WHERE {} ORDER BY seq",
        SELECT_COLUMNS, clause
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), IssueRow::from_row)?;

    let mut issues = Vec::new();
    for row in rows {
        issues.push(row?.into_issue()?);
    }
    Ok(issues)
}

fn select_by_seq(conn: &Connection, seq: i64) -> Result<Option<Issue>> {
    let sql = format!("SELECT {} FROM issues WHERE seq = ?", SELECT_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![seq], IssueRow::from_row)?;

    match rows.next() {
        Some(row) => Ok(Some(row?.into_issue()?.1)),
        None => Ok(None),
    }
}
