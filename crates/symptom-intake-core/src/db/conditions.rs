//! Condition knowledge-base operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{ConditionEntry, ConditionRecord};
use crate::pipeline::{ConditionRetriever, RetrievalError};

impl Database {
    /// Insert or update a condition entry.
    pub fn upsert_condition(&self, entry: &ConditionEntry) -> DbResult<()> {
        let entry_json = serde_json::to_string(entry)?;
        let content = entry.to_document();

        self.conn.execute(
            r#"
            INSERT INTO conditions (condition, entry, content, active, updated_at)
            VALUES (?1, ?2, ?3, 1, datetime('now'))
            ON CONFLICT(condition) DO UPDATE SET
                entry = excluded.entry,
                content = excluded.content,
                active = 1,
                updated_at = datetime('now')
            "#,
            params![entry.condition, entry_json, content],
        )?;
        Ok(())
    }

    /// Import a JSON array of condition entries in one transaction.
    ///
    /// Returns the number of entries written.
    pub fn import_conditions_json(&self, json: &str) -> DbResult<usize> {
        let entries: Vec<ConditionEntry> = serde_json::from_str(json)?;

        let tx = self.conn.unchecked_transaction()?;
        for entry in &entries {
            self.upsert_condition(entry)?;
        }
        tx.commit()?;

        tracing::info!(count = entries.len(), "Imported condition entries");
        Ok(entries.len())
    }

    /// Get a condition entry by name.
    pub fn get_condition(&self, condition: &str) -> DbResult<Option<ConditionEntry>> {
        let entry_json: Option<String> = self
            .conn
            .query_row(
                "SELECT entry FROM conditions WHERE condition = ?",
                [condition],
                |row| row.get(0),
            )
            .optional()?;

        Ok(entry_json
            .map(|json| serde_json::from_str(&json))
            .transpose()?)
    }

    /// Search active conditions using FTS5 (BM25 ranking).
    ///
    /// Query words are OR-ed with prefix matching, so a condition matching
    /// any symptom is a candidate and more matches rank higher.
    pub fn search_conditions(&self, query: &str, limit: usize) -> DbResult<Vec<ConditionRecord>> {
        let fts_query = escape_fts_query(query);
        if fts_query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT c.condition, c.content, bm25(conditions_fts) as rank
            FROM conditions c
            JOIN conditions_fts fts ON c.rowid = fts.rowid
            WHERE conditions_fts MATCH ?
            AND c.active = 1
            ORDER BY rank
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![fts_query, limit as i64], |row| {
            Ok(ConditionRecord {
                condition: row.get(0)?,
                content: row.get(1)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Get all condition entries, ordered by name.
    pub fn list_conditions(&self, active_only: bool) -> DbResult<Vec<ConditionEntry>> {
        let sql = if active_only {
            "SELECT entry FROM conditions WHERE active = 1 ORDER BY condition"
        } else {
            "SELECT entry FROM conditions ORDER BY condition"
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(serde_json::from_str(&row?)?);
        }
        Ok(entries)
    }

    /// Delete a condition.
    pub fn delete_condition(&self, condition: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM conditions WHERE condition = ?", [condition])?;
        Ok(rows_affected > 0)
    }

    /// Mark a condition as inactive so retrieval skips it.
    pub fn deactivate_condition(&self, condition: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE conditions SET active = 0, updated_at = datetime('now') WHERE condition = ?",
            [condition],
        )?;
        Ok(rows_affected > 0)
    }
}

impl ConditionRetriever for Database {
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ConditionRecord>, RetrievalError> {
        self.search_conditions(query, top_k)
            .map_err(|e| RetrievalError::Backend(e.to_string()))
    }
}

/// Turn free text into an FTS5 query of OR-ed prefix terms.
fn escape_fts_query(query: &str) -> String {
    // Anything but letters and digits separates terms; FTS5 operators are
    // uppercase, so lowercasing keeps user words from being read as syntax.
    let cleaned: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    cleaned
        .split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" OR ")
}
