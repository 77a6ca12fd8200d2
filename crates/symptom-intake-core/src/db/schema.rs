//! SQLite schema definition.

/// Complete database schema for the condition knowledge base.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Condition Knowledge Base
-- ============================================================================

CREATE TABLE IF NOT EXISTS conditions (
    condition TEXT PRIMARY KEY,
    entry TEXT NOT NULL,                          -- JSON ConditionEntry
    content TEXT NOT NULL,                        -- Rendered retrieval document
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- FTS5 virtual table for full-text search
CREATE VIRTUAL TABLE IF NOT EXISTS conditions_fts USING fts5(
    condition,
    content,
    content='conditions',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS conditions_ai AFTER INSERT ON conditions BEGIN
    INSERT INTO conditions_fts(rowid, condition, content)
    VALUES (new.rowid, new.condition, new.content);
END;

CREATE TRIGGER IF NOT EXISTS conditions_ad AFTER DELETE ON conditions BEGIN
    INSERT INTO conditions_fts(conditions_fts, rowid, condition, content)
    VALUES ('delete', old.rowid, old.condition, old.content);
END;

CREATE TRIGGER IF NOT EXISTS conditions_au AFTER UPDATE ON conditions BEGIN
    INSERT INTO conditions_fts(conditions_fts, rowid, condition, content)
    VALUES ('delete', old.rowid, old.condition, old.content);
    INSERT INTO conditions_fts(rowid, condition, content)
    VALUES (new.rowid, new.condition, new.content);
END;

CREATE INDEX IF NOT EXISTS idx_conditions_active ON conditions(active);
"#;
