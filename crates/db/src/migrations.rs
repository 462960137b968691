/// Inline SQL migrations for the sortcycle database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: prediction history table. The thumbnail lives inline as a
    // blob so history reads need no secondary storage lookup.
    r#"
CREATE TABLE IF NOT EXISTS prediction_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    image_thumbnail BLOB,
    predicted_tag TEXT NOT NULL,
    probability REAL,
    timestamp TEXT NOT NULL
);
"#,
    // Migration 2: reverse-chronological listing index
    r#"
CREATE INDEX IF NOT EXISTS idx_prediction_history_timestamp
    ON prediction_history(timestamp DESC, id DESC);
"#,
];
