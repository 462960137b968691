// crates/db/src/history.rs
// Prediction-history CRUD. Records are append-only from the service's point
// of view: created once, read many times, never mutated.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::{Database, DbError, DbResult};

/// A prediction to persist. Id and timestamp are assigned by the store.
///
/// `thumbnail` and `probability` are correlated: both present for
/// image-origin predictions, both absent for text-origin ones.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub thumbnail: Option<Vec<u8>>,
    pub predicted_tag: String,
    pub probability: Option<f64>,
}

/// Stored form of a prediction, as returned by [`Database::insert_prediction`].
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    pub id: i64,
    pub thumbnail: Option<Vec<u8>>,
    pub predicted_tag: String,
    pub probability: Option<f64>,
    /// Timezone-naive UTC, assigned at insert.
    pub timestamp: NaiveDateTime,
}

/// History listing row (no thumbnail blob; fetched separately by id).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub predicted_tag: String,
    pub probability: Option<f64>,
    pub timestamp: NaiveDateTime,
}

impl Database {
    /// Append one prediction record. Single atomic insert: id and timestamp
    /// are assigned here, and readers never observe a partial row.
    pub async fn insert_prediction(&self, new: NewPrediction) -> DbResult<PredictionRecord> {
        let NewPrediction {
            thumbnail,
            predicted_tag,
            probability,
        } = new;
        let timestamp = Utc::now().naive_utc();

        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO prediction_history (image_thumbnail, predicted_tag, probability, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(thumbnail.as_deref())
        .bind(&predicted_tag)
        .bind(probability)
        .bind(timestamp)
        .fetch_one(self.pool())
        .await?;

        Ok(PredictionRecord {
            id: row.0,
            thumbnail,
            predicted_tag,
            probability,
            timestamp,
        })
    }

    /// Full history, most recent first. Equal timestamps fall back to
    /// descending id, i.e. most recently inserted wins.
    pub async fn list_history(&self) -> DbResult<Vec<HistoryEntry>> {
        let rows: Vec<HistoryEntry> = sqlx::query_as(
            r#"
            SELECT id, predicted_tag, probability, timestamp
            FROM prediction_history
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Fetch the stored thumbnail for one record.
    ///
    /// `NotFound` when no record has this id; `NoThumbnail` when the record
    /// exists but is text-origin. The nested `Option` keeps the two cases
    /// apart in a single query.
    pub async fn get_thumbnail(&self, id: i64) -> DbResult<Vec<u8>> {
        let row: Option<(Option<Vec<u8>>,)> =
            sqlx::query_as("SELECT image_thumbnail FROM prediction_history WHERE id = ?1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        match row {
            None => Err(DbError::NotFound(id)),
            Some((None,)) => Err(DbError::NoThumbnail(id)),
            Some((Some(bytes),)) => Ok(bytes),
        }
    }
}
