use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::sign_stats::{SignRecord, SignStatsStore};

pub const SCHEMA_VERSION: u32 = 1;

/// One persisted statistics row. Rows are matched back to catalog signs by
/// the (roomaji, hiragana, katakana) triple. Times are kept in whole
/// milliseconds; anything finer is truncated on save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignRecordData {
    pub roomaji: String,
    pub hiragana: String,
    pub katakana: String,
    #[serde(default)]
    pub correct_hiragana_count: u32,
    #[serde(default)]
    pub wrong_hiragana_count: u32,
    #[serde(default)]
    pub correct_katakana_count: u32,
    #[serde(default)]
    pub wrong_katakana_count: u32,
    #[serde(default)]
    pub correct_time_hiragana_ms: u64,
    #[serde(default)]
    pub wrong_time_hiragana_ms: u64,
    #[serde(default)]
    pub correct_time_katakana_ms: u64,
    #[serde(default)]
    pub wrong_time_katakana_ms: u64,
}

impl From<&SignRecord> for SignRecordData {
    fn from(r: &SignRecord) -> Self {
        Self {
            roomaji: r.sign.roomaji.to_string(),
            hiragana: r.sign.hiragana.to_string(),
            katakana: r.sign.katakana.to_string(),
            correct_hiragana_count: r.correct_hiragana,
            wrong_hiragana_count: r.wrong_hiragana,
            correct_katakana_count: r.correct_katakana,
            wrong_katakana_count: r.wrong_katakana,
            correct_time_hiragana_ms: whole_millis(r.correct_time_hiragana),
            wrong_time_hiragana_ms: whole_millis(r.wrong_time_hiragana),
            correct_time_katakana_ms: whole_millis(r.correct_time_katakana),
            wrong_time_katakana_ms: whole_millis(r.wrong_time_katakana),
        }
    }
}

fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl SignRecordData {
    fn apply_to(&self, r: &mut SignRecord) {
        r.correct_hiragana = self.correct_hiragana_count;
        r.wrong_hiragana = self.wrong_hiragana_count;
        r.correct_katakana = self.correct_katakana_count;
        r.wrong_katakana = self.wrong_katakana_count;
        r.correct_time_hiragana = Duration::from_millis(self.correct_time_hiragana_ms);
        r.wrong_time_hiragana = Duration::from_millis(self.wrong_time_hiragana_ms);
        r.correct_time_katakana = Duration::from_millis(self.correct_time_katakana_ms);
        r.wrong_time_katakana = Duration::from_millis(self.wrong_time_katakana_ms);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignStatsData {
    pub schema_version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    pub records: Vec<SignRecordData>,
}

impl Default for SignStatsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: None,
            records: Vec::new(),
        }
    }
}

impl SignStatsData {
    pub fn from_store(store: &SignStatsStore) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
            records: store.records().iter().map(SignRecordData::from).collect(),
        }
    }

    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Copies matching rows into `store`. Rows without a catalog sign are
    /// dropped; signs without a row keep their zeroed counters. Returns the
    /// number of rows applied.
    pub fn restore_into(&self, store: &mut SignStatsStore) -> usize {
        let mut applied = 0;
        for row in &self.records {
            let Some(index) = store
                .records()
                .iter()
                .position(|r| r.sign.matches_triple(&row.roomaji, &row.hiragana, &row.katakana))
            else {
                tracing::debug!(roomaji = %row.roomaji, "dropping persisted row with no catalog sign");
                continue;
            };
            if let Some(record) = store.record_at_mut(index) {
                row.apply_to(record);
                applied += 1;
            }
        }
        applied
    }
}
