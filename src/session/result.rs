use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::types::ArticleMode;
use crate::session::controller::FinishedArticle;

/// One finished (or skipped) article, as kept in the local history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticleResult {
    #[serde(default)]
    pub article_id: Option<i64>,
    pub title: String,
    pub mode: ArticleMode,
    pub questions: usize,
    pub first_try: usize,
    pub wrong_attempts: usize,
    #[serde(default)]
    pub rejected_inputs: usize,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    /// Skipped before every question was resolved.
    #[serde(default)]
    pub partial: bool,
}

impl ArticleResult {
    pub fn from_finished(finished: &FinishedArticle) -> Self {
        let accuracy = if finished.questions > 0 {
            finished.first_try as f64 / finished.questions as f64 * 100.0
        } else {
            100.0
        };
        Self {
            article_id: finished.article_id,
            title: finished.title.clone(),
            mode: finished.mode,
            questions: finished.questions,
            first_try: finished.first_try,
            wrong_attempts: finished.wrong_attempts,
            rejected_inputs: finished.rejected_inputs,
            accuracy,
            elapsed_secs: finished.elapsed_ms as f64 / 1000.0,
            timestamp: Utc::now(),
            partial: finished.answered < finished.questions,
        }
    }
}
