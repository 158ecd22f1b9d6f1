use serde::{Deserialize, Serialize};

use crate::session::result::ArticleResult;

const SCHEMA_VERSION: u32 = 1;

/// Oldest entries are dropped past this many.
pub const HISTORY_LIMIT: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticleHistoryData {
    pub schema_version: u32,
    pub articles: Vec<ArticleResult>,
}

impl Default for ArticleHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            articles: Vec::new(),
        }
    }
}

impl ArticleHistoryData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn push(&mut self, result: ArticleResult) {
        self.articles.push(result);
        if self.articles.len() > HISTORY_LIMIT {
            let excess = self.articles.len() - HISTORY_LIMIT;
            self.articles.drain(..excess);
        }
    }

    pub fn summary(&self) -> HistorySummary {
        let complete: Vec<_> = self.articles.iter().filter(|a| !a.partial).collect();
        let questions: usize = complete.iter().map(|a| a.questions).sum();
        let first_try: usize = complete.iter().map(|a| a.first_try).sum();
        HistorySummary {
            articles_completed: complete.len(),
            questions_answered: questions,
            first_try_rate: if questions > 0 {
                first_try as f64 / questions as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistorySummary {
    pub articles_completed: usize,
    pub questions_answered: usize,
    pub first_try_rate: f64,
}
