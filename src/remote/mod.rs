pub mod dispatch;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

use crate::remote::error::{FetchError, SyncError};
use crate::remote::types::{ArticleBundle, ArticleMode, ProgressState};

/// Source of articles and sink for learner progress.
///
/// Calls block; the dispatcher runs them off the UI thread.
pub trait ArticleService: Send + Sync {
    fn next_article(&self, mode: ArticleMode) -> Result<ArticleBundle, FetchError>;

    fn complete_article(&self, article_id: i64) -> Result<(), SyncError>;

    fn record_progress(
        &self,
        article_id: i64,
        word: &str,
        state: ProgressState,
    ) -> Result<(), SyncError>;
}
