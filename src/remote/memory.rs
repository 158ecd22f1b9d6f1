use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rust_embed::Embed;
use tracing::debug;

use crate::remote::ArticleService;
use crate::remote::error::{FetchError, SyncError};
use crate::remote::types::{ArticleBundle, ArticleMode, ProgressState};
use crate::session::word_bank::normalize;

#[derive(Embed)]
#[folder = "assets/articles/"]
struct ArticleAssets;

/// Offline article service backed by in-process state.
///
/// Serves the bundled demo articles with `--demo` and stands in for the
/// network in tests. Custom articles keep per-word progress until completed.
pub struct MemoryArticleService {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    generic: Vec<ArticleBundle>,
    next_generic: usize,
    custom: Vec<ArticleBundle>,
    completed: BTreeSet<i64>,
    progress: HashMap<i64, HashMap<String, ProgressState>>,
    custom_locked: bool,
    injected: VecDeque<FetchError>,
    fetches: usize,
}

impl MemoryArticleService {
    pub fn new(generic: Vec<ArticleBundle>, custom: Vec<ArticleBundle>) -> Self {
        Self {
            state: Mutex::new(State {
                generic,
                custom,
                ..State::default()
            }),
        }
    }

    /// Service over the articles bundled with the binary.
    pub fn demo() -> Result<Self> {
        Ok(Self::new(
            load_bundled("generic.json")?,
            load_bundled("custom.json")?,
        ))
    }

    /// Refuse custom articles the way a fresh account would.
    pub fn lock_custom(&self) {
        self.lock().custom_locked = true;
    }

    /// Make the next fetch fail with `err`.
    pub fn fail_next(&self, err: FetchError) {
        self.lock().injected.push_back(err);
    }

    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    pub fn is_completed(&self, article_id: i64) -> bool {
        self.lock().completed.contains(&article_id)
    }

    pub fn recorded_state(&self, article_id: i64, word: &str) -> Option<ProgressState> {
        self.lock()
            .progress
            .get(&article_id)
            .and_then(|words| words.get(&normalize(word)).copied())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State stays consistent even if a holder panicked mid-test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_bundled(name: &str) -> Result<Vec<ArticleBundle>> {
    let file = ArticleAssets::get(name).with_context(|| format!("missing bundled {name}"))?;
    serde_json::from_slice(file.data.as_ref()).with_context(|| format!("parsing bundled {name}"))
}

impl ArticleService for MemoryArticleService {
    fn next_article(&self, mode: ArticleMode) -> Result<ArticleBundle, FetchError> {
        let mut state = self.lock();
        state.fetches += 1;
        if let Some(err) = state.injected.pop_front() {
            return Err(err);
        }

        match mode {
            ArticleMode::Generic => {
                if state.generic.is_empty() {
                    return Err(FetchError::NoTemplates);
                }
                let index = state.next_generic % state.generic.len();
                state.next_generic = index + 1;
                let mut bundle = state.generic[index].clone();
                bundle.article_id = None;
                Ok(bundle)
            }
            ArticleMode::Custom => {
                if state.custom_locked {
                    return Err(FetchError::Locked);
                }
                let Some(article) = state
                    .custom
                    .iter()
                    .find(|a| a.article_id.is_some_and(|id| !state.completed.contains(&id)))
                else {
                    return Err(FetchError::WordsExhausted);
                };
                let mut bundle = article.clone();
                if let Some(words) = bundle.article_id.and_then(|id| state.progress.get(&id)) {
                    for item in &mut bundle.word_bank {
                        if let Some(recorded) = words.get(&normalize(&item.word)) {
                            item.state = Some(recorded.as_str().to_string());
                        }
                    }
                }
                debug!(article_id = ?bundle.article_id, "serving custom article");
                Ok(bundle)
            }
        }
    }

    fn complete_article(&self, article_id: i64) -> Result<(), SyncError> {
        let mut state = self.lock();
        if !state.custom.iter().any(|a| a.article_id == Some(article_id)) {
            return Err(SyncError::UnknownArticle(article_id));
        }
        state.completed.insert(article_id);
        Ok(())
    }

    fn record_progress(
        &self,
        article_id: i64,
        word: &str,
        progress: ProgressState,
    ) -> Result<(), SyncError> {
        let mut state = self.lock();
        if !state.custom.iter().any(|a| a.article_id == Some(article_id)) {
            return Err(SyncError::UnknownArticle(article_id));
        }
        state
            .progress
            .entry(article_id)
            .or_default()
            .insert(normalize(word), progress);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::{RemoteWordState, WordItem};

    fn custom_article(id: i64, words: &[&str]) -> ArticleBundle {
        ArticleBundle {
            article_id: Some(id),
            title: format!("article {id}"),
            content: words.iter().map(|w| format!("[{w}]")).collect::<Vec<_>>().join(" "),
            word_bank: words.iter().map(|w| WordItem::new(w, "")).collect(),
        }
    }

    #[test]
    fn test_demo_articles_load() {
        let svc = MemoryArticleService::demo().unwrap();
        let generic = svc.next_article(ArticleMode::Generic).unwrap();
        assert_eq!(generic.article_id, None);
        assert!(!generic.word_bank.is_empty());
        let custom = svc.next_article(ArticleMode::Custom).unwrap();
        assert!(custom.article_id.is_some());
    }

    #[test]
    fn test_generic_articles_rotate() {
        let a = ArticleBundle {
            title: "a".into(),
            ..ArticleBundle::default()
        };
        let b = ArticleBundle {
            title: "b".into(),
            ..ArticleBundle::default()
        };
        let svc = MemoryArticleService::new(vec![a, b], Vec::new());
        let titles: Vec<_> = (0..3)
            .map(|_| svc.next_article(ArticleMode::Generic).unwrap().title)
            .collect();
        assert_eq!(titles, ["a", "b", "a"]);
    }

    #[test]
    fn test_empty_pools_map_to_errors() {
        let svc = MemoryArticleService::new(Vec::new(), Vec::new());
        assert_eq!(svc.next_article(ArticleMode::Generic), Err(FetchError::NoTemplates));
        assert_eq!(svc.next_article(ArticleMode::Custom), Err(FetchError::WordsExhausted));
    }

    #[test]
    fn test_locked_custom() {
        let svc = MemoryArticleService::new(Vec::new(), vec![custom_article(1, &["a"])]);
        svc.lock_custom();
        assert_eq!(svc.next_article(ArticleMode::Custom), Err(FetchError::Locked));
    }

    #[test]
    fn test_progress_is_served_back() {
        let svc = MemoryArticleService::new(Vec::new(), vec![custom_article(1, &["alpha", "beta"])]);
        svc.record_progress(1, "Alpha", ProgressState::Correct).unwrap();
        svc.record_progress(1, "beta", ProgressState::Wrong).unwrap();
        let bundle = svc.next_article(ArticleMode::Custom).unwrap();
        assert_eq!(bundle.word_bank[0].remote_state(), RemoteWordState::Correct);
        assert_eq!(bundle.word_bank[1].remote_state(), RemoteWordState::Wrong);
        assert_eq!(svc.recorded_state(1, "ALPHA"), Some(ProgressState::Correct));
    }

    #[test]
    fn test_complete_moves_to_next_article() {
        let svc = MemoryArticleService::new(
            Vec::new(),
            vec![custom_article(1, &["a"]), custom_article(2, &["b"])],
        );
        svc.complete_article(1).unwrap();
        assert!(svc.is_completed(1));
        assert_eq!(svc.next_article(ArticleMode::Custom).unwrap().article_id, Some(2));
        svc.complete_article(2).unwrap();
        assert_eq!(svc.next_article(ArticleMode::Custom), Err(FetchError::WordsExhausted));
    }

    #[test]
    fn test_unknown_article_sync_fails() {
        let svc = MemoryArticleService::new(Vec::new(), Vec::new());
        assert_eq!(svc.complete_article(7), Err(SyncError::UnknownArticle(7)));
        assert_eq!(
            svc.record_progress(7, "x", ProgressState::Wrong),
            Err(SyncError::UnknownArticle(7))
        );
    }

    #[test]
    fn test_injected_failure_applies_once() {
        let svc = MemoryArticleService::demo().unwrap();
        svc.fail_next(FetchError::Network("offline".into()));
        assert!(svc.next_article(ArticleMode::Generic).is_err());
        assert!(svc.next_article(ArticleMode::Generic).is_ok());
        assert_eq!(svc.fetch_count(), 2);
    }
}
