use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::remote::error::FetchError;
use crate::remote::types::{ArticleBundle, ArticleMode, ProgressState, RemoteWordState, WordItem};
use crate::session::exercise::{Article, ClozeExercise, Outcome, Submission};
use crate::session::input::{self, EditAction, KeyInput};
use crate::session::tokenizer::{ClozeText, tokenize};
use crate::session::word_bank::{WordBank, WordEntry, WordStatus, normalize};

/// Preferences handed to the engine by the surrounding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub show_meaning: bool,
    pub advance_delay: Duration,
    pub completion_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            show_meaning: true,
            advance_delay: Duration::from_millis(100),
            completion_delay: Duration::from_millis(600),
        }
    }
}

/// Work the application must carry out on the controller's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    FetchArticle {
        generation: u64,
        mode: ArticleMode,
    },
    RecordProgress {
        article_id: i64,
        word: String,
        state: ProgressState,
    },
    CompleteArticle {
        article_id: i64,
    },
    /// An article was finished locally (for history bookkeeping).
    ArticleFinished(FinishedArticle),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedArticle {
    pub article_id: Option<i64>,
    pub title: String,
    pub mode: ArticleMode,
    pub questions: usize,
    pub answered: usize,
    pub first_try: usize,
    pub wrong_attempts: usize,
    pub rejected_inputs: usize,
    pub elapsed_ms: u64,
}

pub enum SessionState {
    Idle,
    Loading,
    Active(ClozeExercise),
    Failed(FetchError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Advance { to: usize, due: Instant },
    Complete { due: Instant },
}

pub struct SessionController {
    mode: ArticleMode,
    pub config: SessionConfig,
    generation: u64,
    state: SessionState,
    fetching: bool,
    pending: Option<Pending>,
}

impl SessionController {
    pub fn new(mode: ArticleMode, config: SessionConfig) -> Self {
        Self {
            mode,
            config,
            generation: 0,
            state: SessionState::Idle,
            fetching: false,
            pending: None,
        }
    }

    pub fn mode(&self) -> ArticleMode {
        self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn exercise(&self) -> Option<&ClozeExercise> {
        match &self.state {
            SessionState::Active(ex) => Some(ex),
            _ => None,
        }
    }

    fn exercise_mut(&mut self) -> Option<&mut ClozeExercise> {
        match &mut self.state {
            SessionState::Active(ex) => Some(ex),
            _ => None,
        }
    }

    /// A fetch is outstanding while the previous article is still shown.
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// A correct answer is waiting out its settle or completion delay.
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    /// Input and navigation are frozen while settling or fetching the next
    /// article.
    fn frozen(&self) -> bool {
        self.pending.is_some() || self.fetching
    }

    /// Load the first article for the current mode.
    pub fn start(&mut self) -> Effect {
        self.state = SessionState::Loading;
        self.pending = None;
        self.begin_fetch()
    }

    /// Drop the running session and load an article from `mode`.
    pub fn switch_mode(&mut self, mode: ArticleMode) -> Effect {
        debug!(from = %self.mode, to = %mode, "switching article mode");
        self.mode = mode;
        self.start()
    }

    /// Retry after a failed fetch.
    pub fn retry(&mut self) -> Effect {
        self.start()
    }

    fn begin_fetch(&mut self) -> Effect {
        self.generation += 1;
        self.fetching = true;
        Effect::FetchArticle {
            generation: self.generation,
            mode: self.mode,
        }
    }

    /// Apply a fetch result. Returns false when the response is stale.
    pub fn on_article_loaded(
        &mut self,
        generation: u64,
        result: Result<ArticleBundle, FetchError>,
    ) -> bool {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "discarding stale article response");
            return false;
        }
        self.fetching = false;
        self.pending = None;
        self.state = match result {
            Ok(bundle) => {
                info!(title = %bundle.title, words = bundle.word_bank.len(), "article loaded");
                SessionState::Active(build_exercise(&bundle))
            }
            Err(err) => {
                info!(error = %err, "article fetch failed");
                SessionState::Failed(err)
            }
        };
        true
    }

    /// Route one key press through the input reducer.
    pub fn handle_key(&mut self, key: KeyInput, now: Instant) -> Vec<Effect> {
        let Some(ex) = self.exercise() else {
            return Vec::new();
        };
        let locked = ex.input_locked() || self.frozen();
        match input::reduce(key, locked, ex.buffer().is_empty()) {
            Some(EditAction::Append(ch)) => {
                if let Some(ex) = self.exercise_mut() {
                    ex.push_char(ch);
                }
                Vec::new()
            }
            Some(EditAction::DeleteLast) => {
                if let Some(ex) = self.exercise_mut() {
                    ex.delete_last();
                }
                Vec::new()
            }
            Some(EditAction::Submit) => self.submit(now),
            None => Vec::new(),
        }
    }

    pub fn submit(&mut self, now: Instant) -> Vec<Effect> {
        if self.frozen() {
            return Vec::new();
        }
        let mode = self.mode;
        let advance_delay = self.config.advance_delay;
        let completion_delay = self.config.completion_delay;
        let Some(ex) = self.exercise_mut() else {
            return Vec::new();
        };
        let article_id = ex.article.id;

        let (sync, pending) = match ex.submit(now) {
            Submission::Ignored | Submission::Rejected { .. } => return Vec::new(),
            Submission::Incorrect { intended, .. } => ((intended, ProgressState::Wrong), None),
            Submission::Correct {
                index,
                word,
                finished,
            } => {
                let pending = if finished {
                    Pending::Complete {
                        due: now + completion_delay,
                    }
                } else {
                    let to = ex.next_unanswered_after(index).unwrap_or(index);
                    Pending::Advance {
                        to,
                        due: now + advance_delay,
                    }
                };
                ((word, ProgressState::Correct), Some(pending))
            }
        };
        if pending.is_some() {
            self.pending = pending;
        }

        let mut effects = Vec::new();
        if let (true, Some(article_id)) = (mode.is_identified(), article_id) {
            effects.push(Effect::RecordProgress {
                article_id,
                word: sync.0,
                state: sync.1,
            });
        }
        effects
    }

    /// Advance timers. Returns the effects of a completion that fired.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        if let Some(ex) = self.exercise_mut() {
            ex.tick(now);
        }
        match self.pending {
            Some(Pending::Advance { to, due }) if now >= due => {
                self.pending = None;
                if let Some(ex) = self.exercise_mut() {
                    ex.focus(to);
                }
                Vec::new()
            }
            Some(Pending::Complete { due }) if now >= due => {
                self.pending = None;
                self.complete()
            }
            _ => Vec::new(),
        }
    }

    /// Finish the current article and ask for the next one.
    pub fn skip_article(&mut self) -> Vec<Effect> {
        if self.fetching || self.exercise().is_none() {
            return Vec::new();
        }
        self.pending = None;
        self.complete()
    }

    fn complete(&mut self) -> Vec<Effect> {
        let mode = self.mode;
        let mut effects = Vec::new();
        if let Some(ex) = self.exercise() {
            effects.push(Effect::ArticleFinished(FinishedArticle {
                article_id: ex.article.id,
                title: ex.article.title.clone(),
                mode,
                questions: ex.total(),
                answered: ex.answered_count(),
                first_try: ex.first_try_count(),
                wrong_attempts: ex.wrong_attempts,
                rejected_inputs: ex.rejected_inputs,
                elapsed_ms: ex.started_at.elapsed().as_millis() as u64,
            }));
            if let (true, Some(article_id)) = (mode.is_identified(), ex.article.id) {
                effects.push(Effect::CompleteArticle { article_id });
            }
        }
        effects.push(self.begin_fetch());
        effects
    }

    pub fn focus_next(&mut self) {
        if self.frozen() {
            return;
        }
        if let Some(ex) = self.exercise_mut() {
            ex.focus_next();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.frozen() {
            return;
        }
        if let Some(ex) = self.exercise_mut() {
            ex.focus_prev();
        }
    }
}

/// Build the exercise for a freshly fetched bundle.
pub fn build_exercise(bundle: &ArticleBundle) -> ClozeExercise {
    let bank = build_word_bank(&bundle.word_bank);
    let mut text = tokenize(&bundle.content);
    attach_meanings(&mut text, &bank);
    let (answered, resume) = seed_progress(&text, &bundle.word_bank);
    let article = Article {
        id: bundle.article_id,
        title: bundle.title.clone(),
        content: bundle.content.clone(),
    };
    ClozeExercise::new(article, text, bank, answered, resume)
}

pub fn build_word_bank(items: &[WordItem]) -> WordBank {
    let entries = items
        .iter()
        .map(|item| {
            let remote = item.remote_state();
            WordEntry {
                word: item.word.clone(),
                meaning: item.meaning.clone(),
                status: match remote {
                    RemoteWordState::Unused => WordStatus::Unused,
                    RemoteWordState::Correct => WordStatus::Correct,
                    RemoteWordState::Wrong => WordStatus::Wrong,
                },
                has_been_wrong: remote == RemoteWordState::Wrong,
            }
        })
        .collect();
    WordBank::new(entries)
}

fn attach_meanings(text: &mut ClozeText, bank: &WordBank) {
    for question in &mut text.questions {
        question.meaning = bank
            .lookup(&question.target_word)
            .map(|e| e.meaning.clone())
            .filter(|m| !m.is_empty());
    }
}

/// Pre-mark questions whose word was already resolved remotely and find the
/// first question still to be done. Falls back to 0 when all are resolved.
pub fn seed_progress(text: &ClozeText, items: &[WordItem]) -> (BTreeMap<usize, Outcome>, usize) {
    let mut answered = BTreeMap::new();
    let mut resume = None;
    for question in &text.questions {
        let target = normalize(&question.target_word);
        let state = items
            .iter()
            .find(|item| normalize(&item.word) == target)
            .map(WordItem::remote_state)
            .unwrap_or_default();
        match state {
            RemoteWordState::Correct => {
                answered.insert(question.index, Outcome::Correct);
            }
            RemoteWordState::Wrong => {
                answered.insert(question.index, Outcome::Wrong);
            }
            RemoteWordState::Unused => {
                if resume.is_none() {
                    resume = Some(question.index);
                }
            }
        }
    }
    (answered, resume.unwrap_or(0))
}
