use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::session::tokenizer::{ClozeText, Question};
use crate::session::word_bank::{WordBank, normalize};

/// How long a rejected or wrong answer stays on screen.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    NotInBank,
    Wrong,
}

/// Transient cue shown in place of the input after a failed submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
    pub until: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Empty buffer or an already solved question.
    Ignored,
    /// The word is not in the word bank. Nothing was recorded.
    Rejected { input: String },
    Incorrect {
        index: usize,
        submitted: String,
        intended: String,
    },
    Correct {
        index: usize,
        word: String,
        /// No question is left without an outcome.
        finished: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Article {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
}

pub struct ClozeExercise {
    pub article: Article,
    pub text: ClozeText,
    pub bank: WordBank,
    answered: BTreeMap<usize, Outcome>,
    current: usize,
    buffer: String,
    feedback: Option<Feedback>,
    missed: BTreeSet<usize>,
    solved_here: BTreeSet<usize>,
    pub wrong_attempts: usize,
    pub rejected_inputs: usize,
    pub started_at: Instant,
}

impl ClozeExercise {
    pub fn new(
        article: Article,
        text: ClozeText,
        bank: WordBank,
        answered: BTreeMap<usize, Outcome>,
        resume_index: usize,
    ) -> Self {
        let current = resume_index.min(text.len().saturating_sub(1));
        Self {
            article,
            text,
            bank,
            answered,
            current,
            buffer: String::new(),
            feedback: None,
            missed: BTreeSet::new(),
            solved_here: BTreeSet::new(),
            wrong_attempts: 0,
            rejected_inputs: 0,
            started_at: Instant::now(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.text.questions
    }

    pub fn total(&self) -> usize {
        self.text.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.text.questions.get(self.current)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.answered.get(&index).copied()
    }

    pub fn answered(&self) -> &BTreeMap<usize, Outcome> {
        &self.answered
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    /// Questions solved during this sitting without a wrong attempt first.
    pub fn first_try_count(&self) -> usize {
        self.solved_here.difference(&self.missed).count()
    }

    pub fn progress(&self) -> f64 {
        if self.text.is_empty() {
            return 0.0;
        }
        self.answered_count() as f64 / self.total() as f64
    }

    pub fn is_locked(&self, index: usize) -> bool {
        matches!(self.outcome(index), Some(Outcome::Correct))
    }

    /// Input for the current question is ignored when it is already solved or
    /// there is no question at all.
    pub fn input_locked(&self) -> bool {
        self.current_question().is_none() || self.is_locked(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.answered.len() >= self.total()
    }

    pub fn push_char(&mut self, ch: char) {
        if self.input_locked() {
            return;
        }
        self.feedback = None;
        self.buffer.push(ch);
    }

    pub fn delete_last(&mut self) {
        if self.input_locked() {
            return;
        }
        self.buffer.pop();
    }

    pub fn submit(&mut self, now: Instant) -> Submission {
        if self.input_locked() || self.buffer.trim().is_empty() {
            return Submission::Ignored;
        }
        let Some(question) = self.text.questions.get(self.current) else {
            return Submission::Ignored;
        };
        let index = question.index;
        let intended = question.target_word.clone();

        let input = normalize(&self.buffer);
        self.buffer.clear();

        if !self.bank.contains(&input) {
            self.rejected_inputs += 1;
            self.feedback = Some(Feedback {
                kind: FeedbackKind::NotInBank,
                text: input.clone(),
                until: now + FEEDBACK_DURATION,
            });
            return Submission::Rejected { input };
        }

        if input == normalize(&intended) {
            self.bank.mark_correct(&input);
            self.answered.insert(index, Outcome::Correct);
            self.solved_here.insert(index);
            self.feedback = None;
            return Submission::Correct {
                index,
                word: intended,
                finished: self.is_finished(),
            };
        }

        self.bank.mark_wrong(&input, &intended);
        self.wrong_attempts += 1;
        self.missed.insert(index);
        self.feedback = Some(Feedback {
            kind: FeedbackKind::Wrong,
            text: input.clone(),
            until: now + FEEDBACK_DURATION,
        });
        Submission::Incorrect {
            index,
            submitted: input,
            intended,
        }
    }

    /// First question after `index` without any outcome, wrapping around.
    pub fn next_unanswered_after(&self, index: usize) -> Option<usize> {
        let total = self.total();
        (index + 1..total)
            .chain(0..index.min(total))
            .find(|i| !self.answered.contains_key(i))
    }

    pub fn focus(&mut self, index: usize) {
        if index < self.total() && index != self.current {
            self.current = index;
            self.buffer.clear();
            self.feedback = None;
        }
    }

    pub fn focus_next(&mut self) {
        if self.current + 1 < self.total() {
            self.focus(self.current + 1);
        }
    }

    pub fn focus_prev(&mut self) {
        if self.current > 0 {
            self.focus(self.current - 1);
        }
    }

    /// Drop expired feedback.
    pub fn tick(&mut self, now: Instant) {
        if self.feedback.as_ref().is_some_and(|f| now >= f.until) {
            self.feedback = None;
        }
    }
}
