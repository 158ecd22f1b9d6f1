use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which article pool to draw from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleMode {
    /// Shared template articles; no per-user progress is stored.
    #[default]
    Generic,
    /// Articles generated for the learner; progress is synced per word.
    Custom,
}

impl ArticleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleMode::Generic => "generic",
            ArticleMode::Custom => "custom",
        }
    }

    /// Whether answers in this mode are persisted remotely.
    pub fn is_identified(self) -> bool {
        matches!(self, ArticleMode::Custom)
    }
}

impl fmt::Display for ArticleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(ArticleMode::Generic),
            "custom" => Ok(ArticleMode::Custom),
            other => Err(format!("unknown article mode '{other}' (expected generic or custom)")),
        }
    }
}

/// Per-word state as stored by the progress service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemoteWordState {
    #[default]
    Unused,
    Correct,
    Wrong,
}

impl RemoteWordState {
    /// Unknown or missing values are treated as unused.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "correct" => RemoteWordState::Correct,
            Some(s) if s == "wrong" => RemoteWordState::Wrong,
            _ => RemoteWordState::Unused,
        }
    }
}

/// An outcome reported back to the progress service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    Correct,
    Wrong,
}

impl ProgressState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressState::Correct => "correct",
            ProgressState::Wrong => "wrong",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastery_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl WordItem {
    pub fn new(word: &str, meaning: &str) -> Self {
        Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn remote_state(&self) -> RemoteWordState {
        RemoteWordState::parse(self.state.as_deref())
    }
}

/// Everything needed to start one article.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub word_bank: Vec<WordItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_from_service_json() {
        let json = r#"{
            "articleId": 42,
            "title": "The Power of Innovation",
            "content": "Success requires [courage,勇气].",
            "wordBank": [
                {"id": 7, "word": "courage", "meaning": "勇气", "masteryScore": 3, "state": "wrong"},
                {"word": "bravery", "meaning": "勇敢"}
            ]
        }"#;
        let bundle: ArticleBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.article_id, Some(42));
        assert_eq!(bundle.word_bank.len(), 2);
        assert_eq!(bundle.word_bank[0].remote_state(), RemoteWordState::Wrong);
        assert_eq!(bundle.word_bank[1].remote_state(), RemoteWordState::Unused);
    }

    #[test]
    fn test_generic_bundle_has_no_id() {
        let json = r#"{"title": "t", "content": "c", "wordBank": []}"#;
        let bundle: ArticleBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.article_id, None);
    }

    #[test]
    fn test_remote_state_parse() {
        assert_eq!(RemoteWordState::parse(Some("correct")), RemoteWordState::Correct);
        assert_eq!(RemoteWordState::parse(Some("WRONG")), RemoteWordState::Wrong);
        assert_eq!(RemoteWordState::parse(Some("unused")), RemoteWordState::Unused);
        assert_eq!(RemoteWordState::parse(Some("mastered")), RemoteWordState::Unused);
        assert_eq!(RemoteWordState::parse(None), RemoteWordState::Unused);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Custom".parse::<ArticleMode>(), Ok(ArticleMode::Custom));
        assert_eq!("generic".parse::<ArticleMode>(), Ok(ArticleMode::Generic));
        assert!("daily".parse::<ArticleMode>().is_err());
    }

    #[test]
    fn test_progress_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ProgressState::Wrong).unwrap(), "\"wrong\"");
    }
}
