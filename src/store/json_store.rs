use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::session::result::ArticleResult;
use crate::store::schema::ArticleHistoryData;

const HISTORY_FILE: &str = "article_history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordgap");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = name, error = %e, "unreadable store file, starting fresh");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self) -> ArticleHistoryData {
        let data: ArticleHistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            ArticleHistoryData::default()
        } else {
            data
        }
    }

    pub fn save_history(&self, data: &ArticleHistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    /// Append one result and persist the trimmed history.
    pub fn record(&self, history: &mut ArticleHistoryData, result: ArticleResult) -> Result<()> {
        history.push(result);
        self.save_history(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::ArticleMode;
    use crate::store::schema::HISTORY_LIMIT;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn result(title: &str, questions: usize, first_try: usize, partial: bool) -> ArticleResult {
        ArticleResult {
            article_id: None,
            title: title.to_string(),
            mode: ArticleMode::Generic,
            questions,
            first_try,
            wrong_attempts: questions - first_try,
            rejected_inputs: 0,
            accuracy: 0.0,
            elapsed_secs: 10.0,
            timestamp: Utc::now(),
            partial,
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let (_dir, store) = make_test_store();
        assert!(store.load_history().articles.is_empty());
    }

    #[test]
    fn test_record_persists() {
        let (_dir, store) = make_test_store();
        let mut history = store.load_history();
        store.record(&mut history, result("one", 4, 3, false)).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.articles.len(), 1);
        assert_eq!(loaded.articles[0].title, "one");
        assert!(!store.file_path("article_history.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(HISTORY_FILE), "{ not json").unwrap();
        assert!(store.load_history().articles.is_empty());
    }

    #[test]
    fn test_stale_schema_resets() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(HISTORY_FILE),
            r#"{"schema_version": 99, "articles": []}"#,
        )
        .unwrap();
        assert!(!store.load_history().needs_reset());
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = ArticleHistoryData::default();
        for i in 0..HISTORY_LIMIT + 5 {
            history.push(result(&i.to_string(), 1, 1, false));
        }
        assert_eq!(history.articles.len(), HISTORY_LIMIT);
        assert_eq!(history.articles[0].title, "5");
    }

    #[test]
    fn test_summary_ignores_partial_articles() {
        let mut history = ArticleHistoryData::default();
        history.push(result("a", 4, 3, false));
        history.push(result("b", 6, 5, false));
        history.push(result("c", 5, 0, true));
        let summary = history.summary();
        assert_eq!(summary.articles_completed, 2);
        assert_eq!(summary.questions_answered, 10);
        assert!((summary.first_try_rate - 80.0).abs() < 1e-9);
    }
}
