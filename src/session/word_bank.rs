#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WordStatus {
    #[default]
    Unused,
    Correct,
    /// The learner typed this word into a blank it does not belong to.
    Wrong,
    /// This word was the answer to a blank the learner got wrong.
    WrongAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub meaning: String,
    pub status: WordStatus,
    pub has_been_wrong: bool,
}

impl WordEntry {
    pub fn new(word: &str, meaning: &str) -> Self {
        Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            status: WordStatus::Unused,
            has_been_wrong: false,
        }
    }

    fn matches(&self, word: &str) -> bool {
        normalize(&self.word) == normalize(word)
    }
}

/// Lowercased and trimmed form used for every word comparison.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Candidate words for the current article, in display order.
#[derive(Clone, Debug, Default)]
pub struct WordBank {
    entries: Vec<WordEntry>,
}

impl WordBank {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, word: &str) -> Option<&WordEntry> {
        self.entries.iter().find(|e| e.matches(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn mark_correct(&mut self, word: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.matches(word)) {
            entry.status = WordStatus::Correct;
        }
    }

    /// `submitted` was typed into the blank whose answer is `intended`.
    ///
    /// When both name the same entry the `WrongAnswer` status wins.
    pub fn mark_wrong(&mut self, submitted: &str, intended: &str) {
        for entry in self.entries.iter_mut() {
            let is_submitted = entry.matches(submitted);
            let is_intended = entry.matches(intended);
            if is_submitted {
                entry.status = WordStatus::Wrong;
                entry.has_been_wrong = true;
            }
            if is_intended {
                entry.status = WordStatus::WrongAnswer;
                entry.has_been_wrong = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> WordBank {
        WordBank::new(vec![
            WordEntry::new("courage", "勇气"),
            WordEntry::new("bravery", "勇敢"),
            WordEntry::new("Innovation", "创新"),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let bank = bank();
        assert_eq!(bank.lookup("COURAGE").map(|e| e.meaning.as_str()), Some("勇气"));
        assert!(bank.lookup("innovation").is_some());
        assert!(bank.lookup("dedication").is_none());
    }

    #[test]
    fn test_mark_correct_keeps_wrong_flag() {
        let mut bank = bank();
        bank.mark_wrong("bravery", "courage");
        bank.mark_correct("Courage");
        let entry = bank.lookup("courage").unwrap();
        assert_eq!(entry.status, WordStatus::Correct);
        assert!(entry.has_been_wrong);
    }

    #[test]
    fn test_mark_wrong_marks_both_entries() {
        let mut bank = bank();
        bank.mark_wrong("bravery", "courage");
        let bravery = bank.lookup("bravery").unwrap();
        let courage = bank.lookup("courage").unwrap();
        assert_eq!(bravery.status, WordStatus::Wrong);
        assert_eq!(courage.status, WordStatus::WrongAnswer);
        assert!(bravery.has_been_wrong);
        assert!(courage.has_been_wrong);
        assert_eq!(bank.lookup("innovation").unwrap().status, WordStatus::Unused);
    }

    #[test]
    fn test_mark_wrong_same_entry_prefers_wrong_answer() {
        let mut bank = bank();
        bank.mark_wrong("courage", "COURAGE");
        let entry = bank.lookup("courage").unwrap();
        assert_eq!(entry.status, WordStatus::WrongAnswer);
        assert!(entry.has_been_wrong);
    }

    #[test]
    fn test_has_been_wrong_is_monotonic() {
        let mut bank = bank();
        bank.mark_wrong("bravery", "courage");
        bank.mark_correct("courage");
        bank.mark_correct("bravery");
        assert!(bank.entries().iter().filter(|e| e.word != "Innovation").all(|e| e.has_been_wrong));
    }
}
