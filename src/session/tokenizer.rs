use tracing::warn;

/// One blank derived from a `[word,...]` marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub index: usize,
    pub target_word: String,
    /// Byte offset of the opening `[` in the article content.
    pub char_offset: usize,
    /// Byte offset just past the closing `]`.
    pub marker_end: usize,
    pub meaning: Option<String>,
}

/// An article split into literal spans and the questions between them.
///
/// `spans.len() == questions.len() + 1`: `spans[i]` precedes question `i` and
/// the final span trails the last question.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClozeText {
    pub questions: Vec<Question>,
    pub spans: Vec<String>,
}

impl ClozeText {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Rebuild the article, substituting each marker with `render(question)`.
    pub fn render_with<F>(&self, mut render: F) -> String
    where
        F: FnMut(&Question) -> String,
    {
        let mut out = String::new();
        for (span, question) in self.spans.iter().zip(&self.questions) {
            out.push_str(span);
            out.push_str(&render(question));
        }
        if let Some(last) = self.spans.last() {
            out.push_str(last);
        }
        out
    }
}

/// Split `content` into questions and literal spans.
///
/// Malformed markers (no closing bracket on the same line, or an empty
/// answer token) are left in the text verbatim.
pub fn tokenize(content: &str) -> ClozeText {
    let bytes = content.as_bytes();
    let mut questions = Vec::new();
    let mut spans = Vec::new();
    let mut span_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'[' {
            pos += 1;
            continue;
        }

        let close = match find_close(bytes, pos + 1) {
            Some(close) => close,
            None => {
                warn!(offset = pos, "unterminated cloze marker, keeping it as text");
                pos += 1;
                continue;
            }
        };

        let inner = &content[pos + 1..close];
        let word = inner.split(',').next().unwrap_or("").trim();
        if word.is_empty() {
            warn!(offset = pos, marker = inner, "cloze marker has no answer word");
            pos = close + 1;
            continue;
        }

        spans.push(content[span_start..pos].to_string());
        questions.push(Question {
            index: questions.len(),
            target_word: word.to_string(),
            char_offset: pos,
            marker_end: close + 1,
            meaning: None,
        });
        pos = close + 1;
        span_start = pos;
    }

    spans.push(content[span_start..].to_string());
    ClozeText { questions, spans }
}

/// Position of the `]` closing a marker opened just before `from`. A newline
/// or another `[` ends the search.
fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    for (offset, &b) in bytes[from..].iter().enumerate() {
        match b {
            b']' => return Some(from + offset),
            b'[' | b'\n' => return None,
            _ => {}
        }
    }
    None
}
