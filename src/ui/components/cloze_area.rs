use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::exercise::{ClozeExercise, FeedbackKind, Outcome};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

const BLANK_WIDTH: usize = 8;

pub struct ClozeArea<'a> {
    exercise: &'a ClozeExercise,
    theme: &'a Theme,
}

impl<'a> ClozeArea<'a> {
    pub fn new(exercise: &'a ClozeExercise, theme: &'a Theme) -> Self {
        Self { exercise, theme }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlankKind {
    Pending,
    Current,
    Correct,
    Wrong,
    Feedback(FeedbackKind),
}

fn pad(text: &str) -> String {
    let len = text.chars().count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat_n('_', BLANK_WIDTH.saturating_sub(len)));
    out
}

/// What a blank shows: the solved word, the live input, or a numbered gap.
fn blank_label(ex: &ClozeExercise, index: usize) -> (String, BlankKind) {
    let number = index + 1;
    if index == ex.current_index() && !ex.is_locked(index) {
        if let Some(feedback) = ex.feedback() {
            return (
                format!("({number}){}", pad(&feedback.text)),
                BlankKind::Feedback(feedback.kind),
            );
        }
        return (
            format!("({number}){}", pad(ex.buffer())),
            BlankKind::Current,
        );
    }
    match ex.outcome(index) {
        Some(Outcome::Correct) => {
            let word = ex
                .questions()
                .get(index)
                .map(|q| q.target_word.clone())
                .unwrap_or_default();
            (word, BlankKind::Correct)
        }
        Some(Outcome::Wrong) => (format!("({number}){}", pad("")), BlankKind::Wrong),
        None => (format!("({number}){}", pad("")), BlankKind::Pending),
    }
}

fn blank_style(kind: BlankKind, is_current: bool, theme: &Theme) -> Style {
    let colors = &theme.colors;
    let style = match kind {
        BlankKind::Pending => Style::default().fg(colors.blank()),
        BlankKind::Current => Style::default()
            .fg(colors.blank_current_fg())
            .bg(colors.blank_current_bg()),
        BlankKind::Correct => Style::default().fg(colors.answer_correct()),
        BlankKind::Wrong => Style::default().fg(colors.answer_wrong()),
        BlankKind::Feedback(FeedbackKind::NotInBank) => Style::default()
            .fg(colors.rejected())
            .add_modifier(Modifier::CROSSED_OUT),
        BlankKind::Feedback(FeedbackKind::Wrong) => Style::default()
            .fg(colors.answer_wrong())
            .add_modifier(Modifier::CROSSED_OUT),
    };
    if is_current {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn push_text(lines: &mut Vec<Vec<Span<'static>>>, text: &str, style: Style) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(Vec::new());
        }
        if !part.is_empty()
            && let Some(line) = lines.last_mut()
        {
            line.push(Span::styled(part.to_string(), style));
        }
    }
}

/// Lay the article out as lines, returning them with the line index that
/// holds the current question.
fn build_lines(ex: &ClozeExercise, theme: &Theme) -> (Vec<Line<'static>>, usize) {
    let text_style = Style::default().fg(theme.colors.fg());
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut current_line = 0;

    let spans = &ex.text.spans;
    for (i, span) in spans.iter().enumerate() {
        push_text(&mut lines, span, text_style);
        if i < ex.total() {
            let is_current = i == ex.current_index();
            if is_current {
                current_line = lines.len() - 1;
            }
            let (label, kind) = blank_label(ex, i);
            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(label, blank_style(kind, is_current, theme)));
            }
        }
    }

    (lines.into_iter().map(Line::from).collect(), current_line)
}

impl Widget for ClozeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (lines, current_line) = build_lines(self.exercise, self.theme);

        let block = Block::bordered()
            .title(format!(" {} ", self.exercise.article.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        // Keep the current blank on screen for long articles.
        let width = inner.width as usize;
        let rows_before: usize = lines[..current_line]
            .iter()
            .map(|l| wrapped_line_count(&l.to_string(), width))
            .sum();
        let visible = inner.height as usize;
        let scroll = if visible > 0 && rows_before >= visible {
            rows_before + 1 - visible / 2
        } else {
            0
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .render(area, buf);
    }
}
