use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::session::word_bank::{WordBank, WordStatus};
use crate::ui::theme::Theme;

/// Side panel listing every candidate word with its status.
pub struct WordBankPanel<'a> {
    bank: &'a WordBank,
    show_meaning: bool,
    theme: &'a Theme,
}

impl<'a> WordBankPanel<'a> {
    pub fn new(bank: &'a WordBank, show_meaning: bool, theme: &'a Theme) -> Self {
        Self {
            bank,
            show_meaning,
            theme,
        }
    }
}

impl Widget for WordBankPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("bank.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut lines: Vec<Line> = self
            .bank
            .entries()
            .iter()
            .map(|entry| {
                let style = match entry.status {
                    WordStatus::Unused => Style::default().fg(colors.fg()),
                    WordStatus::Correct => Style::default()
                        .fg(colors.answer_correct())
                        .add_modifier(Modifier::DIM),
                    WordStatus::Wrong => Style::default().fg(colors.answer_wrong()),
                    WordStatus::WrongAnswer => Style::default().fg(colors.wrong_answer()),
                };
                let marker = if entry.has_been_wrong { "! " } else { "  " };
                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(colors.warning())),
                    Span::styled(entry.word.clone(), style),
                ];
                if self.show_meaning && !entry.meaning.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", entry.meaning),
                        Style::default().fg(colors.text_dim()),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        if self.bank.entries().iter().any(|e| e.has_been_wrong) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                t!("bank.legend").to_string(),
                Style::default().fg(colors.text_dim()),
            )));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::word_bank::WordEntry;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_words_and_wrong_marker() {
        let mut bank = WordBank::new(vec![
            WordEntry::new("courage", "勇气"),
            WordEntry::new("bravery", "勇敢"),
        ]);
        bank.mark_wrong("bravery", "courage");

        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        WordBankPanel::new(&bank, false, &Theme::default()).render(area, &mut buf);

        assert!(row(&buf, 1).contains("! courage"));
        assert!(row(&buf, 2).contains("! bravery"));
    }

    #[test]
    fn test_meaning_only_when_enabled() {
        let bank = WordBank::new(vec![WordEntry::new("focus", "专注")]);
        let area = Rect::new(0, 0, 30, 4);

        let mut hidden = Buffer::empty(area);
        WordBankPanel::new(&bank, false, &Theme::default()).render(area, &mut hidden);
        assert!(!row(&hidden, 1).contains('专'));

        let mut shown = Buffer::empty(area);
        WordBankPanel::new(&bank, true, &Theme::default()).render(area, &mut shown);
        assert!(row(&shown, 1).contains('专'));
    }
}
