use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::remote::types::ArticleMode;
use crate::store::schema::HistorySummary;
use crate::ui::theme::Theme;

/// Menu entries in display order.
pub const MODES: [ArticleMode; 2] = [ArticleMode::Generic, ArticleMode::Custom];

pub struct Menu<'a> {
    pub selected: usize,
    pub summary: HistorySummary,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(selected: usize, summary: HistorySummary, theme: &'a Theme) -> Self {
        Self {
            selected: selected.min(MODES.len() - 1),
            summary,
            theme,
        }
    }
}

pub fn next_index(selected: usize) -> usize {
    (selected + 1) % MODES.len()
}

pub fn prev_index(selected: usize) -> usize {
    if selected > 0 { selected - 1 } else { MODES.len() - 1 }
}

pub fn index_of(mode: ArticleMode) -> usize {
    MODES.iter().position(|m| *m == mode).unwrap_or(0)
}

fn labels(mode: ArticleMode) -> (String, String) {
    match mode {
        ArticleMode::Generic => (t!("menu.generic").to_string(), t!("menu.generic_desc").to_string()),
        ArticleMode::Custom => (t!("menu.custom").to_string(), t!("menu.custom_desc").to_string()),
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.name").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.tagline").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(MODES.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[2]);

        for (i, mode) in MODES.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let (label, description) = labels(*mode);

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {label}", i + 1),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {description}"),
                    Style::default().fg(colors.text_dim()),
                )),
            ];
            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }

        let summary = if self.summary.articles_completed == 0 {
            t!("menu.history_empty").to_string()
        } else {
            t!(
                "menu.history",
                count = self.summary.articles_completed,
                rate = format!("{:.0}", self.summary.first_try_rate)
            )
            .to_string()
        };
        Paragraph::new(Line::from(Span::styled(
            summary,
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps() {
        assert_eq!(next_index(0), 1);
        assert_eq!(next_index(1), 0);
        assert_eq!(prev_index(0), 1);
        assert_eq!(prev_index(1), 0);
    }

    #[test]
    fn test_index_of_mode() {
        assert_eq!(MODES[index_of(ArticleMode::Custom)], ArticleMode::Custom);
        assert_eq!(MODES[index_of(ArticleMode::Generic)], ArticleMode::Generic);
    }

    #[test]
    fn test_selection_is_clamped() {
        let theme = Theme::default();
        let menu = Menu::new(9, HistorySummary::default(), &theme);
        assert_eq!(menu.selected, MODES.len() - 1);
    }
}
