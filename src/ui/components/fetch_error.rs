use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::remote::error::{FailureCategory, FetchError};
use crate::ui::theme::Theme;

/// Translation key for the guidance shown for each failure category.
pub fn guidance_key(category: FailureCategory) -> &'static str {
    match category {
        FailureCategory::LockedContent => "error.locked",
        FailureCategory::ExhaustedWords => "error.exhausted",
        FailureCategory::NoTemplates => "error.no_templates",
        FailureCategory::Generic => "error.generic",
        FailureCategory::Network => "error.network",
    }
}

pub struct FetchErrorPanel<'a> {
    error: &'a FetchError,
    theme: &'a Theme,
}

impl<'a> FetchErrorPanel<'a> {
    pub fn new(error: &'a FetchError, theme: &'a Theme) -> Self {
        Self { error, theme }
    }
}

impl Widget for FetchErrorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let category = self.error.category();

        let block = Block::bordered()
            .title(format!(" {} ", t!("error.title")))
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!(guidance_key(category)).to_string(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ];
        // Detail helps with server and network trouble; the other
        // categories are fully described by their guidance.
        if matches!(category, FailureCategory::Generic | FailureCategory::Network) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                self.error.to_string(),
                Style::default().fg(colors.text_dim()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            t!("error.footer").to_string(),
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
