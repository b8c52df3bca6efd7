use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::ConfirmState,
    i18n::{self, Lang},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, lang: Lang, confirm: Option<&ConfirmState>) {
    let Some(confirm) = confirm else {
        return;
    };
    let theme = Theme::default();
    let message = i18n::tr(lang, confirm.message_key);

    let width = ((message.chars().count() + 6).max(30) as u16).min(area.width);
    let height = 5u16.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect { x, y, width, height };

    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", i18n::tr(lang, "delete")),
            Style::default().fg(theme.warning),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.panel));

    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(format!(" {}   ", i18n::tr(lang, "yes"))),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(format!(" {}", i18n::tr(lang, "no"))),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
