use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, Section},
    i18n,
    ui::{components::{centered_rect, tabs}, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !state.help_open {
        return;
    }

    let theme = Theme::default();
    let lang = state.lang;
    let popup = centered_rect(70, 70, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", i18n::tr(lang, "help")),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.panel));

    frame.render_widget(Paragraph::new(help_lines(state, &theme)).block(block), popup);
}

fn help_lines(state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    let lang = state.lang;
    let mut lines = vec![Line::from(tabs::tab_shortcuts(lang, theme))];
    lines.push(hint_line(
        &[
            ("l", i18n::tr(lang, "languageToggle")),
            ("r", i18n::tr(lang, "refresh")),
            ("?", i18n::tr(lang, "help")),
            ("q", i18n::tr(lang, "quit")),
        ],
        theme,
    ));
    lines.push(Line::from(""));

    match state.section {
        Section::Dashboard => {
            lines.push(section_title(i18n::tr(lang, "overview"), theme));
            lines.push(hint_line(
                &[
                    ("s", i18n::tr(lang, "newExpense")),
                    ("Ctrl+S", i18n::tr(lang, "processSMS")),
                    ("Esc", i18n::tr(lang, "cancel")),
                ],
                theme,
            ));
        }
        Section::Invoices => {
            lines.push(section_title(i18n::tr(lang, "recentActivity"), theme));
            lines.push(hint_line(
                &[
                    ("j/k", i18n::tr(lang, "nav")),
                    ("e", i18n::tr(lang, "edit")),
                    ("d", i18n::tr(lang, "delete")),
                ],
                theme,
            ));
            lines.push(hint_line(
                &[
                    ("Tab", i18n::tr(lang, "nextField")),
                    ("Enter", i18n::tr(lang, "update")),
                    ("Esc", i18n::tr(lang, "cancel")),
                ],
                theme,
            ));
        }
        Section::Rules => {
            lines.push(section_title(i18n::tr(lang, "rulesTitle"), theme));
            lines.push(hint_line(
                &[
                    ("n", i18n::tr(lang, "addRule")),
                    ("e", i18n::tr(lang, "edit")),
                    ("d", i18n::tr(lang, "delete")),
                ],
                theme,
            ));
            lines.push(hint_line(
                &[
                    ("Tab", i18n::tr(lang, "nextField")),
                    ("Ctrl+S", i18n::tr(lang, "saveRule")),
                    ("Esc", i18n::tr(lang, "cancel")),
                ],
                theme,
            ));
            lines.push(Line::from(Span::styled(
                i18n::tr(lang, "merchantHint"),
                Style::default().fg(theme.dim),
            )));
        }
        Section::Cycles => {
            lines.push(section_title(i18n::tr(lang, "cycleTitle"), theme));
            lines.push(hint_line(
                &[
                    ("n", i18n::tr(lang, "startCycle")),
                    ("Enter", i18n::tr(lang, "analysis")),
                    ("Esc", i18n::tr(lang, "close")),
                ],
                theme,
            ));
        }
    }

    lines.push(Line::from(""));
    lines.push(hint_line(&[("Esc", i18n::tr(lang, "close"))], theme));
    lines
}

fn section_title(title: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(theme.text_muted),
    ))
}

fn hint_line(pairs: &[(&'static str, &'static str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, label)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {label}")));
    }
    Line::from(spans)
}
