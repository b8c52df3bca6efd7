pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::{
    app::{AppState, RuleField, Section},
    i18n::{self, Lang},
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, state.lang, &theme);

    match state.section {
        Section::Dashboard => screens::dashboard::render(frame, layout[2], state),
        Section::Invoices => screens::invoices::render(frame, layout[2], state),
        Section::Rules => screens::rules::render(frame, layout[2], state),
        Section::Cycles => screens::cycles::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::confirm::render(frame, area, state.lang, state.confirm.as_ref());
    components::help::render(frame, area, state);
    components::toast::render(frame, area, state.lang, state.toast.as_ref());
}

/// Paragraph alignment for the active language; Arabic reads right to left.
pub fn text_align(lang: Lang) -> Alignment {
    if lang.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let failed = state.overview.failed
        || state.invoices.failed
        || state.rules.failed
        || state.cycles.failed;
    let status = if failed { "ERR" } else { "OK" };
    let status_style = if failed {
        Style::default().fg(theme.error)
    } else {
        Style::default().fg(theme.positive)
    };

    let line = Line::from(vec![
        Span::styled(
            i18n::tr(state.lang, "appTitle"),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;

    // Global shortcuts (always shown, compact)
    let mut parts = components::tabs::tab_shortcuts(lang, theme);

    // Context-specific hints based on section and mode
    let context_hints = get_context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("l", Style::default().fg(theme.accent)));
    parts.push(Span::raw(format!(" {}  ", i18n::tr(lang, "languageToggle"))));
    parts.push(Span::styled("r", Style::default().fg(theme.accent)));
    parts.push(Span::raw(format!(" {}  ", i18n::tr(lang, "refresh"))));
    parts.push(Span::styled("?", Style::default().fg(theme.accent)));
    parts.push(Span::raw(format!(" {}  ", i18n::tr(lang, "help"))));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(format!(" {}", i18n::tr(lang, "quit"))));

    let bar = Paragraph::new(Line::from(parts));
    frame.render_widget(bar, area);
}

/// Returns context-specific keyboard hints based on current section and mode.
fn get_context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let lang = state.lang;
    match state.section {
        Section::Dashboard => {
            if state.composer.focused {
                hint_spans(
                    &[
                        ("Ctrl+S", i18n::tr(lang, "processSMS")),
                        ("Esc", i18n::tr(lang, "cancel")),
                    ],
                    theme,
                )
            } else {
                hint_spans(&[("s", i18n::tr(lang, "newExpense"))], theme)
            }
        }
        Section::Invoices => {
            if state.invoices.form.is_some() {
                hint_spans(
                    &[
                        ("Tab", i18n::tr(lang, "nextField")),
                        ("Enter", i18n::tr(lang, "update")),
                        ("Esc", i18n::tr(lang, "cancel")),
                    ],
                    theme,
                )
            } else {
                hint_spans(
                    &[
                        ("e", i18n::tr(lang, "edit")),
                        ("d", i18n::tr(lang, "delete")),
                    ],
                    theme,
                )
            }
        }
        Section::Rules => match state.rules.form.as_ref() {
            Some(form) if form.focus == RuleField::Keywords => hint_spans(
                &[
                    ("Tab", i18n::tr(lang, "nextField")),
                    ("Ctrl+S", i18n::tr(lang, "saveRule")),
                    ("Esc", i18n::tr(lang, "cancel")),
                ],
                theme,
            ),
            Some(_) => hint_spans(
                &[
                    ("Tab", i18n::tr(lang, "nextField")),
                    ("Enter", i18n::tr(lang, "saveRule")),
                    ("Esc", i18n::tr(lang, "cancel")),
                ],
                theme,
            ),
            None => hint_spans(
                &[
                    ("n", i18n::tr(lang, "addRule")),
                    ("e", i18n::tr(lang, "edit")),
                    ("d", i18n::tr(lang, "delete")),
                ],
                theme,
            ),
        },
        Section::Cycles => {
            if state.cycles.start.is_some() {
                hint_spans(
                    &[
                        ("Enter", i18n::tr(lang, "start")),
                        ("Esc", i18n::tr(lang, "cancel")),
                    ],
                    theme,
                )
            } else if state.cycles.analysis.is_some() {
                hint_spans(&[("Esc", i18n::tr(lang, "close"))], theme)
            } else {
                hint_spans(
                    &[
                        ("n", i18n::tr(lang, "startCycle")),
                        ("Enter", i18n::tr(lang, "analysis")),
                    ],
                    theme,
                )
            }
        }
    }
}

fn hint_spans(pairs: &[(&'static str, &'static str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, label)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {label}")));
    }
    spans
}
