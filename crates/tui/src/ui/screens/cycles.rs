use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use api_types::cycle::{CycleAnalysis, CycleSummary};

use crate::{
    app::{AnalysisView, AppState, StartDialog},
    budget,
    i18n::{self, Lang},
    ui::{
        components::{card::{Card, StatCard}, progress},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    if let Some(view) = state.cycles.analysis.as_ref() {
        render_analysis(frame, area, state.lang, view, &theme);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_current(frame, layout[0], state, &theme);
    render_history(frame, layout[1], state, &theme);

    if let Some(dialog) = state.cycles.start.as_ref() {
        render_start_dialog(frame, area, state.lang, dialog, &theme);
    }
}

fn render_current(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let card = Card::new(i18n::tr(lang, "cycleTitle"), theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let lines = match state.cycles.current.as_ref() {
        Some(cycle) => vec![
            Line::from(vec![
                Span::styled(
                    format!("{}: ", i18n::tr(lang, "startedOn")),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    cycle.start_date.format("%d %b %Y").to_string(),
                    Style::default().fg(theme.text),
                ),
            ]),
            Line::from(vec![
                Span::styled(
                    format!("{} ", cycle.days_elapsed),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    i18n::tr(lang, "daysElapsed"),
                    Style::default().fg(theme.dim),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("{} ", cycle.days_remaining),
                    if cycle.days_remaining <= 5 {
                        Style::default()
                            .fg(theme.warning)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
                    },
                ),
                Span::styled(
                    i18n::tr(lang, "daysRemaining"),
                    Style::default().fg(theme.dim),
                ),
            ]),
        ],
        None => vec![
            Line::from(Span::styled(
                i18n::tr(lang, "noCycle"),
                Style::default().fg(theme.dim),
            )),
            Line::from(vec![
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::styled(
                    format!(" {}", i18n::tr(lang, "startCycle")),
                    Style::default().fg(theme.dim),
                ),
            ]),
        ],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_history(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let list_block = Block::default()
        .title(i18n::tr(lang, "history"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.cycles.history.is_empty() {
        let lines = if state.cycles.loading {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loading"),
                Style::default().fg(theme.dim),
            ))]
        } else if state.cycles.failed {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loadFailed"),
                Style::default().fg(theme.error),
            ))]
        } else {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "noData"),
                Style::default().fg(theme.dim),
            ))]
        };
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(list_block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .cycles
        .history
        .iter()
        .map(|cycle| ListItem::new(history_row(lang, cycle, theme)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.cycles.selected));

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn history_row(lang: Lang, cycle: &CycleSummary, theme: &Theme) -> Line<'static> {
    let start = cycle.start_date.format("%d %b %Y").to_string();
    let end = cycle
        .end_date
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "...".to_string());

    let chip = if cycle.is_active {
        status_chip(i18n::tr(lang, "active"), theme.positive)
    } else {
        status_chip(i18n::tr(lang, "closed"), theme.text_muted)
    };

    Line::from(vec![
        Span::styled(
            format!("{start} - {end}"),
            Style::default().fg(theme.text),
        ),
        Span::raw("  "),
        chip,
        Span::raw("  "),
        Span::styled(
            budget::format_sar(cycle.total_spent),
            Style::default().fg(theme.negative),
        ),
    ])
}

fn status_chip(label: &str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        format!("[{label}]"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_start_dialog(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    dialog: &StartDialog,
    theme: &Theme,
) {
    let width = 46u16.min(area.width);
    let height = 7u16.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect { x, y, width, height };

    frame.render_widget(Clear, rect);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:<12}", i18n::tr(lang, "selectDate")),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{}│", dialog.date),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ])];

    if dialog.date.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "{}: {}",
                i18n::tr(lang, "startNow"),
                Local::now().date_naive().format("%Y-%m-%d")
            ),
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, "customDate"),
            Style::default().fg(theme.dim),
        )));
    }

    if dialog.saving {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, "loading"),
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!(
                "Enter: {} • Esc: {}",
                i18n::tr(lang, "start"),
                i18n::tr(lang, "cancel")
            ),
            Style::default().fg(theme.dim),
        )));
    }

    if let Some(key) = dialog.error {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, key),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", i18n::tr(lang, "newCycle")),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.panel));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_analysis(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    view: &AnalysisView,
    theme: &Theme,
) {
    let outer = Block::default()
        .title(format!(" {} #{} ", i18n::tr(lang, "analysisTitle"), view.cycle_id))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let Some(report) = view.report.as_ref() else {
        let message = if view.failed {
            Span::styled(i18n::tr(lang, "loadFailed"), Style::default().fg(theme.error))
        } else {
            Span::styled(
                i18n::tr(lang, "loadingAnalysis"),
                Style::default().fg(theme.dim),
            )
        };
        frame.render_widget(
            Paragraph::new(Line::from(message)).alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Date range
            Constraint::Length(5), // Stat cards
            Constraint::Length(3), // Budget bar
            Constraint::Min(0),    // Breakdown and merchants
        ])
        .split(inner);

    let range_end = report
        .end_date
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|| i18n::tr(lang, "active").to_string());
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{} - {range_end}", report.start_date.format("%d %b %Y")),
            Style::default().fg(theme.text_muted),
        )),
        layout[0],
    );

    render_stat_cards(frame, layout[1], lang, report, theme);
    render_budget_bar(frame, layout[2], lang, report, theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[3]);
    render_breakdown(frame, columns[0], lang, report, theme);
    render_merchants(frame, columns[1], lang, report, theme);
}

fn render_stat_cards(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    report: &CycleAnalysis,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    StatCard::new(
        i18n::tr(lang, "totalSpent"),
        budget::format_sar(report.total_spent),
        theme,
    )
    .render(frame, columns[0]);

    StatCard::new(
        i18n::tr(lang, "budget"),
        budget::format_sar(report.total_budget),
        theme,
    )
    .render(frame, columns[1]);

    let remaining_color = if report.remaining_budget < 0.0 {
        theme.negative
    } else {
        theme.positive
    };
    StatCard::new(
        i18n::tr(lang, "remaining"),
        budget::format_sar(report.remaining_budget),
        theme,
    )
    .value_color(remaining_color)
    .render(frame, columns[2]);

    StatCard::new(
        i18n::tr(lang, "transactions"),
        report.transaction_count.to_string(),
        theme,
    )
    .subtitle(format!(
        "{}: {}",
        i18n::tr(lang, "avgTransaction"),
        budget::format_sar(report.average_transaction)
    ))
    .render(frame, columns[3]);
}

fn render_budget_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    report: &CycleAnalysis,
    theme: &Theme,
) {
    let block = Block::default()
        .title(i18n::tr(lang, "budgetUsed"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let percent = report.budget_percentage_used;
    let bar_width = (inner.width as usize).saturating_sub(6).max(4);
    frame.render_widget(
        Paragraph::new(Span::styled(
            progress::budget_bar(percent, bar_width),
            Style::default().fg(progress::percent_color(percent, theme)),
        )),
        inner,
    );
}

fn render_breakdown(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    report: &CycleAnalysis,
    theme: &Theme,
) {
    let block = Block::default()
        .title(i18n::tr(lang, "categoryBreakdown"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if report.category_breakdown.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                i18n::tr(lang, "noData"),
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center)
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = report
        .category_breakdown
        .iter()
        .map(|entry| {
            let (name, name_style) = match entry.category.as_deref() {
                Some(category) => (category.to_string(), Style::default().fg(theme.text)),
                None => (
                    i18n::tr(lang, "uncategorized").to_string(),
                    Style::default().fg(theme.dim),
                ),
            };

            let mut spans = vec![
                Span::styled(format!("{name:<20}"), name_style),
                Span::styled(
                    format!("{:>12}", budget::format_sar(entry.spent)),
                    Style::default().fg(theme.text),
                ),
                Span::raw("  "),
            ];

            match entry.percentage_of_limit {
                Some(percent) => {
                    spans.push(Span::styled(
                        progress::budget_bar(percent, 10),
                        Style::default().fg(progress::percent_color(percent, theme)),
                    ));
                    spans.push(Span::styled(
                        format!(" {}", i18n::tr(lang, "ofLimit")),
                        Style::default().fg(theme.dim),
                    ));
                }
                None => {
                    spans.push(Span::styled(
                        format!(
                            "{:.0}% {}",
                            entry.percentage_of_total,
                            i18n::tr(lang, "ofTotal")
                        ),
                        Style::default().fg(theme.dim),
                    ));
                }
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_merchants(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    report: &CycleAnalysis,
    theme: &Theme,
) {
    let block = Block::default()
        .title(i18n::tr(lang, "topMerchants"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if report.top_merchants.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                i18n::tr(lang, "noData"),
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center)
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = report
        .top_merchants
        .iter()
        .enumerate()
        .map(|(i, merchant)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(theme.dim)),
                Span::styled(
                    format!("{:<20}", merchant.merchant),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    budget::format_sar(merchant.spent),
                    Style::default().fg(theme.negative),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
