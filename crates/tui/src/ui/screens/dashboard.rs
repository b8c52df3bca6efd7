use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use api_types::invoice::Invoice;

use crate::{
    app::{AppState, CategoryOverview, ComposerOutcome},
    budget,
    i18n::{self, Lang},
    ui::{
        components::{card::Card, progress},
        text_align,
        theme::Theme,
    },
};

const RECENT_LIMIT: usize = 5;
const CARDS_PER_ROW: usize = 4;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let card_rows: u16 = if state.overview.cards.len() > CARDS_PER_ROW {
        2
    } else {
        1
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                  // Cycle banner
            Constraint::Length(6 * card_rows),      // Category cards
            Constraint::Min(6),                     // Composer and recent invoices
        ])
        .split(area);

    render_cycle_banner(frame, layout[0], state, &theme);
    render_category_cards(frame, layout[1], state, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[2]);
    render_composer(frame, columns[0], state, &theme);
    render_recent(frame, columns[1], state, &theme);
}

fn render_cycle_banner(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let line = match state.cycles.current.as_ref() {
        Some(cycle) => Line::from(vec![
            Span::styled(
                i18n::tr(lang, "cycleTitle"),
                Style::default().fg(theme.accent),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} {}",
                    i18n::tr(lang, "startedOn"),
                    cycle.start_date.format("%d %b %Y")
                ),
                Style::default().fg(theme.text),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", cycle.days_elapsed, i18n::tr(lang, "daysElapsed")),
                Style::default().fg(theme.text_muted),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", cycle.days_remaining, i18n::tr(lang, "daysRemaining")),
                if cycle.days_remaining <= 5 {
                    Style::default().fg(theme.warning)
                } else {
                    Style::default().fg(theme.text_muted)
                },
            ),
        ]),
        None => Line::from(vec![
            Span::styled(i18n::tr(lang, "noCycle"), Style::default().fg(theme.dim)),
            Span::raw("  "),
            Span::styled("4", Style::default().fg(theme.accent)),
            Span::styled(
                format!(" {}", i18n::tr(lang, "startCycle")),
                Style::default().fg(theme.dim),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_category_cards(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let cards = &state.overview.cards;

    if cards.is_empty() {
        let lines = if state.overview.loading {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loading"),
                Style::default().fg(theme.dim),
            ))]
        } else if state.overview.failed {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loadFailed"),
                Style::default().fg(theme.error),
            ))]
        } else {
            vec![
                Line::from(Span::styled(
                    i18n::tr(lang, "setupBudget"),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    i18n::tr(lang, "setupBudgetDesc"),
                    Style::default().fg(theme.dim),
                )),
            ]
        };
        let card = Card::new(i18n::tr(lang, "overview"), theme);
        let inner = card.inner(area);
        card.render_frame(frame, area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            cards
                .chunks(CARDS_PER_ROW)
                .take(2)
                .map(|_| Constraint::Length(6))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (chunk, row) in cards.chunks(CARDS_PER_ROW).take(2).zip(rows.iter()) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, chunk.len() as u32);
                chunk.len()
            ])
            .split(*row);
        for (card, column) in chunk.iter().zip(columns.iter()) {
            render_category_card(frame, *column, lang, card, theme);
        }
    }
}

fn render_category_card(
    frame: &mut Frame<'_>,
    area: Rect,
    lang: Lang,
    overview: &CategoryOverview,
    theme: &Theme,
) {
    let card = Card::new(&overview.name, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let lines = match overview.snapshot.as_ref() {
        Some(snapshot) => {
            let percent = budget::percent_used(snapshot.total_spent, snapshot.category_limit);
            let over = budget::is_over_budget(snapshot.total_spent, snapshot.category_limit);
            let bar_width = (inner.width as usize).saturating_sub(6).clamp(4, 20);

            let spent_style = if over {
                Style::default().fg(theme.negative)
            } else {
                Style::default().fg(theme.text)
            };
            let remaining_style = if snapshot.remaining_limit < 0.0 {
                Style::default().fg(theme.negative)
            } else {
                Style::default().fg(theme.text_muted)
            };

            vec![
                Line::from(Span::styled(
                    progress::budget_bar(percent, bar_width),
                    Style::default().fg(progress::percent_color(percent, theme)),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", i18n::tr(lang, "spent")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::styled(budget::format_sar(snapshot.total_spent), spent_style),
                ]),
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", i18n::tr(lang, "limit")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::raw(budget::format_sar(snapshot.category_limit)),
                ]),
                Line::from(vec![
                    Span::styled(
                        budget::format_sar(snapshot.remaining_limit),
                        remaining_style,
                    ),
                    Span::styled(
                        format!(" {}", i18n::tr(lang, "left")),
                        Style::default().fg(theme.dim),
                    ),
                ]),
            ]
        }
        None => match overview.analysis.as_ref() {
            Some(analysis) => vec![
                Line::from(Span::styled(
                    i18n::tr(lang, "noLimit"),
                    Style::default().fg(theme.dim),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", i18n::tr(lang, "spent")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::raw(budget::format_sar(analysis.total_spent)),
                ]),
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", i18n::tr(lang, "transactions")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::raw(analysis.invoice_count.to_string()),
                ]),
            ],
            None => vec![Line::from(Span::styled(
                i18n::tr(lang, "noLimit"),
                Style::default().fg(theme.dim),
            ))],
        },
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_composer(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let composer = &state.composer;
    let card = Card::new(i18n::tr(lang, "newExpense"), theme).focused(composer.focused);
    let inner = card.inner(rows[0]);
    card.render_frame(frame, rows[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if composer.buffer.is_empty() && !composer.focused {
        frame.render_widget(
            Paragraph::new(Span::styled(
                i18n::tr(lang, "pasteSMS"),
                Style::default().fg(theme.dim),
            ))
            .alignment(text_align(lang))
            .wrap(Wrap { trim: false }),
            body[0],
        );
    } else {
        let cursor = if composer.focused { "│" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{cursor}", composer.buffer))
                .style(Style::default().fg(theme.text))
                .wrap(Wrap { trim: false }),
            body[0],
        );
    }

    let status = if composer.sending {
        Line::from(Span::styled(
            i18n::tr(lang, "loading"),
            Style::default().fg(theme.dim),
        ))
    } else {
        match composer.outcome {
            Some(ComposerOutcome::Success) => Line::from(Span::styled(
                i18n::tr(lang, "success"),
                Style::default().fg(theme.positive),
            )),
            Some(ComposerOutcome::Error) => Line::from(Span::styled(
                i18n::tr(lang, "error"),
                Style::default().fg(theme.error),
            )),
            None if composer.focused => Line::from(vec![
                Span::styled("Ctrl+S", Style::default().fg(theme.accent)),
                Span::raw(format!(" {}   ", i18n::tr(lang, "processSMS"))),
                Span::styled("Esc", Style::default().fg(theme.accent)),
                Span::raw(format!(" {}", i18n::tr(lang, "cancel"))),
            ]),
            None => Line::from(vec![
                Span::styled("s", Style::default().fg(theme.accent)),
                Span::styled(
                    format!(" {}", i18n::tr(lang, "newExpense")),
                    Style::default().fg(theme.dim),
                ),
            ]),
        }
    };
    frame.render_widget(Paragraph::new(status), body[1]);

    let tip = Card::new(i18n::tr(lang, "proTip"), theme);
    let tip_inner = tip.inner(rows[1]);
    tip.render_frame(frame, rows[1]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            i18n::tr(lang, "proTipDesc"),
            Style::default().fg(theme.dim),
        ))
        .alignment(text_align(lang))
        .wrap(Wrap { trim: true }),
        tip_inner,
    );
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let card = Card::new(i18n::tr(lang, "recentActivity"), theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    if state.invoices.items.is_empty() {
        let lines = if state.invoices.loading {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loading"),
                Style::default().fg(theme.dim),
            ))]
        } else {
            vec![
                Line::from(Span::styled(
                    i18n::tr(lang, "noExpenses"),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    i18n::tr(lang, "startPrompt"),
                    Style::default().fg(theme.dim),
                )),
            ]
        };
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .invoices
        .items
        .iter()
        .take(RECENT_LIMIT)
        .map(|invoice| ListItem::new(recent_row(lang, invoice, theme)))
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn recent_row(lang: Lang, invoice: &Invoice, theme: &Theme) -> Line<'static> {
    let date = invoice.created_at.format("%d %b").to_string();
    let mut spans = vec![Span::styled(
        format!("{date:<7}"),
        Style::default().fg(theme.dim),
    )];

    if invoice.extraction_succeeded() {
        let merchant = invoice
            .merchant
            .clone()
            .unwrap_or_else(|| i18n::tr(lang, "unknownMerchant").to_string());
        let amount = invoice
            .amount
            .map(budget::format_sar)
            .unwrap_or_else(|| "--".to_string());
        spans.push(Span::styled(merchant, Style::default().fg(theme.text)));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(amount, Style::default().fg(theme.negative)));
        if let Some(category) = invoice.main_category.as_ref() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("#{category}"),
                Style::default().fg(theme.accent),
            ));
        }
    } else {
        let mut snippet: String = invoice.raw_invoice.chars().take(40).collect();
        if invoice.raw_invoice.chars().count() > 40 {
            snippet.push('…');
        }
        spans.push(Span::styled(snippet, Style::default().fg(theme.dim)));
    }

    Line::from(spans)
}
