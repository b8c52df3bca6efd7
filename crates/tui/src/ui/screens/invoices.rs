use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::invoice::Invoice;

use crate::{
    app::{AppState, InvoiceField, InvoiceForm},
    budget,
    i18n::{self, Lang},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let (form_area, list_area) = if state.invoices.form.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    } else {
        (None, area)
    };

    if let (Some(form_area), Some(form)) = (form_area, state.invoices.form.as_ref()) {
        render_form(frame, form_area, state.lang, form, &theme);
    }
    render_list(frame, list_area, state, &theme);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let list_block = Block::default()
        .title(i18n::tr(lang, "recentActivity"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.invoices.items.is_empty() {
        let lines = if state.invoices.loading {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loading"),
                Style::default().fg(theme.dim),
            ))]
        } else if state.invoices.failed {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loadFailed"),
                Style::default().fg(theme.error),
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
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(list_block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .invoices
        .items
        .iter()
        .map(|invoice| ListItem::new(invoice_row(lang, invoice, theme)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.invoices.selected));

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

fn invoice_row(lang: Lang, invoice: &Invoice, theme: &Theme) -> Line<'static> {
    let date = invoice.created_at.format("%d %b %H:%M").to_string();
    let mut spans = vec![
        Span::styled(format!("{date:<13}"), Style::default().fg(theme.dim)),
        extraction_chip(invoice, theme),
        Span::raw(" "),
    ];

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
        match invoice.main_category.as_ref() {
            Some(category) => {
                spans.push(Span::raw("  "));
                let label = match invoice.sub_category.as_deref() {
                    Some(sub) if !sub.is_empty() => format!("#{category}/{sub}"),
                    _ => format!("#{category}"),
                };
                spans.push(Span::styled(label, Style::default().fg(theme.accent)));
            }
            None => {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    i18n::tr(lang, "uncategorized"),
                    Style::default().fg(theme.dim),
                ));
            }
        }
    } else {
        let mut snippet: String = invoice.raw_invoice.chars().take(60).collect();
        if invoice.raw_invoice.chars().count() > 60 {
            snippet.push('…');
        }
        spans.push(Span::styled(snippet, Style::default().fg(theme.dim)));
    }

    Line::from(spans)
}

fn extraction_chip(invoice: &Invoice, theme: &Theme) -> Span<'static> {
    let (label, color) = if invoice.extraction_succeeded() {
        ("OK", theme.positive)
    } else {
        ("RAW", theme.warning)
    };
    Span::styled(
        format!("[{label}]"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_form(frame: &mut Frame<'_>, area: Rect, lang: Lang, form: &InvoiceForm, theme: &Theme) {
    let mut lines = vec![
        render_field(
            i18n::tr(lang, "classificationLabel"),
            &form.classification,
            i18n::tr(lang, "classificationPlaceholder"),
            form.focus == InvoiceField::Classification,
            theme,
        ),
        render_field(
            i18n::tr(lang, "categoryLabel"),
            &form.main_category,
            i18n::tr(lang, "categoryPlaceholder"),
            form.focus == InvoiceField::MainCategory,
            theme,
        ),
        render_field(
            i18n::tr(lang, "subCategoryLabel"),
            &form.sub_category,
            i18n::tr(lang, "subCategoryPlaceholder"),
            form.focus == InvoiceField::SubCategory,
            theme,
        ),
    ];

    if form.saving {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, "loading"),
            Style::default().fg(theme.dim),
        )));
    } else {
        let mut hint = format!(
            "Enter: {} • Tab: {} • Esc: {}",
            i18n::tr(lang, "update"),
            i18n::tr(lang, "nextField"),
            i18n::tr(lang, "cancel")
        );
        if form.focus == InvoiceField::MainCategory {
            hint.push_str(&format!(" • ↑/↓: {}", i18n::tr(lang, "selectCategory")));
        }
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.dim),
        )));
    }

    if let Some(key) = form.error {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, key),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title(i18n::tr(lang, "editInvoice"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_field(
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let value_span = if value.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(theme.dim))
    } else if focused {
        Span::styled(
            value.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(value.to_string(), Style::default().fg(theme.text))
    };
    Line::from(vec![
        Span::styled(format!("{label:<18}"), label_style),
        Span::raw(" "),
        value_span,
    ])
}
