use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::rule::Rule;

use crate::{
    app::{AppState, RuleField, RuleForm},
    budget,
    i18n::{self, Lang},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let (form_area, list_area) = if state.rules.form.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    } else {
        (None, area)
    };

    if let (Some(form_area), Some(form)) = (form_area, state.rules.form.as_ref()) {
        render_form(frame, form_area, state.lang, form, &theme);
    }
    render_list(frame, list_area, state, &theme);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lang = state.lang;
    let list_block = Block::default()
        .title(i18n::tr(lang, "rulesTitle"))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    if state.rules.items.is_empty() {
        let lines = if state.rules.loading {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loading"),
                Style::default().fg(theme.dim),
            ))]
        } else if state.rules.failed {
            vec![Line::from(Span::styled(
                i18n::tr(lang, "loadFailed"),
                Style::default().fg(theme.error),
            ))]
        } else {
            vec![Line::from(vec![
                Span::styled(
                    format!("{} ", i18n::tr(lang, "noRules")),
                    Style::default().fg(theme.text),
                ),
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::styled(
                    format!(" {}", i18n::tr(lang, "addRule")),
                    Style::default().fg(theme.dim),
                ),
            ])]
        };
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(list_block),
            area,
        );
        return;
    }

    let inner = list_block.inner(area);
    frame.render_widget(list_block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    // Two leading spaces line the header up with the highlight symbol.
    let header = Line::from(Span::styled(
        format!(
            "  {:<30}{:<24}{}",
            i18n::tr(lang, "colPattern"),
            i18n::tr(lang, "colCategory"),
            i18n::tr(lang, "colLimit"),
        ),
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(header), layout[0]);

    let items: Vec<ListItem> = state
        .rules
        .items
        .iter()
        .map(|rule| ListItem::new(rule_row(lang, rule, theme)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.rules.selected));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, layout[1], &mut list_state);
}

fn rule_row(lang: Lang, rule: &Rule, theme: &Theme) -> Line<'static> {
    let mut pattern: String = rule.merchant_keywords.chars().take(28).collect();
    if rule.merchant_keywords.chars().count() > 28 {
        pattern.push('…');
    }

    let category = match rule.sub_category.as_deref() {
        Some(sub) if !sub.is_empty() => format!("{}/{sub}", rule.main_category),
        _ => rule.main_category.clone(),
    };
    let limit = match rule.category_limit {
        Some(limit) => budget::format_sar(limit),
        None => i18n::tr(lang, "limitPlaceholder").to_string(),
    };
    let limit_style = if rule.category_limit.is_some() {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.dim)
    };

    Line::from(vec![
        Span::styled(format!("{pattern:<30}"), Style::default().fg(theme.text)),
        Span::styled(format!("{category:<24}"), Style::default().fg(theme.accent)),
        Span::styled(limit, limit_style),
    ])
}

fn render_form(frame: &mut Frame<'_>, area: Rect, lang: Lang, form: &RuleForm, theme: &Theme) {
    let keywords_focused = form.focus == RuleField::Keywords;
    let mut lines = vec![
        keyword_line(lang, form, keywords_focused, theme),
        render_field(
            i18n::tr(lang, "classificationLabel"),
            &form.classification,
            i18n::tr(lang, "classificationPlaceholder"),
            form.focus == RuleField::Classification,
            theme,
        ),
        render_field(
            i18n::tr(lang, "categoryLabel"),
            &form.main_category,
            i18n::tr(lang, "categoryPlaceholder"),
            form.focus == RuleField::MainCategory,
            theme,
        ),
        render_field(
            i18n::tr(lang, "subCategoryLabel"),
            &form.sub_category,
            i18n::tr(lang, "subCategoryPlaceholder"),
            form.focus == RuleField::SubCategory,
            theme,
        ),
        render_field(
            i18n::tr(lang, "limitLabel"),
            &form.limit,
            i18n::tr(lang, "limitPlaceholder"),
            form.focus == RuleField::Limit,
            theme,
        ),
    ];

    if form.saving {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, "loading"),
            Style::default().fg(theme.dim),
        )));
    } else if keywords_focused {
        lines.push(Line::from(Span::styled(
            i18n::tr(lang, "merchantHint"),
            Style::default().fg(theme.dim),
        )));
    } else {
        let mut hint = format!(
            "Ctrl+S: {} • Tab: {} • Esc: {}",
            i18n::tr(lang, "saveRule"),
            i18n::tr(lang, "nextField"),
            i18n::tr(lang, "cancel")
        );
        if form.focus == RuleField::MainCategory {
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

    let title = if form.editing.is_some() {
        i18n::tr(lang, "editRule")
    } else {
        i18n::tr(lang, "addRule")
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn keyword_line(lang: Lang, form: &RuleForm, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let mut spans = vec![
        Span::styled(
            format!("{:<18}", i18n::tr(lang, "merchantLabel")),
            label_style,
        ),
        Span::raw(" "),
    ];

    for (index, keyword) in form.keywords.keywords.iter().enumerate() {
        let chip_style = if focused && form.keywords.selected == Some(index) {
            Style::default().fg(theme.background).bg(theme.accent)
        } else {
            Style::default().fg(theme.accent)
        };
        spans.push(Span::styled(format!("[{keyword}]"), chip_style));
        spans.push(Span::raw(" "));
    }

    if form.keywords.is_empty() && !focused {
        spans.push(Span::styled(
            i18n::tr(lang, "merchantPlaceholder"),
            Style::default().fg(theme.dim),
        ));
    } else {
        let cursor = if focused { "│" } else { "" };
        spans.push(Span::styled(
            format!("{}{cursor}", form.keywords.pending),
            Style::default().fg(theme.text),
        ));
    }

    Line::from(spans)
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
