use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    i18n::{self, Lang},
    keywords::KeywordField,
    local_state::LocalState,
    ui::{self, keymap::AppAction},
};

use api_types::{
    category::{CategoryAnalysis, CategoryLimit, CategorySnapshot},
    cycle::{ActiveCycle, CurrentCycle, CycleAnalysis, CycleSummary},
    invoice::{Invoice, InvoiceUpdate},
    rule::{Rule, RuleNew},
    sms::SmsResponse,
};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Invoices,
    Rules,
    Cycles,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Invoices,
        Section::Rules,
        Section::Cycles,
    ];

    pub fn label(self, lang: Lang) -> &'static str {
        match self {
            Self::Dashboard => i18n::tr(lang, "overview"),
            Self::Invoices => i18n::tr(lang, "recentActivity"),
            Self::Rules => i18n::tr(lang, "manageRules"),
            Self::Cycles => i18n::tr(lang, "cycleTitle"),
        }
    }
}

/// Monotonic token for in-flight fetches. A response only lands if its token
/// still matches the latest issued one, so a refresh racing a slow request
/// can never clobber newer data with older data.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
    fn bump(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    fn is_current(&self, token: u64) -> bool {
        self.0 == token
    }
}

/// Per-category dashboard card data. Categories with a configured limit
/// carry a budget snapshot; the rest fall back to plain spend stats.
#[derive(Debug, Clone)]
pub struct CategoryOverview {
    pub name: String,
    pub snapshot: Option<CategorySnapshot>,
    pub analysis: Option<CategoryAnalysis>,
}

#[derive(Debug, Clone)]
pub struct CyclesData {
    pub current: Option<ActiveCycle>,
    pub history: Vec<CycleSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    RuleSave,
    RuleDelete,
    InvoiceSave,
    InvoiceDelete,
    CycleStart,
}

#[derive(Debug)]
pub enum AppEvent {
    Overview {
        token: u64,
        result: std::result::Result<Vec<CategoryOverview>, ClientError>,
    },
    Invoices {
        token: u64,
        result: std::result::Result<Vec<Invoice>, ClientError>,
    },
    Rules {
        token: u64,
        result: std::result::Result<Vec<Rule>, ClientError>,
    },
    Cycles {
        token: u64,
        result: std::result::Result<CyclesData, ClientError>,
    },
    CycleAnalysis {
        token: u64,
        result: std::result::Result<CycleAnalysis, ClientError>,
    },
    SmsProcessed {
        result: std::result::Result<SmsResponse, ClientError>,
    },
    MutationDone {
        kind: MutationKind,
        result: std::result::Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message_key: &'static str,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteInvoice(i64),
    DeleteRule(i64),
}

#[derive(Debug)]
pub struct ConfirmState {
    pub message_key: &'static str,
    pub action: PendingAction,
}

#[derive(Debug, Default)]
pub struct OverviewState {
    pub cards: Vec<CategoryOverview>,
    pub loading: bool,
    pub failed: bool,
    pub generation: Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerOutcome {
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct ComposerState {
    pub buffer: String,
    pub focused: bool,
    pub sending: bool,
    pub outcome: Option<ComposerOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceField {
    Classification,
    MainCategory,
    SubCategory,
}

#[derive(Debug)]
pub struct InvoiceForm {
    pub invoice_id: i64,
    pub classification: String,
    pub main_category: String,
    pub sub_category: String,
    pub focus: InvoiceField,
    pub error: Option<&'static str>,
    pub saving: bool,
}

impl InvoiceForm {
    fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.id,
            classification: invoice.classification.clone().unwrap_or_default(),
            main_category: invoice.main_category.clone().unwrap_or_default(),
            sub_category: invoice.sub_category.clone().unwrap_or_default(),
            focus: InvoiceField::Classification,
            error: None,
            saving: false,
        }
    }

    fn next_focus(&mut self) {
        self.focus = match self.focus {
            InvoiceField::Classification => InvoiceField::MainCategory,
            InvoiceField::MainCategory => InvoiceField::SubCategory,
            InvoiceField::SubCategory => InvoiceField::Classification,
        };
    }

    fn text_field_mut(&mut self) -> &mut String {
        match self.focus {
            InvoiceField::Classification => &mut self.classification,
            InvoiceField::MainCategory => &mut self.main_category,
            InvoiceField::SubCategory => &mut self.sub_category,
        }
    }

    fn validate(&mut self) -> Option<InvoiceUpdate> {
        if self.main_category.trim().is_empty() {
            self.error = Some("categoryRequired");
            return None;
        }
        Some(InvoiceUpdate {
            classification: normalized_classification(&self.classification),
            main_category: self.main_category.trim().to_string(),
            sub_category: self.sub_category.trim().to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct InvoicesState {
    pub items: Vec<Invoice>,
    pub selected: usize,
    pub form: Option<InvoiceForm>,
    pub loading: bool,
    pub failed: bool,
    pub generation: Generation,
}

impl InvoicesState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len() - 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleField {
    #[default]
    Keywords,
    Classification,
    MainCategory,
    SubCategory,
    Limit,
}

#[derive(Debug, Default)]
pub struct RuleForm {
    pub editing: Option<i64>,
    pub keywords: KeywordField,
    pub classification: String,
    pub main_category: String,
    pub sub_category: String,
    pub limit: String,
    pub focus: RuleField,
    pub error: Option<&'static str>,
    pub saving: bool,
}

impl RuleForm {
    fn from_rule(rule: &Rule) -> Self {
        Self {
            editing: Some(rule.id),
            keywords: KeywordField::from_wire(&rule.merchant_keywords),
            classification: rule.classification.clone(),
            main_category: rule.main_category.clone(),
            sub_category: rule.sub_category.clone().unwrap_or_default(),
            limit: rule
                .category_limit
                .map(|limit| limit.to_string())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    fn next_focus(&mut self) {
        if self.focus == RuleField::Keywords {
            self.keywords.commit_pending();
        }
        self.focus = match self.focus {
            RuleField::Keywords => RuleField::Classification,
            RuleField::Classification => RuleField::MainCategory,
            RuleField::MainCategory => RuleField::SubCategory,
            RuleField::SubCategory => RuleField::Limit,
            RuleField::Limit => RuleField::Keywords,
        };
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            RuleField::Keywords => None,
            RuleField::Classification => Some(&mut self.classification),
            RuleField::MainCategory => Some(&mut self.main_category),
            RuleField::SubCategory => Some(&mut self.sub_category),
            RuleField::Limit => Some(&mut self.limit),
        }
    }

    fn validate(&mut self) -> Option<RuleNew> {
        self.keywords.commit_pending();
        if self.keywords.keywords.is_empty() {
            self.error = Some("merchantRequired");
            return None;
        }
        if self.main_category.trim().is_empty() {
            self.error = Some("categoryRequired");
            return None;
        }

        let raw_limit = self.limit.trim();
        let category_limit = if raw_limit.is_empty() {
            None
        } else {
            match raw_limit.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                _ => {
                    self.error = Some("invalidLimit");
                    return None;
                }
            }
        };

        Some(RuleNew {
            merchant_keywords: self.keywords.to_wire(),
            classification: normalized_classification(&self.classification),
            main_category: self.main_category.trim().to_string(),
            sub_category: self.sub_category.trim().to_string(),
            category_limit,
        })
    }
}

#[derive(Debug, Default)]
pub struct RulesState {
    pub items: Vec<Rule>,
    pub selected: usize,
    pub form: Option<RuleForm>,
    pub loading: bool,
    pub failed: bool,
    pub generation: Generation,
}

impl RulesState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len() - 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct StartDialog {
    pub date: String,
    pub error: Option<&'static str>,
    pub saving: bool,
}

#[derive(Debug)]
pub struct AnalysisView {
    pub cycle_id: i64,
    pub report: Option<CycleAnalysis>,
    pub loading: bool,
    pub failed: bool,
}

#[derive(Debug, Default)]
pub struct CyclesState {
    pub current: Option<ActiveCycle>,
    pub history: Vec<CycleSummary>,
    pub selected: usize,
    pub start: Option<StartDialog>,
    pub analysis: Option<AnalysisView>,
    pub loading: bool,
    pub failed: bool,
    pub generation: Generation,
    pub analysis_generation: Generation,
}

impl CyclesState {
    fn select_next(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.history.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.history.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.history.len() {
            self.selected = self.history.len() - 1;
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub lang: Lang,
    pub section: Section,
    pub overview: OverviewState,
    pub composer: ComposerState,
    pub invoices: InvoicesState,
    pub rules: RulesState,
    pub cycles: CyclesState,
    pub confirm: Option<ConfirmState>,
    pub toast: Option<ToastState>,
    pub help_open: bool,
    pub last_refresh: Option<DateTime<Local>>,
    pub base_url: String,
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    local: LocalState,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let local = LocalState::load(&config.state_path)?;

        let lang = config
            .language
            .as_deref()
            .and_then(Lang::from_code)
            .or_else(|| local.language.as_deref().and_then(Lang::from_code))
            .unwrap_or_else(Lang::from_env);

        let state = AppState {
            lang,
            section: Section::Dashboard,
            overview: OverviewState::default(),
            composer: ComposerState::default(),
            invoices: InvoicesState::default(),
            rules: RulesState::default(),
            cycles: CyclesState::default(),
            confirm: None,
            toast: None,
            help_open: false,
            last_refresh: None,
            base_url: config.base_url.clone(),
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            client,
            state,
            local,
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        self.refresh_all();

        while !self.should_quit {
            while let Ok(event) = self.events_rx.try_recv() {
                self.apply_event(event);
            }
            self.expire_toast();

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Paste(text) => self.handle_paste(&text),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = ui::keymap::map_key(key);

        if matches!(action, AppAction::Quit) {
            self.should_quit = true;
            return Ok(());
        }
        if self.state.help_open {
            self.state.help_open = false;
            return Ok(());
        }
        if self.state.confirm.is_some() {
            self.handle_confirm_key(action);
            return Ok(());
        }

        match self.state.section {
            Section::Dashboard => self.handle_dashboard_key(action),
            Section::Invoices => self.handle_invoices_key(action),
            Section::Rules => self.handle_rules_key(action),
            Section::Cycles => self.handle_cycles_key(action),
        }

        Ok(())
    }

    fn handle_global_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('?') => self.state.help_open = true,
            AppAction::Input('l' | 'L') => self.toggle_language(),
            AppAction::Input('r' | 'R') => self.refresh_all(),
            AppAction::Input('1') => self.state.section = Section::Dashboard,
            AppAction::Input('2') => self.state.section = Section::Invoices,
            AppAction::Input('3') => self.state.section = Section::Rules,
            AppAction::Input('4') => self.state.section = Section::Cycles,
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, action: AppAction) {
        match action {
            AppAction::Submit | AppAction::Input('y' | 'Y') => {
                if let Some(confirm) = self.state.confirm.take() {
                    match confirm.action {
                        PendingAction::DeleteInvoice(invoice_id) => {
                            self.submit_invoice_delete(invoice_id);
                        }
                        PendingAction::DeleteRule(rule_id) => {
                            self.submit_rule_delete(rule_id);
                        }
                    }
                }
            }
            AppAction::Cancel | AppAction::Input('n' | 'N') => {
                self.state.confirm = None;
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, action: AppAction) {
        if self.state.composer.focused {
            match action {
                AppAction::Cancel => self.state.composer.focused = false,
                AppAction::Send => self.submit_sms(),
                AppAction::Submit => self.state.composer.buffer.push('\n'),
                AppAction::Backspace => {
                    self.state.composer.buffer.pop();
                }
                AppAction::Input(ch) => self.state.composer.buffer.push(ch),
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Input('s' | 'S') => {
                self.state.composer.focused = true;
                self.state.composer.outcome = None;
            }
            other => self.handle_global_key(other),
        }
    }

    fn handle_invoices_key(&mut self, action: AppAction) {
        if self.state.invoices.form.is_some() {
            self.handle_invoice_form_key(action);
            return;
        }

        match action {
            AppAction::Up | AppAction::Input('k' | 'K') => self.state.invoices.select_prev(),
            AppAction::Down | AppAction::Input('j' | 'J') => self.state.invoices.select_next(),
            AppAction::Submit | AppAction::Input('e' | 'E') => self.open_invoice_form(),
            AppAction::Input('d' | 'D') => self.confirm_invoice_delete(),
            other => self.handle_global_key(other),
        }
    }

    fn handle_invoice_form_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.invoices.form = None;
                return;
            }
            AppAction::Submit | AppAction::Send => {
                self.submit_invoice_update();
                return;
            }
            _ => {}
        }

        let names = self.category_names();
        let Some(form) = self.state.invoices.form.as_mut() else {
            return;
        };
        match action {
            AppAction::NextField => form.next_focus(),
            AppAction::Up => {
                if form.focus == InvoiceField::MainCategory {
                    if let Some(name) = next_category(&names, &form.main_category, -1) {
                        form.main_category = name;
                    }
                }
            }
            AppAction::Down => {
                if form.focus == InvoiceField::MainCategory {
                    if let Some(name) = next_category(&names, &form.main_category, 1) {
                        form.main_category = name;
                    }
                }
            }
            AppAction::Backspace => {
                form.error = None;
                form.text_field_mut().pop();
            }
            AppAction::Input(ch) => {
                form.error = None;
                form.text_field_mut().push(ch);
            }
            _ => {}
        }
    }

    fn handle_rules_key(&mut self, action: AppAction) {
        if self.state.rules.form.is_some() {
            self.handle_rule_form_key(action);
            return;
        }

        match action {
            AppAction::Up | AppAction::Input('k' | 'K') => self.state.rules.select_prev(),
            AppAction::Down | AppAction::Input('j' | 'J') => self.state.rules.select_next(),
            AppAction::Input('n' | 'N') => self.state.rules.form = Some(RuleForm::default()),
            AppAction::Submit | AppAction::Input('e' | 'E') => self.open_rule_form(),
            AppAction::Input('d' | 'D') => self.confirm_rule_delete(),
            other => self.handle_global_key(other),
        }
    }

    fn handle_rule_form_key(&mut self, action: AppAction) {
        let keywords_focused = self
            .state
            .rules
            .form
            .as_ref()
            .is_some_and(|form| form.focus == RuleField::Keywords);

        match action {
            AppAction::Cancel => {
                self.state.rules.form = None;
                return;
            }
            AppAction::Send => {
                self.submit_rule_save();
                return;
            }
            AppAction::Submit if !keywords_focused => {
                self.submit_rule_save();
                return;
            }
            _ => {}
        }

        let names = self.category_names();
        let Some(form) = self.state.rules.form.as_mut() else {
            return;
        };
        match action {
            AppAction::NextField => form.next_focus(),
            AppAction::Submit => {
                form.keywords.commit_pending();
            }
            AppAction::Up => {
                if form.focus == RuleField::MainCategory {
                    if let Some(name) = next_category(&names, &form.main_category, -1) {
                        form.main_category = name;
                    }
                }
            }
            AppAction::Down => {
                if form.focus == RuleField::MainCategory {
                    if let Some(name) = next_category(&names, &form.main_category, 1) {
                        form.main_category = name;
                    }
                }
            }
            AppAction::Left => {
                if form.focus == RuleField::Keywords {
                    form.keywords.select_prev();
                }
            }
            AppAction::Right => {
                if form.focus == RuleField::Keywords {
                    form.keywords.select_next();
                }
            }
            AppAction::Backspace => {
                form.error = None;
                if form.focus == RuleField::Keywords {
                    form.keywords.backspace();
                } else if let Some(field) = form.text_field_mut() {
                    field.pop();
                }
            }
            AppAction::Input(ch) => {
                form.error = None;
                if form.focus == RuleField::Keywords {
                    form.keywords.insert_char(ch);
                } else if let Some(field) = form.text_field_mut() {
                    field.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_cycles_key(&mut self, action: AppAction) {
        if self.state.cycles.start.is_some() {
            self.handle_start_dialog_key(action);
            return;
        }
        if self.state.cycles.analysis.is_some() {
            if matches!(action, AppAction::Cancel) {
                self.state.cycles.analysis = None;
            }
            return;
        }

        match action {
            AppAction::Up | AppAction::Input('k' | 'K') => self.state.cycles.select_prev(),
            AppAction::Down | AppAction::Input('j' | 'J') => self.state.cycles.select_next(),
            AppAction::Input('n' | 'N') => {
                self.state.cycles.start = Some(StartDialog::default());
            }
            AppAction::Submit => self.open_cycle_analysis(),
            other => self.handle_global_key(other),
        }
    }

    fn handle_start_dialog_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.state.cycles.start = None,
            AppAction::Submit | AppAction::Send => self.submit_cycle_start(),
            AppAction::Backspace => {
                if let Some(dialog) = self.state.cycles.start.as_mut() {
                    dialog.date.pop();
                    dialog.error = None;
                }
            }
            AppAction::Input(ch) => {
                if let Some(dialog) = self.state.cycles.start.as_mut() {
                    if ch.is_ascii_digit() || ch == '-' {
                        dialog.date.push(ch);
                        dialog.error = None;
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.state.help_open || self.state.confirm.is_some() {
            return;
        }

        match self.state.section {
            Section::Dashboard => {
                if self.state.composer.focused {
                    self.state.composer.buffer.push_str(text);
                }
            }
            Section::Invoices => {
                if let Some(form) = self.state.invoices.form.as_mut() {
                    form.text_field_mut().push_str(text);
                }
            }
            Section::Rules => {
                if let Some(form) = self.state.rules.form.as_mut() {
                    if form.focus == RuleField::Keywords {
                        form.keywords.paste(text);
                    } else if let Some(field) = form.text_field_mut() {
                        field.push_str(text);
                    }
                }
            }
            Section::Cycles => {
                if let Some(dialog) = self.state.cycles.start.as_mut() {
                    for ch in text.chars() {
                        if ch.is_ascii_digit() || ch == '-' {
                            dialog.date.push(ch);
                        }
                    }
                }
            }
        }
    }

    fn open_invoice_form(&mut self) {
        if let Some(invoice) = self.state.invoices.items.get(self.state.invoices.selected) {
            self.state.invoices.form = Some(InvoiceForm::from_invoice(invoice));
        }
    }

    fn open_rule_form(&mut self) {
        if let Some(rule) = self.state.rules.items.get(self.state.rules.selected) {
            self.state.rules.form = Some(RuleForm::from_rule(rule));
        }
    }

    fn confirm_invoice_delete(&mut self) {
        if let Some(invoice) = self.state.invoices.items.get(self.state.invoices.selected) {
            self.state.confirm = Some(ConfirmState {
                message_key: "confirmDeleteInvoice",
                action: PendingAction::DeleteInvoice(invoice.id),
            });
        }
    }

    fn confirm_rule_delete(&mut self) {
        if let Some(rule) = self.state.rules.items.get(self.state.rules.selected) {
            self.state.confirm = Some(ConfirmState {
                message_key: "confirmDelete",
                action: PendingAction::DeleteRule(rule.id),
            });
        }
    }

    fn open_cycle_analysis(&mut self) {
        if let Some(cycle) = self.state.cycles.history.get(self.state.cycles.selected) {
            self.load_cycle_analysis(cycle.id);
        }
    }

    fn toggle_language(&mut self) {
        self.state.lang = self.state.lang.toggle();
        self.local.language = Some(self.state.lang.code().to_string());
        if let Err(err) = self.local.save(&self.config.state_path) {
            tracing::warn!("failed to persist language choice: {err}");
        }
    }

    fn show_toast(&mut self, message_key: &'static str, level: ToastLevel) {
        self.state.toast = Some(ToastState {
            message_key,
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = &self.state.toast {
            if Instant::now() >= toast.expires_at {
                self.state.toast = None;
            }
        }
    }

    fn category_names(&self) -> Vec<String> {
        self.state
            .overview
            .cards
            .iter()
            .map(|card| card.name.clone())
            .collect()
    }

    fn refresh_all(&mut self) {
        self.load_overview();
        self.load_invoices();
        self.load_rules();
        self.load_cycles();
        self.state.last_refresh = Some(Local::now());
    }

    fn load_overview(&mut self) {
        let token = self.state.overview.generation.bump();
        self.state.overview.loading = true;
        self.state.overview.failed = false;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = fetch_overview(client).await;
            let _ = tx.send(AppEvent::Overview { token, result });
        });
    }

    fn load_invoices(&mut self) {
        let token = self.state.invoices.generation.bump();
        self.state.invoices.loading = true;
        self.state.invoices.failed = false;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.invoices().await;
            let _ = tx.send(AppEvent::Invoices { token, result });
        });
    }

    fn load_rules(&mut self) {
        let token = self.state.rules.generation.bump();
        self.state.rules.loading = true;
        self.state.rules.failed = false;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.rules_list().await;
            let _ = tx.send(AppEvent::Rules { token, result });
        });
    }

    fn load_cycles(&mut self) {
        let token = self.state.cycles.generation.bump();
        self.state.cycles.loading = true;
        self.state.cycles.failed = false;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let limit = self.config.history_limit;
        tokio::spawn(async move {
            let result = fetch_cycles(client, limit).await;
            let _ = tx.send(AppEvent::Cycles { token, result });
        });
    }

    fn load_cycle_analysis(&mut self, cycle_id: i64) {
        let token = self.state.cycles.analysis_generation.bump();
        self.state.cycles.analysis = Some(AnalysisView {
            cycle_id,
            report: None,
            loading: true,
            failed: false,
        });

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.cycle_analysis(cycle_id).await;
            let _ = tx.send(AppEvent::CycleAnalysis { token, result });
        });
    }

    fn submit_sms(&mut self) {
        if self.state.composer.sending {
            return;
        }
        let message = self.state.composer.buffer.trim().to_string();
        if message.is_empty() {
            return;
        }

        self.state.composer.sending = true;
        self.state.composer.outcome = None;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.process_sms(&message).await;
            let _ = tx.send(AppEvent::SmsProcessed { result });
        });
    }

    fn submit_invoice_update(&mut self) {
        let Some(form) = self.state.invoices.form.as_mut() else {
            return;
        };
        if form.saving {
            return;
        }
        let Some(update) = form.validate() else {
            return;
        };
        form.saving = true;
        let invoice_id = form.invoice_id;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.invoice_update(invoice_id, &update).await.map(|_| ());
            let _ = tx.send(AppEvent::MutationDone {
                kind: MutationKind::InvoiceSave,
                result,
            });
        });
    }

    fn submit_invoice_delete(&mut self, invoice_id: i64) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.invoice_delete(invoice_id).await.map(|_| ());
            let _ = tx.send(AppEvent::MutationDone {
                kind: MutationKind::InvoiceDelete,
                result,
            });
        });
    }

    fn submit_rule_save(&mut self) {
        let Some(form) = self.state.rules.form.as_mut() else {
            return;
        };
        if form.saving {
            return;
        }
        let Some(rule) = form.validate() else {
            return;
        };
        form.saving = true;
        let editing = form.editing;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match editing {
                Some(rule_id) => client.rule_update(rule_id, &rule).await.map(|_| ()),
                None => client.rule_create(&rule).await.map(|_| ()),
            };
            let _ = tx.send(AppEvent::MutationDone {
                kind: MutationKind::RuleSave,
                result,
            });
        });
    }

    fn submit_rule_delete(&mut self, rule_id: i64) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.rule_delete(rule_id).await.map(|_| ());
            let _ = tx.send(AppEvent::MutationDone {
                kind: MutationKind::RuleDelete,
                result,
            });
        });
    }

    fn submit_cycle_start(&mut self) {
        let Some(dialog) = self.state.cycles.start.as_mut() else {
            return;
        };
        if dialog.saving {
            return;
        }
        let today = Local::now().date_naive();
        let date = match parse_start_date(&dialog.date, today) {
            Ok(date) => date,
            Err(key) => {
                dialog.error = Some(key);
                return;
            }
        };
        dialog.saving = true;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.cycle_start(date).await.map(|_| ());
            let _ = tx.send(AppEvent::MutationDone {
                kind: MutationKind::CycleStart,
                result,
            });
        });
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Overview { token, result } => {
                if !self.state.overview.generation.is_current(token) {
                    return;
                }
                self.state.overview.loading = false;
                match result {
                    Ok(cards) => {
                        self.state.overview.cards = cards;
                        self.state.overview.failed = false;
                    }
                    Err(err) => {
                        tracing::warn!("overview fetch failed: {}", describe_client_error(&err));
                        self.state.overview.failed = true;
                    }
                }
            }
            AppEvent::Invoices { token, result } => {
                if !self.state.invoices.generation.is_current(token) {
                    return;
                }
                self.state.invoices.loading = false;
                match result {
                    Ok(items) => {
                        self.state.invoices.items = items;
                        self.state.invoices.failed = false;
                        self.state.invoices.clamp_selection();
                    }
                    Err(err) => {
                        tracing::warn!("invoices fetch failed: {}", describe_client_error(&err));
                        self.state.invoices.failed = true;
                    }
                }
            }
            AppEvent::Rules { token, result } => {
                if !self.state.rules.generation.is_current(token) {
                    return;
                }
                self.state.rules.loading = false;
                match result {
                    Ok(items) => {
                        self.state.rules.items = items;
                        self.state.rules.failed = false;
                        self.state.rules.clamp_selection();
                    }
                    Err(err) => {
                        tracing::warn!("rules fetch failed: {}", describe_client_error(&err));
                        self.state.rules.failed = true;
                    }
                }
            }
            AppEvent::Cycles { token, result } => {
                if !self.state.cycles.generation.is_current(token) {
                    return;
                }
                self.state.cycles.loading = false;
                match result {
                    Ok(data) => {
                        self.state.cycles.current = data.current;
                        self.state.cycles.history = data.history;
                        self.state.cycles.failed = false;
                        self.state.cycles.clamp_selection();
                    }
                    Err(err) => {
                        tracing::warn!("cycles fetch failed: {}", describe_client_error(&err));
                        self.state.cycles.failed = true;
                    }
                }
            }
            AppEvent::CycleAnalysis { token, result } => {
                if !self.state.cycles.analysis_generation.is_current(token) {
                    return;
                }
                if let Some(view) = self.state.cycles.analysis.as_mut() {
                    view.loading = false;
                    match result {
                        Ok(report) => view.report = Some(report),
                        Err(err) => {
                            tracing::warn!(
                                "cycle analysis fetch failed: {}",
                                describe_client_error(&err)
                            );
                            view.failed = true;
                        }
                    }
                }
            }
            AppEvent::SmsProcessed { result } => {
                self.state.composer.sending = false;
                match result {
                    Ok(response) if response.processed() => {
                        self.state.composer.buffer.clear();
                        self.state.composer.outcome = Some(ComposerOutcome::Success);
                        self.refresh_all();
                    }
                    Ok(response) => {
                        tracing::warn!("sms rejected by backend: {}", response.status);
                        self.state.composer.outcome = Some(ComposerOutcome::Error);
                    }
                    Err(err) => {
                        tracing::warn!("sms processing failed: {}", describe_client_error(&err));
                        self.state.composer.outcome = Some(ComposerOutcome::Error);
                    }
                }
            }
            AppEvent::MutationDone { kind, result } => match result {
                Ok(()) => {
                    match kind {
                        MutationKind::RuleSave => self.state.rules.form = None,
                        MutationKind::InvoiceSave => self.state.invoices.form = None,
                        MutationKind::CycleStart => self.state.cycles.start = None,
                        MutationKind::RuleDelete | MutationKind::InvoiceDelete => {}
                    }
                    self.show_toast(toast_key_for(kind), ToastLevel::Success);
                    self.refresh_all();
                }
                Err(err) => {
                    tracing::warn!(
                        "mutation {kind:?} failed: {}",
                        describe_client_error(&err)
                    );
                    match kind {
                        MutationKind::RuleSave => {
                            if let Some(form) = self.state.rules.form.as_mut() {
                                form.saving = false;
                            }
                        }
                        MutationKind::InvoiceSave => {
                            if let Some(form) = self.state.invoices.form.as_mut() {
                                form.saving = false;
                            }
                        }
                        MutationKind::CycleStart => {
                            if let Some(dialog) = self.state.cycles.start.as_mut() {
                                dialog.saving = false;
                            }
                        }
                        MutationKind::RuleDelete | MutationKind::InvoiceDelete => {}
                    }
                    self.show_toast("error", ToastLevel::Error);
                }
            },
        }
    }
}

async fn fetch_overview(client: Client) -> std::result::Result<Vec<CategoryOverview>, ClientError> {
    let names = client.categories().await?;

    let mut cards: Vec<Option<CategoryOverview>> = (0..names.len()).map(|_| None).collect();
    let mut set = JoinSet::new();
    for (index, name) in names.into_iter().enumerate() {
        let client = client.clone();
        set.spawn(async move {
            let card = fetch_category_card(&client, name).await;
            (index, card)
        });
    }

    while let Some(joined) = set.join_next().await {
        let (index, card) =
            joined.map_err(|_| ClientError::Server("category fetch task failed".to_string()))?;
        cards[index] = Some(card?);
    }

    Ok(cards.into_iter().flatten().collect())
}

async fn fetch_category_card(
    client: &Client,
    name: String,
) -> std::result::Result<CategoryOverview, ClientError> {
    match client.category_remaining_limit(&name).await? {
        CategoryLimit::Limited(snapshot) => Ok(CategoryOverview {
            name,
            snapshot: Some(snapshot),
            analysis: None,
        }),
        // No limit configured, so there is no snapshot to show; fetch the
        // plain spend stats instead.
        CategoryLimit::Unlimited { .. } => {
            let analysis = client.category_analysis(&name).await?;
            Ok(CategoryOverview {
                name,
                snapshot: None,
                analysis: Some(analysis),
            })
        }
    }
}

async fn fetch_cycles(
    client: Client,
    limit: u32,
) -> std::result::Result<CyclesData, ClientError> {
    let current = match client.cycle_current().await? {
        CurrentCycle::Active(cycle) => Some(cycle),
        CurrentCycle::None { .. } => None,
    };
    let history = client.cycle_history(limit).await?;
    Ok(CyclesData { current, history })
}

fn parse_start_date(raw: &str, today: NaiveDate) -> std::result::Result<NaiveDate, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(today);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| "invalidDate")?;
    if date > today {
        return Err("futureDate");
    }
    Ok(date)
}

fn next_category(names: &[String], current: &str, step: isize) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let index = match names.iter().position(|name| name == current) {
        Some(position) => {
            let len = names.len() as isize;
            (position as isize + step).rem_euclid(len) as usize
        }
        None if step >= 0 => 0,
        None => names.len() - 1,
    };
    Some(names[index].clone())
}

fn normalized_classification(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "Expense".to_string()
    } else {
        trimmed.to_string()
    }
}

fn toast_key_for(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::RuleSave => "ruleSaved",
        MutationKind::RuleDelete => "ruleDeleted",
        MutationKind::InvoiceSave => "invoiceUpdated",
        MutationKind::InvoiceDelete => "invoiceDeleted",
        MutationKind::CycleStart => "cycleStarted",
    }
}

fn describe_client_error(err: &ClientError) -> String {
    match err {
        ClientError::NotFound => "not found".to_string(),
        ClientError::Validation(message) => format!("validation: {message}"),
        ClientError::Server(message) => format!("server: {message}"),
        ClientError::Transport(err) => format!("transport: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview_card(name: &str) -> CategoryOverview {
        CategoryOverview {
            name: name.to_string(),
            snapshot: None,
            analysis: None,
        }
    }

    #[test]
    fn generation_rejects_stale_tokens() {
        let mut generation = Generation::default();
        let stale = generation.bump();
        let current = generation.bump();
        assert!(!generation.is_current(stale));
        assert!(generation.is_current(current));
    }

    #[test]
    fn selection_saturates_at_list_edges() {
        let mut state = InvoicesState::default();
        state.select_next();
        state.select_prev();
        assert_eq!(state.selected, 0);

        state.selected = 5;
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn rule_form_requires_keywords() {
        let mut form = RuleForm {
            main_category: "Groceries".to_string(),
            ..RuleForm::default()
        };
        assert!(form.validate().is_none());
        assert_eq!(form.error, Some("merchantRequired"));
    }

    #[test]
    fn rule_form_requires_main_category() {
        let mut form = RuleForm::default();
        form.keywords.pending = "tamimi".to_string();
        assert!(form.validate().is_none());
        assert_eq!(form.error, Some("categoryRequired"));
    }

    #[test]
    fn rule_form_commits_pending_keyword_on_save() {
        let mut form = RuleForm {
            main_category: "Groceries".to_string(),
            ..RuleForm::default()
        };
        form.keywords.pending = "tamimi".to_string();
        let rule = form.validate().unwrap();
        assert_eq!(rule.merchant_keywords, "tamimi");
    }

    #[test]
    fn rule_form_rejects_unparseable_limit() {
        let mut form = RuleForm {
            main_category: "Groceries".to_string(),
            limit: "12x".to_string(),
            ..RuleForm::default()
        };
        form.keywords.pending = "tamimi".to_string();
        assert!(form.validate().is_none());
        assert_eq!(form.error, Some("invalidLimit"));
    }

    #[test]
    fn rule_form_blank_limit_means_no_limit() {
        let mut form = RuleForm {
            main_category: "Groceries".to_string(),
            limit: "  ".to_string(),
            ..RuleForm::default()
        };
        form.keywords.pending = "tamimi".to_string();
        let rule = form.validate().unwrap();
        assert_eq!(rule.category_limit, None);
    }

    #[test]
    fn blank_classification_defaults_to_expense() {
        assert_eq!(normalized_classification("  "), "Expense");
        assert_eq!(normalized_classification(" Income "), "Income");
    }

    #[test]
    fn start_date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(parse_start_date("", today), Ok(today));
    }

    #[test]
    fn start_date_rejects_bad_format_and_future() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(parse_start_date("10/03/2025", today), Err("invalidDate"));
        assert_eq!(parse_start_date("2025-03-11", today), Err("futureDate"));
        assert_eq!(
            parse_start_date("2025-03-01", today),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
    }

    #[test]
    fn category_cycling_wraps_in_both_directions() {
        let names = vec!["Groceries".to_string(), "Transport".to_string()];
        assert_eq!(next_category(&names, "Transport", 1).as_deref(), Some("Groceries"));
        assert_eq!(next_category(&names, "Groceries", -1).as_deref(), Some("Transport"));
        assert_eq!(next_category(&names, "Unknown", 1).as_deref(), Some("Groceries"));
        assert_eq!(next_category(&[], "Groceries", 1), None);
    }

    #[tokio::test]
    async fn stale_overview_response_is_discarded() {
        let mut app = App::new(AppConfig::default()).unwrap();
        let stale = app.state.overview.generation.bump();
        let _current = app.state.overview.generation.bump();
        app.state.overview.loading = true;

        app.apply_event(AppEvent::Overview {
            token: stale,
            result: Ok(vec![overview_card("Groceries")]),
        });

        assert!(app.state.overview.cards.is_empty());
        assert!(app.state.overview.loading);
    }

    #[tokio::test]
    async fn current_overview_response_lands() {
        let mut app = App::new(AppConfig::default()).unwrap();
        let token = app.state.overview.generation.bump();
        app.state.overview.loading = true;

        app.apply_event(AppEvent::Overview {
            token,
            result: Ok(vec![overview_card("Groceries")]),
        });

        assert_eq!(app.state.overview.cards.len(), 1);
        assert!(!app.state.overview.loading);
    }

    #[tokio::test]
    async fn sms_success_clears_composer_and_refreshes() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.composer.buffer = "POS purchase SAR 42.00 at TAMIMI".to_string();
        app.state.composer.sending = true;

        let response = SmsResponse {
            status: SmsResponse::PROCESSED.to_string(),
            extraction_status: Some("success".to_string()),
            data: None,
        };
        app.apply_event(AppEvent::SmsProcessed {
            result: Ok(response),
        });

        assert!(app.state.composer.buffer.is_empty());
        assert_eq!(app.state.composer.outcome, Some(ComposerOutcome::Success));
        assert!(!app.state.composer.sending);
    }

    #[tokio::test]
    async fn sms_error_status_preserves_input() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.composer.buffer = "not an sms".to_string();
        app.state.composer.sending = true;

        let response = SmsResponse {
            status: "error".to_string(),
            extraction_status: None,
            data: None,
        };
        app.apply_event(AppEvent::SmsProcessed {
            result: Ok(response),
        });

        assert_eq!(app.state.composer.buffer, "not an sms");
        assert_eq!(app.state.composer.outcome, Some(ComposerOutcome::Error));
    }

    #[tokio::test]
    async fn successful_mutation_closes_form_and_toasts() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.rules.form = Some(RuleForm::default());

        app.apply_event(AppEvent::MutationDone {
            kind: MutationKind::RuleSave,
            result: Ok(()),
        });

        assert!(app.state.rules.form.is_none());
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.message_key, "ruleSaved");
        assert_eq!(toast.level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn failed_mutation_keeps_form_open() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.rules.form = Some(RuleForm {
            saving: true,
            ..RuleForm::default()
        });

        app.apply_event(AppEvent::MutationDone {
            kind: MutationKind::RuleSave,
            result: Err(ClientError::Server("boom".to_string())),
        });

        let form = app.state.rules.form.as_ref().unwrap();
        assert!(!form.saving);
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
    }
}
