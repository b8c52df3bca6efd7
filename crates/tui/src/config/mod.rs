use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/masareef.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Forced UI language (`en` or `ar`); unset means use the persisted
    /// choice, then the environment locale.
    pub language: Option<String>,
    /// Where the UI keeps its persisted state (selected language).
    pub state_path: String,
    /// Log destination; the dashboard owns stdout, so tracing goes to a file.
    pub log_file: String,
    pub log_level: String,
    /// How many past cycles to request from `GET /cycle/history`.
    pub history_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            language: None,
            state_path: "config/masareef_state.json".to_string(),
            log_file: "masareef.log".to_string(),
            log_level: "info".to_string(),
            history_limit: 12,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "masareef_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override UI language (en or ar).
    #[arg(long)]
    language: Option<String>,
    /// Override the log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MASAREEF_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(language) = args.language {
        settings.language = Some(language);
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
