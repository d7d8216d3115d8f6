use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/ledger_tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Prefills the login form.
    pub username: String,
    pub state_path: String,
    pub log_file: String,
    pub log_level: String,
    pub auth_username: String,
    pub auth_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let credentials = ledger::FixedCredentials::default();
        let (auth_username, auth_password) = credentials.into_parts();
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            state_path: "config/ledger_state.json".to_string(),
            log_file: "ledger_tui.log".to_string(),
            log_level: "info".to_string(),
            auth_username,
            auth_password,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledger_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Prefill the username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override the local state file (identity and locked accounts).
    #[arg(long)]
    state: Option<String>,
    /// Override the log file.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGER_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(state) = args.state {
        settings.state_path = state;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
