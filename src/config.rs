use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `mail.password`, so the credential
/// does not have to live in the config file.
pub const SMTP_PASSWORD_ENV: &str = "EXPENSO_SMTP_PASSWORD";

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Runtime configuration, loaded once at startup and handed to the store and
/// notifier constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding both data files
    pub data_dir: PathBuf,
    pub expenses_file: String,
    pub settings_file: String,
    /// Prefix used when showing amounts, e.g. "₹" or "$"
    pub currency_symbol: String,
    /// Budget alert mail settings; alerts are disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            expenses_file: "expenses.csv".into(),
            settings_file: "settings.csv".into(),
            currency_symbol: "₹".into(),
            mail: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Config::default()
        };

        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            config.apply_password_override(password);
        }
        Ok(config)
    }

    pub fn expenses_path(&self) -> PathBuf {
        self.data_dir.join(&self.expenses_file)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }

    fn apply_password_override(&mut self, password: String) {
        if let Some(mail) = self.mail.as_mut() {
            mail.password = password;
        }
    }
}

/// SMTP relay settings for the budget alert.
/// The sender address doubles as the login user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub sender: String,
    pub recipient: String,
    #[serde(default)]
    pub password: String,
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}
