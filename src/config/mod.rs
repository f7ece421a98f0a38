pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use toml_config::TomlConfig;

pub const DEFAULT_API_ENDPOINT: &str = "https://health-plan-apis.onrender.com/calculate_premium";
pub const DEFAULT_PROMPT: &str = "quote> ";

/// 命令列參數；未指定的項目由設定檔或預設值補上
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Parser)]
#[command(name = "premium-cart")]
#[command(about = "Insurance premium calculator with an in-memory plan cart")]
pub struct CliConfig {
    /// Premium calculation endpoint (POST)
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Abort requests that take longer than this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Read commands line by line without prompts (for piped input)
    #[arg(long)]
    pub script: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併順序：預設值 ← 設定檔 ← 命令列
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                AppConfig::from_toml(file_config)
            }
            None => AppConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = Some(timeout);
        }

        Ok(config)
    }
}

/// 合併後實際使用的設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub prompt: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(file: TomlConfig) -> Self {
        let defaults = Self::default();
        let prompt = file.prompt().map(str::to_string).unwrap_or(defaults.prompt);
        Self {
            api_endpoint: file.service.endpoint.unwrap_or(defaults.api_endpoint),
            timeout_seconds: file.service.timeout_seconds,
            headers: file.service.headers.unwrap_or_default(),
            prompt,
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn extra_headers(&self) -> Option<&HashMap<String, String>> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        validate_non_empty_string("prompt", &self.prompt)?;
        Ok(())
    }
}
