//! Configuration loading and the resolved options the pipeline runs with.
//!
//! Every section of the file is optional; missing values fall back to the
//! defaults below, and CLI flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extract::YOUTUBE_BASE_URL;

/// Default cap on collected comments.
pub const DEFAULT_MAX_COMMENTS: usize = 300;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;

/// Order in which YouTube hands out comments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// "Top comments"
    #[default]
    Popular,
    /// "Newest first"
    Recent,
}

impl SortOrder {
    /// Position of this ordering in the comment section's sort menu.
    pub fn menu_index(self) -> usize {
        match self {
            SortOrder::Popular => 0,
            SortOrder::Recent => 1,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub analysis: Option<AnalysisConfig>,
    pub server: Option<ServerConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AnalysisConfig {
    pub max_comments: Option<usize>,
    pub sort_order: Option<SortOrder>,
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HttpConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub timeout_secs: Option<u64>,
    pub request_delay_ms: Option<u64>,
}

/// What one analysis run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub max_comments: usize,
    pub sort_order: SortOrder,
    pub min_confidence: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_comments: DEFAULT_MAX_COMMENTS,
            sort_order: SortOrder::default(),
            min_confidence: 0.0,
        }
    }
}

/// Settings for the HTTP client talking to YouTube.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Site the watch page and comment API are fetched from.
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
    /// Pause before each continuation request.
    pub request_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: YOUTUBE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }
}

impl Config {
    pub fn analysis_options(&self) -> AnalysisOptions {
        let defaults = AnalysisOptions::default();
        let Some(analysis) = self.analysis.as_ref() else {
            return defaults;
        };

        AnalysisOptions {
            max_comments: analysis.max_comments.unwrap_or(defaults.max_comments),
            sort_order: analysis.sort_order.unwrap_or(defaults.sort_order),
            min_confidence: analysis.min_confidence.unwrap_or(defaults.min_confidence),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        let defaults = ClientOptions::default();
        let Some(http) = self.http.as_ref() else {
            return defaults;
        };

        ClientOptions {
            base_url: http.base_url.clone().unwrap_or(defaults.base_url),
            user_agent: http.user_agent.clone().unwrap_or(defaults.user_agent),
            accept_language: http
                .accept_language
                .clone()
                .unwrap_or(defaults.accept_language),
            timeout: http
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            request_delay: http
                .request_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
        }
    }

    pub fn bind_addr(&self) -> String {
        self.server
            .as_ref()
            .and_then(|server| server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("yt-comment-lang").join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
