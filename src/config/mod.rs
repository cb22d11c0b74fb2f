use anyhow::{anyhow, Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest thinking budget the pro models accept.
pub const MAX_THINKING_BUDGET: u32 = 32_768;
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Models {
    /// Deep analysis of a storefront or product page.
    pub analysis: String,
    /// Fast reformatting of the raw brand report.
    pub synthesis: String,
    /// Final copy generation.
    pub generation: String,
    pub chat: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            analysis: "gemini-2.5-pro".into(),
            synthesis: "gemini-2.5-flash-lite".into(),
            generation: "gemini-2.5-pro".into(),
            chat: "gemini-2.5-flash".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub api_key_env: String,
    pub models: Models,
    pub thinking_budget: u32,
    pub timeout_secs: u64,
    pub export_dir: String,
    pub artifacts_dir: String,
    pub save_artifacts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            models: Models::default(),
            thinking_budget: MAX_THINKING_BUDGET,
            timeout_secs: 600,
            export_dir: ".".into(),
            artifacts_dir: ".brandvoice/runs".into(),
            save_artifacts: false,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the TOML file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Reads the API credential. Checked once at startup; a missing key is fatal.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| lookup(*name))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("{} environment variable not set", self.api_key_env))
    }
}
