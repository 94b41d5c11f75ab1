use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_PREDICT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub predict_timeout: Duration,
    pub save_engagement: bool,
    pub log_level: String,
    /// Daily rolling log directory; `None` keeps logs on stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            predict_timeout: Duration::from_millis(DEFAULT_PREDICT_TIMEOUT_MS),
            save_engagement: false,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Invalid values fall back to
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = get("VARK_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let predict_timeout = Duration::from_millis(
            get("VARK_PREDICT_TIMEOUT_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_PREDICT_TIMEOUT_MS),
        );

        let save_engagement = get("VARK_SAVE_ENGAGEMENT").is_some_and(|v| is_enabled(&v));

        let log_level = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let log_dir = get("ENABLE_FILE_LOGS")
            .filter(|v| is_enabled(v))
            .map(|_| PathBuf::from(get("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())));

        Self {
            api_base,
            predict_timeout,
            save_engagement,
            log_level,
            log_dir,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}
