use std::sync::OnceLock;

use chrono::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 480;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Settings baked in at build time (`API_URL`, `LOG_LEVEL`, `SESSION_TTL_MINUTES`).
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_root: String,
    pub log_level: log::Level,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("API_URL"),
            option_env!("LOG_LEVEL"),
            option_env!("SESSION_TTL_MINUTES"),
        )
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>, ttl: Option<&str>) -> Self {
        let api_root = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| level.parse::<log::Level>().ok())
            .unwrap_or(log::Level::Info);

        let minutes = ttl
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);

        Self {
            api_root,
            log_level,
            session_ttl: Duration::minutes(minutes),
        }
    }
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_values(None, None, None);
        assert_eq!(config.api_root, "http://localhost:5000");
        assert_eq!(config.log_level, log::Level::Info);
        assert_eq!(config.session_ttl, Duration::minutes(480));
    }

    #[test]
    fn api_root_loses_trailing_slash() {
        let config = AppConfig::from_values(Some("https://api.example.com/v1/"), None, None);
        assert_eq!(config.api_root, "https://api.example.com/v1");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = AppConfig::from_values(Some("  "), Some("loud"), Some("-5"));
        assert_eq!(config.api_root, "http://localhost:5000");
        assert_eq!(config.log_level, log::Level::Info);
        assert_eq!(config.session_ttl, Duration::minutes(480));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let config = AppConfig::from_values(None, Some("DEBUG"), Some("30"));
        assert_eq!(config.log_level, log::Level::Debug);
        assert_eq!(config.session_ttl, Duration::minutes(30));
    }
}
