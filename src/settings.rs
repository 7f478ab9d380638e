use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: Url,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    /// IANA name used when a workout date carries an offset.
    pub display_timezone: String,
    /// Comma-separated user ids offered by the filter control.
    pub filter_users: String,
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_API_BASE_URL, APP_PORT, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("api_base_url", "http://localhost:8000")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("display_timezone", "UTC")?
            .set_default("filter_users", "")?
            .build()?;

        config.try_deserialize()
    }

    pub fn user_options(&self) -> Vec<String> {
        self.filter_users
            .split(',')
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.api_base_url.as_str(), "http://localhost:8000/");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.display_timezone, "UTC");
        assert!(settings.request_timeout().is_none());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("APP_API_BASE_URL", "http://api.internal:9000");
            std::env::set_var("APP_FILTER_USERS", "nettle, bramble,,");
            std::env::set_var("APP_REQUEST_TIMEOUT_SECS", "5");
        }
        let settings = Settings::from_env();
        unsafe {
            std::env::remove_var("APP_API_BASE_URL");
            std::env::remove_var("APP_FILTER_USERS");
            std::env::remove_var("APP_REQUEST_TIMEOUT_SECS");
        }

        let settings = settings.unwrap();
        assert_eq!(settings.api_base_url.host_str(), Some("api.internal"));
        assert_eq!(settings.user_options(), vec!["nettle", "bramble"]);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
    }
}
