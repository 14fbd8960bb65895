//! Runtime settings, read from the environment.
//!
//! There is no configuration file: API secrets and endpoint overrides come from
//! environment variables and everything else uses built-in defaults.

use crate::{backoff::BackoffPolicy, target::TargetId};

pub const WEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const AQI_KEY_VAR: &str = "WAQI_TOKEN";
pub const WEATHER_URL_VAR: &str = "CITYREPORT_WEATHER_URL";
pub const AQI_URL_VAR: &str = "CITYREPORT_AQI_URL";

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_AQI_URL: &str = "https://api.waqi.info";

/// Environment variable holding the API key of `id`.
pub fn key_var(id: TargetId) -> &'static str {
    match id {
        TargetId::Weather => WEATHER_KEY_VAR,
        TargetId::AirQuality => AQI_KEY_VAR,
    }
}

/// Endpoint and secret for a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub weather: TargetConfig,
    pub air_quality: TargetConfig,
    pub backoff: BackoffPolicy,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let target = |url_var: &str, default_url: &str, key_var: &str| TargetConfig {
            base_url: get(url_var).unwrap_or_else(|| default_url.to_string()),
            api_key: get(key_var).unwrap_or_default(),
        };

        Self {
            weather: target(WEATHER_URL_VAR, DEFAULT_WEATHER_URL, WEATHER_KEY_VAR),
            air_quality: target(AQI_URL_VAR, DEFAULT_AQI_URL, AQI_KEY_VAR),
            backoff: BackoffPolicy::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn target_config(&self, id: TargetId) -> &TargetConfig {
        match id {
            TargetId::Weather => &self.weather,
            TargetId::AirQuality => &self.air_quality,
        }
    }

    /// Returns the API key for a target, if one was supplied.
    pub fn api_key(&self, id: TargetId) -> Option<&str> {
        Some(self.target_config(id).api_key.as_str()).filter(|k| !k.is_empty())
    }

    pub fn is_target_configured(&self, id: TargetId) -> bool {
        self.api_key(id).is_some()
    }
}
