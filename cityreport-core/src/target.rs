use reqwest::Url;
use tracing::warn;

use crate::{
    city::CityQuery,
    config::{self, Settings},
    error::CityReportError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    Weather,
    AirQuality,
}

impl TargetId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetId::Weather => "weather",
            TargetId::AirQuality => "air-quality",
        }
    }

    /// Name used in user-facing notices.
    pub fn label(&self) -> &'static str {
        match self {
            TargetId::Weather => "Weather API",
            TargetId::AirQuality => "Air quality API",
        }
    }

    pub const fn all() -> &'static [TargetId] {
        &[TargetId::Weather, TargetId::AirQuality]
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-resolved endpoint for one target and one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    id: TargetId,
    url: String,
}

impl ApiTarget {
    /// Build the request URL:
    /// - weather: `{base}/data/2.5/weather?q={city}&appid={key}`
    /// - air quality: `{base}/feed/{city}/?token={key}`
    pub fn new(
        id: TargetId,
        base_url: &str,
        api_key: &str,
        city: &CityQuery,
    ) -> Result<Self, CityReportError> {
        Url::parse(base_url).map_err(|e| CityReportError::InvalidBaseUrl {
            target: id.as_str(),
            base: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let base = base_url.trim_end_matches('/');
        let key = urlencoding::encode(api_key);
        let url = match id {
            TargetId::Weather => {
                format!("{base}/data/2.5/weather?q={}&appid={key}", city.encoded())
            }
            TargetId::AirQuality => format!("{base}/feed/{}/?token={key}", city.encoded()),
        };

        Ok(Self { id, url })
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Resolve every target for `city` from settings, in [`TargetId::all`] order.
pub fn targets_from_settings(
    settings: &Settings,
    city: &CityQuery,
) -> Result<Vec<ApiTarget>, CityReportError> {
    TargetId::all()
        .iter()
        .map(|&id| {
            if !settings.is_target_configured(id) {
                warn!("{} is not set; requests will be sent without an API key", config::key_var(id));
            }
            let cfg = settings.target_config(id);
            ApiTarget::new(id, &cfg.base_url, &cfg.api_key, city)
        })
        .collect()
}
