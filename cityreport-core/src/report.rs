use crate::{city::CityQuery, target::TargetId};

pub mod aqi;
pub mod weather;

/// Text produced for one target once it settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A structured report built from the payload.
    Data(String),
    /// A one-line explanation that no data could be shown.
    Unavailable(String),
}

impl Report {
    pub fn text(&self) -> &str {
        match self {
            Report::Data(text) | Report::Unavailable(text) => text,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Report::Data(_))
    }
}

pub fn header(target: TargetId) -> &'static str {
    match target {
        TargetId::Weather => weather::HEADER,
        TargetId::AirQuality => aqi::HEADER,
    }
}

/// Route a response body to the formatter of its target.
pub fn format_body(target: TargetId, body: &str, city: &CityQuery) -> Report {
    match target {
        TargetId::Weather => weather::format(body, city),
        TargetId::AirQuality => aqi::format(body, city),
    }
}

/// The "not available" line used when no body could be obtained.
pub fn unavailable(target: TargetId, city: &CityQuery) -> Report {
    let text = match target {
        TargetId::Weather => weather::unavailable(city),
        TargetId::AirQuality => aqi::unavailable(city),
    };
    Report::Unavailable(text)
}
