use crate::{city::CityQuery, model::parse_aqi};

use super::Report;

pub const HEADER: &str = "AIR QUALITY:";

/// US EPA air quality bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiBand {
    /// `None` for negative values, which carry no meaning.
    pub fn from_index(aqi: i64) -> Option<Self> {
        let band = match aqi {
            i64::MIN..=-1 => return None,
            0..=50 => AqiBand::Good,
            51..=100 => AqiBand::Moderate,
            101..=150 => AqiBand::UnhealthyForSensitiveGroups,
            151..=200 => AqiBand::Unhealthy,
            201..=300 => AqiBand::VeryUnhealthy,
            _ => AqiBand::Hazardous,
        };
        Some(band)
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            AqiBand::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiBand::Moderate => {
                "Air quality is acceptable; however, for some pollutants, there may be a moderate \
                 health concern for a very small number of people who are unusually sensitive to \
                 air pollution."
            }
            AqiBand::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is \
                 not likely to be affected."
            }
            AqiBand::Unhealthy => {
                "Everyone may begin to experience health effects; members of sensitive groups may \
                 experience more serious health effects."
            }
            AqiBand::VeryUnhealthy => {
                "Health warnings of emergency conditions. The entire population is more likely to \
                 be affected."
            }
            AqiBand::Hazardous => {
                "Health alert: everyone may experience more serious health effects."
            }
        }
    }
}

impl std::fmt::Display for AqiBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub const OUT_OF_RANGE: &str = "Air Quality Index data is unavailable for the specified city.";

pub fn unavailable(city: &CityQuery) -> String {
    format!("Air Quality Index data is not available for: {}", city.display())
}

/// Report for an already-extracted AQI value.
pub fn describe(aqi: i64, city: &CityQuery) -> Report {
    match AqiBand::from_index(aqi) {
        Some(band) => Report::Data(format!(
            "Air Quality Index for {} is {}: AQI = {}\n-> {}",
            city.display(),
            band,
            aqi,
            band.advisory()
        )),
        None => Report::Unavailable(OUT_OF_RANGE.to_string()),
    }
}

pub fn format(body: &str, city: &CityQuery) -> Report {
    match parse_aqi(body) {
        Ok(aqi) => describe(aqi, city),
        Err(err) => {
            tracing::debug!(%err, "air quality payload rejected");
            Report::Unavailable(unavailable(city))
        }
    }
}
