use serde::Deserialize;
use serde_json::Value;

use crate::error::MalformedPayload;

/// Flattened view of an OpenWeatherMap current-weather payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub city: String,
    pub country: String,
    pub description: String,
    pub humidity_pct: i64,
    pub temp_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub wind_speed_mps: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
}

impl WeatherObservation {
    pub fn from_json(body: &str) -> Result<Self, MalformedPayload> {
        let parsed: OwCurrentResponse =
            serde_json::from_str(body).map_err(|e| MalformedPayload::new("weather", e.to_string()))?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| MalformedPayload::new("weather", "empty `weather` array"))?;

        Ok(Self {
            city: parsed.name,
            country: parsed.sys.country,
            description,
            // Whole percent, truncating fractional readings.
            humidity_pct: parsed.main.humidity as i64,
            temp_k: parsed.main.temp,
            temp_min_k: parsed.main.temp_min,
            temp_max_k: parsed.main.temp_max,
            wind_speed_mps: parsed.wind.speed,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaqiData {
    aqi: Value,
}

#[derive(Debug, Deserialize)]
struct WaqiFeedResponse {
    #[serde(default)]
    status: Option<String>,
    data: WaqiData,
}

/// Extract `data.aqi` from a WAQI city feed.
///
/// WAQI reports lookup failures with a 200 and `{"status":"error","data":"..."}`,
/// and stations without a reading with `"aqi": "-"`; both are malformed here.
pub fn parse_aqi(body: &str) -> Result<i64, MalformedPayload> {
    let parsed: WaqiFeedResponse =
        serde_json::from_str(body).map_err(|e| MalformedPayload::new("air quality", e.to_string()))?;

    if let Some(status) = parsed.status.as_deref().filter(|s| *s != "ok") {
        return Err(MalformedPayload::new("air quality", format!("status '{status}'")));
    }

    let aqi = match &parsed.data.aqi {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    aqi.ok_or_else(|| MalformedPayload::new("air quality", format!("unusable aqi {}", parsed.data.aqi)))
}
