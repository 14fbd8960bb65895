use crate::{city::CityQuery, model::WeatherObservation};

use super::Report;

pub const HEADER: &str = "WEATHER:";

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - 273.15) * 9.0 / 5.0 + 32.0
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * 2.237
}

pub fn render(obs: &WeatherObservation) -> String {
    format!(
        "City: {}, Country: {}\n\
         Description: {}\n\
         Humidity(chance of rain): {}%\n\
         Current temp: {:.1}F\n\
         Min temp: {:.1}F\n\
         Max temp: {:.1}F\n\
         Wind speed: {:.1}mph",
        obs.city,
        obs.country,
        obs.description,
        obs.humidity_pct,
        kelvin_to_fahrenheit(obs.temp_k),
        kelvin_to_fahrenheit(obs.temp_min_k),
        kelvin_to_fahrenheit(obs.temp_max_k),
        mps_to_mph(obs.wind_speed_mps),
    )
}

pub fn unavailable(city: &CityQuery) -> String {
    format!("Weather data is not available for: {}", city.display())
}

/// Turn a weather response body into a report, falling back to the
/// "not available" line when the body is not a usable payload.
pub fn format(body: &str, city: &CityQuery) -> Report {
    match WeatherObservation::from_json(body) {
        Ok(obs) => Report::Data(render(&obs)),
        Err(err) => {
            tracing::debug!(%err, "weather payload rejected");
            Report::Unavailable(unavailable(city))
        }
    }
}
