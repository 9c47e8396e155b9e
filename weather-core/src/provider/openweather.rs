use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::DEFAULT_BASE_URL,
    model::{ConditionCategory, WeatherReading},
};

use super::{LookupError, WeatherProvider};

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn current(&self, query: &str) -> Result<WeatherReading, LookupError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(LookupError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::transport)?;
        debug!(status = status.as_u16(), "OpenWeather responded");

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Map a current-conditions body into a reading. Values are carried over
/// without rounding or unit conversion.
fn parse_current(body: &str) -> Result<WeatherReading, LookupError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Parse("response contained no weather entries".into()))?;

    if parsed.main.humidity > 100 {
        return Err(LookupError::Parse(format!(
            "humidity out of range: {}",
            parsed.main.humidity
        )));
    }

    Ok(WeatherReading {
        temperature_celsius: parsed.main.temp,
        condition_description: weather.description,
        condition_category: ConditionCategory::from_provider(&weather.main),
        humidity_percent: parsed.main.humidity,
        wind_speed_kmh: parsed.wind.speed,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_weather_entry() {
        let body = r#"{
            "main": {"temp": 21.4, "humidity": 55},
            "weather": [
                {"main": "Rain", "description": "light rain"},
                {"main": "Mist", "description": "mist"}
            ],
            "wind": {"speed": 12.3}
        }"#;

        let reading = parse_current(body).expect("valid body");
        assert_eq!(
            reading,
            WeatherReading {
                temperature_celsius: 21.4,
                condition_description: "light rain".into(),
                condition_category: ConditionCategory::Rain,
                humidity_percent: 55,
                wind_speed_kmh: 12.3,
            }
        );
    }

    #[test]
    fn temperature_keeps_full_precision() {
        let body = r#"{"main":{"temp":-3.456789,"humidity":90},
            "weather":[{"main":"Snow","description":"snow"}],"wind":{"speed":0.51}}"#;

        let reading = parse_current(body).unwrap();
        assert_eq!(reading.temperature_celsius, -3.456789);
        assert_eq!(reading.wind_speed_kmh, 0.51);
    }

    #[test]
    fn empty_weather_array_is_rejected() {
        let body = r#"{"main":{"temp":1.0,"humidity":10},"weather":[],"wind":{"speed":1.0}}"#;
        assert!(matches!(parse_current(body), Err(LookupError::Parse(_))));
    }

    #[test]
    fn missing_wind_is_rejected() {
        let body = r#"{"main":{"temp":1.0,"humidity":10},"weather":[{"main":"Clear","description":"clear sky"}]}"#;
        assert!(matches!(parse_current(body), Err(LookupError::Parse(_))));
    }

    #[test]
    fn humidity_above_hundred_is_rejected() {
        let body = r#"{"main":{"temp":1.0,"humidity":140},"weather":[{"main":"Clear","description":"clear sky"}],"wind":{"speed":1.0}}"#;
        assert!(matches!(parse_current(body), Err(LookupError::Parse(_))));
    }

    #[test]
    fn truncate_body_limits_long_payloads() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = OpenWeatherProvider::new("SECRET".into());
        assert!(!format!("{provider:?}").contains("SECRET"));
    }
}
