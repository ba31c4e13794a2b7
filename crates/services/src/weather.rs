//! OpenWeatherMap current-weather client.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use shared::settings::WeatherSettings;
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
});

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub description: String,
    pub wind_speed: Option<f64>,
}

pub struct WeatherClient {
    http: Client,
    api_key: String,
    units: String,
    lang: String,
}

impl WeatherClient {
    /// Key from settings, then `OPENWEATHER_API_KEY`.
    pub fn from_settings(settings: &WeatherSettings) -> Result<Self> {
        Self::with_fallback_key(settings, std::env::var(API_KEY_ENV).ok())
    }

    /// Key from settings, then `fallback_key`. No usable key is an error.
    pub fn with_fallback_key(
        settings: &WeatherSettings,
        fallback_key: Option<String>,
    ) -> Result<Self> {
        let api_key = Some(settings.api_key.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                fallback_key
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
            })
            .ok_or_else(|| {
                anyhow!(
                    "chýba API kľúč pre OpenWeatherMap (weather.api_key alebo {})",
                    API_KEY_ENV
                )
            })?;

        Ok(Self {
            http: SHARED_HTTP.clone(),
            api_key,
            units: settings.units.clone(),
            lang: settings.lang.clone(),
        })
    }

    pub async fn current(&self, city: &str) -> Result<WeatherReport> {
        let resp = self
            .http
            .get(BASE_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .context("weather request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("weather API error: {}", status);
        }
        let body = resp.text().await?;
        parse_report(&body)
    }
}

pub fn parse_report(body: &str) -> Result<WeatherReport> {
    let raw: OwmResponse =
        serde_json::from_str(body).context("unexpected weather API response")?;
    Ok(WeatherReport {
        city: raw.name,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        humidity: raw.main.humidity,
        description: raw
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default(),
        wind_speed: raw.wind.map(|w| w.speed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let body = r#"{
            "name": "Košice",
            "main": {"temp": 12.4, "feels_like": 10.9, "humidity": 81},
            "weather": [{"description": "slabý dážď"}],
            "wind": {"speed": 3.6}
        }"#;

        let report = parse_report(body).unwrap();
        assert_eq!(report.city, "Košice");
        assert_eq!(report.humidity, 81);
        assert_eq!(report.description, "slabý dážď");
        assert_eq!(report.wind_speed, Some(3.6));
    }

    #[test]
    fn test_parse_report_rejects_error_body() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        assert!(parse_report(body).is_err());
    }

    #[test]
    fn test_key_from_settings_wins() {
        let settings = WeatherSettings {
            api_key: "abc".into(),
            ..WeatherSettings::default()
        };
        let client = WeatherClient::with_fallback_key(&settings, Some("env".into())).unwrap();
        assert_eq!(client.api_key, "abc");
        assert_eq!(client.units, "metric");
    }

    #[test]
    fn test_fallback_key_used_when_settings_empty() {
        let client =
            WeatherClient::with_fallback_key(&WeatherSettings::default(), Some("env".into()))
                .unwrap();
        assert_eq!(client.api_key, "env");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let settings = WeatherSettings {
            api_key: "   ".into(),
            ..WeatherSettings::default()
        };
        let err = WeatherClient::with_fallback_key(&settings, None)
            .err()
            .unwrap();
        assert!(err.to_string().contains(API_KEY_ENV));
        assert!(WeatherClient::with_fallback_key(&settings, Some(String::new())).is_err());
    }
}
