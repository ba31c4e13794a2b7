//! Current weather from OpenWeatherMap.

use anyhow::{Context, Result};
use async_trait::async_trait;
use services::weather::{WeatherClient, WeatherReport, API_KEY_ENV};
use shared::handler::Handler;
use shared::settings::WeatherSettings;
use std::sync::Arc;

use super::args_after;
use crate::registry::HandlerEnv;

pub const ID: &str = "weather";

pub fn build(env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(Weather::new(env.settings.weather.clone()))
}

pub struct Weather {
    settings: WeatherSettings,
    /// Used when `settings.api_key` is empty
    fallback_key: Option<String>,
}

impl Weather {
    /// Falls back to the key in `OPENWEATHER_API_KEY`.
    pub fn new(settings: WeatherSettings) -> Self {
        Self::with_fallback_key(settings, std::env::var(API_KEY_ENV).ok())
    }

    pub fn with_fallback_key(settings: WeatherSettings, fallback_key: Option<String>) -> Self {
        Self {
            settings,
            fallback_key,
        }
    }

    /// "počasie v Košiciach" names the city; otherwise the configured default.
    fn city_for<'a>(&'a self, command: &'a str) -> &'a str {
        args_after(command, "v")
            .and_then(|args| args.first().copied())
            .map(|c| c.trim_end_matches(|ch: char| !ch.is_alphanumeric()))
            .filter(|c| !c.is_empty())
            .unwrap_or(self.settings.default_city.as_str())
    }

    fn unit_symbol(&self) -> &'static str {
        match self.settings.units.as_str() {
            "imperial" => "°F",
            "standard" => "K",
            _ => "°C",
        }
    }
}

fn format_report(report: &WeatherReport, unit: &str) -> String {
    let mut out = format!(
        "🌤️ **Počasie v {}:**\n- Teplota: {:.1}{}",
        report.city, report.temperature, unit
    );
    if let Some(feels) = report.feels_like {
        out.push_str(&format!(" (pocitovo {:.1}{})", feels, unit));
    }
    out.push_str(&format!(
        "\n- Vlhkosť: {}%\n- Stav: {}",
        report.humidity, report.description
    ));
    if let Some(wind) = report.wind_speed {
        out.push_str(&format!("\n- Vietor: {:.1} m/s", wind));
    }
    out
}

#[async_trait]
impl Handler for Weather {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Počasie"
    }

    fn description(&self) -> &'static str {
        "Aktuálne počasie pre zadané mesto"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "počasie",
            "predpoveď počasia",
            "teplota",
            "vlhkosť",
            "dnes počasia",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        let city = self.city_for(command);
        let client = WeatherClient::with_fallback_key(&self.settings, self.fallback_key.clone())?;
        let report = client
            .current(city)
            .await
            .with_context(|| format!("počasie pre {}", city))?;
        Ok(format_report(&report, self.unit_symbol()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModuleRegistry;
    use crate::router::{CommandRouter, ResponseSource};
    use shared::agent_api::{ChatMessage, ChatModel};

    fn weather() -> Weather {
        Weather::with_fallback_key(WeatherSettings::default(), None)
    }

    #[test]
    fn test_city_from_command() {
        let w = weather();
        assert_eq!(w.city_for("aké je počasie v Košiciach?"), "Košiciach");
        assert_eq!(w.city_for("Počasie V Prahe"), "Prahe");
    }

    #[test]
    fn test_city_defaults() {
        let w = weather();
        assert_eq!(w.city_for("aké je dnes počasie"), "Bratislava");
        assert_eq!(w.city_for("počasie v"), "Bratislava");
    }

    #[test]
    fn test_format_report() {
        let report = WeatherReport {
            city: "Bratislava".into(),
            temperature: 21.46,
            feels_like: Some(20.0),
            humidity: 55,
            description: "jasná obloha".into(),
            wind_speed: None,
        };
        let text = format_report(&report, "°C");
        assert!(text.contains("Počasie v Bratislava"));
        assert!(text.contains("Teplota: 21.5°C (pocitovo 20.0°C)"));
        assert!(text.contains("Vlhkosť: 55%"));
        assert!(!text.contains("Vietor"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_error() {
        let err = weather().handle("počasie v Nitre").await.unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[tokio::test]
    async fn test_missing_api_key_reply_through_router() {
        struct NoModel;

        #[async_trait]
        impl ChatModel for NoModel {
            async fn generate(&self, _messages: Vec<ChatMessage>) -> anyhow::Result<String> {
                anyhow::bail!("model should not be called")
            }
        }

        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(weather()));
        let mut router = CommandRouter::new(registry, Arc::new(NoModel));

        let response = router.process("aké je počasie v Žiline").await;
        assert!(response.is_error);
        assert!(response.text.starts_with('❌'), "{}", response.text);
        assert!(response.text.contains(API_KEY_ENV));
        assert_eq!(response.source, ResponseSource::Module(ID.into()));
    }

    #[test]
    fn test_unit_symbol() {
        let mut settings = WeatherSettings::default();
        settings.units = "imperial".into();
        assert_eq!(Weather::with_fallback_key(settings, None).unit_symbol(), "°F");
        assert_eq!(weather().unit_symbol(), "°C");
    }
}
