//! Connectivity checks and HTTP checks.

use anyhow::Result;
use async_trait::async_trait;
use services::web_check::{self, Connectivity};
use shared::handler::{contains_any, Handler};
use std::sync::Arc;

use super::args_after_any;
use crate::registry::HandlerEnv;

pub const ID: &str = "web_tools";

pub fn build(_env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(WebTools)
}

pub struct WebTools;

/// Host named after "ping server" / "webová stránka".
fn site_target(command: &str) -> Option<String> {
    args_after_any(command, &["ping server", "webová stránka", "http status"])
        .first()
        .map(|t| web_check::normalize_url(t))
}

#[async_trait]
impl Handler for WebTools {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Webové nástroje"
    }

    fn description(&self) -> &'static str {
        "Kontrola internetového pripojenia a dostupnosti serverov"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "skontroluj internet",
            "ping server",
            "webová stránka",
            "http status",
            "diagnostika siete",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, &["skontroluj internet"]) {
            Ok(match web_check::check_connectivity().await {
                Connectivity::Online => "✅ Internetové pripojenie je funkčné".to_string(),
                Connectivity::Degraded(status) => format!(
                    "⚠️ Internetové pripojenie môže mať problémy (HTTP {})",
                    status
                ),
                Connectivity::Offline => "❌ Nie je dostupné internetové pripojenie".to_string(),
            })
        } else if contains_any(command, &["diagnostika siete"]) {
            let report = tokio::task::spawn_blocking(web_check::network_diagnostics).await?;
            let mut out = format!("🩺 **{}**", report.summary);
            for line in &report.details {
                out.push_str(&format!("\n- {}", line));
            }
            Ok(out)
        } else {
            let Some(url) = site_target(command) else {
                return Ok("ℹ️ Zadajte URL: 'ping server example.com'".into());
            };
            let result = web_check::check_site(&url).await?;
            Ok(format!(
                "🌐 **Stav servera {}:**\n- HTTP Status: {}\n- Čas odozvy: {:.2}s",
                result.url,
                result.status,
                result.elapsed.as_secs_f64()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_target() {
        assert_eq!(
            site_target("ping server example.com").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            site_target("Webová stránka http://sme.sk").as_deref(),
            Some("http://sme.sk")
        );
        assert_eq!(site_target("ping server"), None);
    }

    #[tokio::test]
    async fn test_missing_target_gives_usage() {
        let out = WebTools.handle("http status").await.unwrap();
        assert!(out.contains("ping server example.com"));
    }
}
