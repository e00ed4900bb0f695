use super::dto::Units;
use super::helpers::build_url;
use crate::config::ProviderConfig;
use crate::error::{Result, WeatherError};
use serde_json::Value;
use std::time::Duration;

/// Fetcher for the OpenWeather API. One outbound GET per call, fixed
/// timeout, no retries; the caller decides what to do with failures.
#[derive(Clone)]
pub struct OpenWeatherTools {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherTools {
    pub fn new(provider: &ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(provider.timeout_secs))
            .user_agent("Weather-MCP/0.1.0")
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            http,
            base_url: provider.base_url.clone(),
            api_key: provider.api_key.clone(),
        }
    }

    /// GET `<base>/<path>` with the given query parameters plus the API key.
    /// 2xx yields parsed JSON; anything else is an Upstream error carrying
    /// the status and body.
    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = build_url(&self.base_url, &[path]);
        let mut query: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        query.push(("appid", self.api_key.as_str()));

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Upstream {} failed with {}: {}", path, status, truncate(&body));
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>().await.map_err(WeatherError::Transport)
    }

    pub async fn current_by_city(&self, location: &str, units: Units) -> Result<Value> {
        self.fetch(
            "weather",
            &[
                ("q", location.to_string()),
                ("units", units.api_value().to_string()),
            ],
        )
        .await
    }

    pub async fn current_by_coords(&self, lat: f64, lon: f64, units: Units) -> Result<Value> {
        self.fetch(
            "weather",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.api_value().to_string()),
            ],
        )
        .await
    }

    pub async fn forecast(&self, location: &str, units: Units) -> Result<Value> {
        self.fetch(
            "forecast",
            &[
                ("q", location.to_string()),
                ("units", units.api_value().to_string()),
            ],
        )
        .await
    }

    /// One-call lookup restricted to the alerts section.
    pub async fn alerts(&self, lat: f64, lon: f64) -> Result<Value> {
        self.fetch(
            "onecall",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("exclude", "current,minutely,hourly,daily".to_string()),
            ],
        )
        .await
    }
}

fn truncate(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        &body[..end]
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_caps_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
        assert_eq!(truncate("short"), "short");
    }
}
