//! Current-weather lookup.
//!
//! The lookup never fails from the caller's point of view: any transport or
//! decode problem becomes a fixed apology text.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::Deserialize;

use crate::{
  Result,
  config::WeatherConfig,
  format::escape_html,
  texts::{WEATHER_UNAVAILABLE, WEATHER_UNREADABLE},
};

/// Anything that can describe the current weather as a message body.
pub trait WeatherSource: Send + Sync {
  fn current(&self) -> impl Future<Output = String> + Send + '_;
}

// ─── OpenWeatherMap ──────────────────────────────────────────────────────────

/// The subset of the OpenWeatherMap "current weather" payload we read.
#[derive(Debug, Deserialize)]
struct Payload {
  main:    Main,
  #[serde(default)]
  weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Main {
  temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
  #[serde(default)]
  description: String,
}

/// Render an OpenWeatherMap response body, e.g.
/// `Погода в Барнауле: -3.4°C, пасмурно`.
pub fn render_weather(city_label: &str, body: &str) -> serde_json::Result<String> {
  let payload: Payload = serde_json::from_str(body)?;
  let description = payload
    .weather
    .first()
    .map(|c| c.description.as_str())
    .unwrap_or_default();

  Ok(format!(
    "Погода в {}: {:.1}°C, {}",
    escape_html(city_label),
    payload.main.temp,
    escape_html(description)
  ))
}

/// HTTP client for the OpenWeatherMap current-weather endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenWeather {
  client: Client,
  config: WeatherConfig,
}

impl OpenWeather {
  pub fn new(config: WeatherConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    Ok(Self { client, config })
  }
}

impl WeatherSource for OpenWeather {
  async fn current(&self) -> String {
    let response = self
      .client
      .get(&self.config.url)
      .query(&[
        ("q", self.config.city.as_str()),
        ("units", "metric"),
        ("lang", "ru"),
        ("appid", self.config.api_key.as_str()),
      ])
      .send()
      .await
      .and_then(reqwest::Response::error_for_status);

    let body = match response {
      Ok(r) => r.text().await,
      Err(e) => Err(e),
    };
    let body = match body {
      Ok(b) => b,
      Err(e) => {
        tracing::warn!(error = %e, "weather request failed");
        return WEATHER_UNAVAILABLE.to_string();
      }
    };

    render_weather(&self.config.city_label, &body).unwrap_or_else(|e| {
      tracing::warn!(error = %e, "weather response could not be decoded");
      WEATHER_UNREADABLE.to_string()
    })
  }
}
