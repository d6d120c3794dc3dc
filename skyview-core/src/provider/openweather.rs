use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    Config,
    error::FetchError,
    model::{
        CurrentConditions, ForecastClouds, ForecastEntry, ForecastMain, ForecastWind,
        GeocodeResult, LocationQuery, WeatherCondition,
    },
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    geo_base_url: String,
    api_base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Uses the base URLs and optional timeout from `config`. Without a timeout a stalled
    /// upstream stalls the whole fetch.
    pub fn from_config(api_key: String, config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            geo_base_url: trim_base(&config.geo_base_url),
            api_base_url: trim_base(&config.api_base_url),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        debug!(endpoint, url, "sending OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    lat: f64,
    lon: f64,
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    /// Metres; the provider omits it for some stations.
    #[serde(default)]
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwWeather> for WeatherCondition {
    fn from(w: OwWeather) -> Self {
        Self { description: w.description, icon: w.icon, main: w.main }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(e: OwForecastEntry) -> Self {
        Self {
            dt_txt: e.dt_txt,
            main: ForecastMain { temp: e.main.temp, humidity: e.main.humidity, pressure: e.main.pressure },
            weather: e.weather.into_iter().map(Into::into).collect(),
            wind: ForecastWind { speed: e.wind.speed },
            clouds: ForecastClouds { all: e.clouds.all },
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &LocationQuery) -> Result<Vec<GeocodeResult>, FetchError> {
        let url = format!("{}/geo/1.0/direct", self.geo_base_url);
        let parsed: Vec<OwGeocode> = self
            .get_json("geocode", &url, &[("q", query.as_str()), ("limit", "1")])
            .await?;

        Ok(parsed
            .into_iter()
            .map(|g| GeocodeResult { lat: g.lat, lon: g.lon, name: g.name, country: g.country })
            .collect())
    }

    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, FetchError> {
        let url = format!("{}/data/2.5/weather", self.api_base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let parsed: OwCurrentResponse = self
            .get_json("current", &url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")])
            .await?;

        Ok(CurrentConditions {
            temp: parsed.main.temp,
            humidity: parsed.main.humidity,
            weather: parsed.weather.into_iter().map(Into::into).collect(),
            wind_speed: parsed.wind.speed,
            pressure: parsed.main.pressure,
            cloudiness: parsed.clouds.all,
            visibility_m: parsed.visibility,
        })
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>, FetchError> {
        let url = format!("{}/data/2.5/forecast", self.api_base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let parsed: OwForecastResponse = self
            .get_json("forecast", &url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")])
            .await?;

        Ok(parsed.list.into_iter().map(Into::into).collect())
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
