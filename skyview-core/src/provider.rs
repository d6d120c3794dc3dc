use crate::{
    Config,
    error::FetchError,
    model::{CurrentConditions, CurrentWeather, ForecastEntry, GeocodeResult, LocationQuery, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub mod openweather;

/// The three upstream calls the fetch sequence is built from.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a place name; only the first result is ever used.
    async fn geocode(&self, query: &LocationQuery) -> Result<Vec<GeocodeResult>, FetchError>;

    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, FetchError>;

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// Geocode, then current conditions, then forecast. Each step needs the one before it,
/// and any failure discards whatever was already fetched.
pub async fn fetch_weather<P>(provider: &P, query: &LocationQuery) -> Result<WeatherReport, FetchError>
where
    P: WeatherProvider + ?Sized,
{
    debug!(%query, "geocoding location");
    let place = provider
        .geocode(query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            warn!(%query, "geocoding returned no matches");
            FetchError::LocationNotFound(query.to_string())
        })?;

    debug!(name = %place.name, lat = place.lat, lon = place.lon, "fetching current conditions");
    let conditions = provider.current(place.lat, place.lon).await?;
    let current = CurrentWeather::from_conditions(&place, conditions);

    debug!(name = %place.name, "fetching forecast");
    let forecast = provider.forecast(place.lat, place.lon).await?;

    info!(
        name = %current.name,
        country = %current.country,
        entries = forecast.len(),
        "weather data loaded"
    );

    Ok(WeatherReport { current, forecast })
}

/// Build the OpenWeather provider from config, failing early when no API key is available.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.require_api_key()?;
    OpenWeatherProvider::from_config(api_key.to_owned(), config)
}
