//! Core library for the `skyview` weather client.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeather fetch sequence (geocode → current → forecast)
//! - Forecast grouping and chart series shaping
//! - The view-state controller driving a weather screen
//!
//! It is used by `skyview-cli`, but can also be embedded in other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{Notification, NotificationLevel, Theme, WeatherController};
pub use error::{ErrorState, FetchError, QueryError};
pub use forecast::{ChartPoint, DayGroup, DaySummary, GroupedForecast, group_by_day, to_chart_series};
pub use model::{CurrentWeather, ForecastEntry, GeocodeResult, LocationQuery, WeatherReport};
pub use provider::{WeatherProvider, fetch_weather, openweather::OpenWeatherProvider, provider_from_config};
