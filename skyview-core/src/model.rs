use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A location string as typed by the user, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// First match returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
    pub main: String,
}

impl WeatherCondition {
    /// Provider icon URL, `size` being the density multiplier (2 for cards, 4 for the main card).
    pub fn icon_url(&self, size: u8) -> String {
        format!("https://openweathermap.org/img/wn/{}@{}x.png", self.icon, size)
    }
}

/// Current conditions as the provider reports them, before the geocoded name is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: f64,
    pub humidity: f64,
    pub weather: Vec<WeatherCondition>,
    pub wind_speed: f64,
    pub pressure: f64,
    pub cloudiness: f64,
    pub visibility_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub country: String,
    pub temp: f64,
    pub humidity: f64,
    pub weather: Vec<WeatherCondition>,
    pub wind_speed: f64,
    pub pressure: f64,
    pub cloudiness: f64,
    /// Kilometres.
    pub visibility: f64,
}

impl CurrentWeather {
    pub fn from_conditions(place: &GeocodeResult, conditions: CurrentConditions) -> Self {
        Self {
            name: place.name.clone(),
            country: place.country.clone(),
            temp: conditions.temp,
            humidity: conditions.humidity,
            weather: conditions.weather,
            wind_speed: conditions.wind_speed,
            pressure: conditions.pressure,
            cloudiness: conditions.cloudiness,
            visibility: conditions.visibility_m / 1000.0,
        }
    }

    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastWind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastClouds {
    pub all: f64,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub wind: ForecastWind,
    pub clouds: ForecastClouds,
}

impl ForecastEntry {
    /// Calendar day, the part of `dt_txt` before the first space.
    pub fn day(&self) -> &str {
        self.dt_txt
            .split_once(' ')
            .map_or(self.dt_txt.as_str(), |(day, _)| day)
    }

    /// Up to five characters of `dt_txt` starting at offset 11 (`HH:MM`). A truncated
    /// timestamp yields whatever part of the time is present.
    pub fn time_of_day(&self) -> &str {
        let rest = self.dt_txt.get(11..).unwrap_or("");
        match rest.char_indices().nth(5) {
            Some((end, _)) => &rest[..end],
            None => rest,
        }
    }

    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }
}

/// Everything a successful fetch produces; replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastEntry>,
}

/// Uppercases the first character, as the current-conditions card does with descriptions.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
