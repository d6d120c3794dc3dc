//! View state for the weather screen: the location input, loading and error flags,
//! fetched data, the selected day, and pending user notifications.

use tracing::{info, warn};

use crate::{
    error::ErrorState,
    forecast::{self, ChartPoint, DaySummary, GroupedForecast},
    model::{CurrentWeather, ForecastEntry, LocationQuery},
    provider::{WeatherProvider, fetch_weather},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message for the user, shown once and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct WeatherController<P> {
    provider: P,
    location: String,
    current: Option<CurrentWeather>,
    forecast: Vec<ForecastEntry>,
    error: Option<ErrorState>,
    loading: bool,
    theme: Theme,
    selected_day: Option<Vec<ForecastEntry>>,
    notifications: Vec<Notification>,
}

impl<P: WeatherProvider> WeatherController<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            location: String::new(),
            current: None,
            forecast: Vec::new(),
            error: None,
            loading: false,
            theme: Theme::default(),
            selected_day: None,
            notifications: Vec::new(),
        }
    }

    pub fn set_location(&mut self, input: impl Into<String>) {
        self.location = input.into();
    }

    pub async fn submit_query(&mut self, input: impl Into<String>) {
        self.set_location(input);
        self.submit().await;
    }

    /// Validate the stored location and run the fetch sequence.
    ///
    /// Submissions on one controller never overlap. `loading` is cleared on every path,
    /// including when the returned future is dropped before it completes.
    pub async fn submit(&mut self) {
        let query = match LocationQuery::parse(&self.location) {
            Ok(q) => q,
            Err(err) => {
                warn!("rejected empty location");
                self.error = Some(err.into());
                self.notify(NotificationLevel::Error, "Enter a valid city name!");
                return;
            }
        };

        self.notify(NotificationLevel::Info, "Fetching weather data...");

        let result = {
            let _loading = LoadingGuard::raise(&mut self.loading);
            fetch_weather(&self.provider, &query).await
        };

        match result {
            Ok(report) => {
                let message = format!(
                    "Weather data for {}, {} loaded successfully!",
                    report.current.name, report.current.country
                );
                self.current = Some(report.current);
                self.forecast = report.forecast;
                self.error = None;
                self.notify(NotificationLevel::Success, message);
            }
            Err(err) => {
                warn!(%query, error = %err, "weather fetch failed");
                self.current = None;
                self.forecast.clear();
                self.error = Some(ErrorState::from(&err));
                self.notify(NotificationLevel::Error, "Failed to fetch weather data!");
            }
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn grouped_forecast(&self) -> GroupedForecast {
        forecast::group_by_day(&self.forecast)
    }

    pub fn day_cards(&self) -> Vec<DaySummary> {
        forecast::day_summaries(&self.grouped_forecast())
    }

    /// Show the detail view for `date`. Returns `false`, leaving the selection as it was,
    /// when the forecast has no such day.
    pub fn select_day(&mut self, date: &str) -> bool {
        match self.grouped_forecast().get(date) {
            Some(entries) => {
                info!(date, samples = entries.len(), "day selected");
                self.selected_day = Some(entries.to_vec());
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.selected_day = None;
    }

    pub fn selected_series(&self) -> Option<Vec<ChartPoint>> {
        self.selected_day.as_deref().map(forecast::to_chart_series)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &[ForecastEntry] {
        &self.forecast
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|e| e.message())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn selected_day(&self) -> Option<&[ForecastEntry]> {
        self.selected_day.as_deref()
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification { level, message: message.into() });
    }
}

/// Holds the loading flag up for as long as it lives.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
