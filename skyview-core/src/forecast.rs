//! Shapes the flat 3-hour forecast list for display: per-day buckets, day summary
//! cards, and the series plotted for a selected day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::ForecastEntry;

/// Entries sharing one calendar day, in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub date: String,
    pub entries: Vec<ForecastEntry>,
}

/// Forecast partitioned by day. Days iterate in the order they first appear in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedForecast {
    groups: Vec<DayGroup>,
}

impl GroupedForecast {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<&[ForecastEntry]> {
        self.groups
            .iter()
            .find(|g| g.date == date)
            .map(|g| g.entries.as_slice())
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.date.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayGroup> {
        self.groups.iter()
    }
}

impl<'a> IntoIterator for &'a GroupedForecast {
    type Item = &'a DayGroup;
    type IntoIter = std::slice::Iter<'a, DayGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// One point of the selected-day chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: String,
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub cloudiness: f64,
}

/// What a day card shows; taken from the day's first sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub label: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub main: Option<String>,
    pub temp_rounded: i64,
}

pub fn group_by_day(entries: &[ForecastEntry]) -> GroupedForecast {
    let mut groups: Vec<DayGroup> = Vec::new();

    for entry in entries {
        let day = entry.day();
        // Forecasts are chronological, so the match is almost always the last group.
        match groups.iter_mut().rev().find(|g| g.date == day) {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(DayGroup {
                date: day.to_string(),
                entries: vec![entry.clone()],
            }),
        }
    }

    GroupedForecast { groups }
}

pub fn to_chart_series(entries: &[ForecastEntry]) -> Vec<ChartPoint> {
    entries
        .iter()
        .map(|e| ChartPoint {
            time: e.time_of_day().to_string(),
            temp: e.main.temp,
            humidity: e.main.humidity,
            pressure: e.main.pressure,
            wind_speed: e.wind.speed,
            cloudiness: e.clouds.all,
        })
        .collect()
}

pub fn summarize_day(date: &str, entries: &[ForecastEntry]) -> Option<DaySummary> {
    let first = entries.first()?;
    let condition = first.primary_condition();

    Some(DaySummary {
        date: date.to_string(),
        label: day_label(date),
        icon: condition.map(|c| c.icon.clone()),
        description: condition.map(|c| c.description.clone()),
        main: condition.map(|c| c.main.clone()),
        temp_rounded: round_half_up(first.main.temp),
    })
}

/// Rounds halves towards positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn day_summaries(grouped: &GroupedForecast) -> Vec<DaySummary> {
    grouped
        .iter()
        .filter_map(|g| summarize_day(&g.date, &g.entries))
        .collect()
}

/// Short card label, e.g. "Mon, Jan 15". Unparseable dates are returned unchanged.
pub fn day_label(date: &str) -> String {
    parse_day(date).map_or_else(|| date.to_string(), |d| d.format("%a, %b %-d").to_string())
}

/// Heading for the detail view, e.g. "Mon Jan 15 2024".
pub fn long_date_label(date: &str) -> String {
    parse_day(date).map_or_else(|| date.to_string(), |d| d.format("%a %b %d %Y").to_string())
}

fn parse_day(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
