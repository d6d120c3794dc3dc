use skyview_core::{
    ChartPoint, CurrentWeather, DaySummary, Notification, NotificationLevel, Theme,
    forecast::long_date_label, model::capitalize_first,
};

pub fn header(theme: Theme) -> String {
    let toggle = match theme {
        Theme::Light => "🌙 Dark Mode",
        Theme::Dark => "🌞 Light Mode",
    };
    format!("🌤️  SkyView  [{toggle}]")
}

pub fn notification(note: &Notification) -> String {
    let tag = match note.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => " ok ",
        NotificationLevel::Error => "fail",
    };
    format!("[{tag}] {}", note.message)
}

pub fn current(weather: &CurrentWeather) -> String {
    let mut lines = vec![
        format!("{}, {}", weather.name, weather.country),
        format!("  🌡️  {}°C", weather.temp),
    ];
    if let Some(condition) = weather.primary_condition() {
        lines.push(format!("  {}", capitalize_first(&condition.description)));
    }
    lines.extend([
        format!("  💧 Humidity:    {}%", weather.humidity),
        format!("  💨 Wind Speed:  {} m/s", weather.wind_speed),
        format!("  🔵 Pressure:    {} hPa", weather.pressure),
        format!("  ☁️  Cloudiness:  {}%", weather.cloudiness),
        format!("  👁  Visibility:  {} km", weather.visibility),
    ]);
    block(lines)
}

pub fn day_card(card: &DaySummary) -> String {
    format!(
        "{:<12} {:>4}°C  {}",
        card.label,
        card.temp_rounded,
        card.main.as_deref().unwrap_or("-")
    )
}

pub fn day_cards(cards: &[DaySummary]) -> String {
    let mut lines = vec!["📅 5-Day Forecast".to_string()];
    lines.extend(cards.iter().map(|card| format!("  {}", day_card(card))));
    block(lines)
}

/// Detail view for one day; one row per 3-hour sample.
pub fn series(date: &str, points: &[ChartPoint]) -> String {
    let mut lines = vec![
        format!("Detailed Forecast for {}", long_date_label(date)),
        format!(
            "  {:<5}  {:>8}  {:>8}  {:>9}  {:>9}  {:>6}",
            "time", "temp °C", "hum %", "hPa", "wind m/s", "cloud%"
        ),
    ];
    lines.extend(points.iter().map(|p| {
        format!(
            "  {:<5}  {:>8.1}  {:>8.0}  {:>9.0}  {:>9.1}  {:>6.0}",
            p.time, p.temp, p.humidity, p.pressure, p.wind_speed, p.cloudiness
        )
    }));
    block(lines)
}

/// Newline-terminated block of lines.
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
