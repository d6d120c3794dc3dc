use std::fmt;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use skyview_core::{
    Config, DaySummary, OpenWeatherProvider, WeatherController, provider_from_config,
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// Log request steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the daily forecast cards for a location.
    Show {
        /// City or place name.
        location: String,
    },

    /// Show the 3-hour detail of one forecast day.
    Day {
        /// City or place name.
        location: String,

        /// Day to show, YYYY-MM-DD.
        date: NaiveDate,
    },

    /// Browse interactively: search, pick a day, toggle the theme.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => {
                let mut controller = load_controller()?;
                fetch(&mut controller, location).await?;

                if let Some(current) = controller.current() {
                    println!("{}", render::current(current));
                }
                let cards = controller.day_cards();
                if !cards.is_empty() {
                    print!("{}", render::day_cards(&cards));
                }
                Ok(())
            }
            Command::Day { location, date } => {
                let mut controller = load_controller()?;
                fetch(&mut controller, location).await?;

                let day = date.format("%Y-%m-%d").to_string();
                if !controller.select_day(&day) {
                    let available: Vec<String> =
                        controller.grouped_forecast().dates().map(str::to_owned).collect();
                    bail!("No forecast for {day}. Available days: {}", available.join(", "));
                }
                if let Some(points) = controller.selected_series() {
                    print!("{}", render::series(&day, &points));
                }
                Ok(())
            }
            Command::Interactive => {
                let controller = load_controller()?;
                interactive(controller).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn load_controller() -> anyhow::Result<WeatherController<OpenWeatherProvider>> {
    let config = Config::load_with_env()?;
    let provider = provider_from_config(&config)?;
    Ok(WeatherController::new(provider))
}

/// Submit `location` and fail the command with the inline message if the fetch failed.
async fn fetch(
    controller: &mut WeatherController<OpenWeatherProvider>,
    location: String,
) -> anyhow::Result<()> {
    controller.submit_query(location).await;
    flush_notifications(controller);

    match controller.error_message() {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

fn flush_notifications(controller: &mut WeatherController<OpenWeatherProvider>) {
    for note in controller.take_notifications() {
        eprintln!("{}", render::notification(&note));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    PickDay,
    CloseDetail,
    ToggleTheme,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search a location",
            Action::PickDay => "Show a forecast day",
            Action::CloseDetail => "Close detail",
            Action::ToggleTheme => "Toggle theme",
            Action::Quit => "Quit",
        })
    }
}

fn available_actions(has_forecast: bool, has_selection: bool) -> Vec<Action> {
    let mut actions = vec![Action::Search];
    if has_forecast {
        actions.push(Action::PickDay);
    }
    if has_selection {
        actions.push(Action::CloseDetail);
    }
    actions.extend([Action::ToggleTheme, Action::Quit]);
    actions
}

struct DayChoice(DaySummary);

impl fmt::Display for DayChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::day_card(&self.0))
    }
}

/// `None` when the user cancelled the prompt with Esc or Ctrl-C.
fn cancelled<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn interactive(mut controller: WeatherController<OpenWeatherProvider>) -> anyhow::Result<()> {
    loop {
        println!("\n{}", render::header(controller.theme()));
        if let Some(message) = controller.error_message() {
            println!("⚠ {message}");
        }
        if let Some(current) = controller.current() {
            println!("{}", render::current(current));
        }
        if let (Some(entries), Some(points)) = (controller.selected_day(), controller.selected_series()) {
            if let Some(first) = entries.first() {
                println!("{}", render::series(first.day(), &points));
            }
        }

        let actions = available_actions(!controller.forecast().is_empty(), controller.selected_day().is_some());
        let Some(action) = cancelled(Select::new("What next?", actions).prompt())? else {
            break;
        };
        debug!(%action, "menu action");

        match action {
            Action::Search => {
                let prompt = Text::new("Location:").with_initial_value(controller.location()).prompt();
                if let Some(location) = cancelled(prompt)? {
                    controller.submit_query(location).await;
                    flush_notifications(&mut controller);
                }
            }
            Action::PickDay => {
                let cards: Vec<DayChoice> = controller.day_cards().into_iter().map(DayChoice).collect();
                if let Some(choice) = cancelled(Select::new("Forecast day:", cards).prompt())? {
                    controller.select_day(&choice.0.date);
                }
            }
            Action::CloseDetail => controller.close_detail(),
            Action::ToggleTheme => {
                controller.toggle_theme();
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
