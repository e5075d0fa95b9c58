use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use std::path::PathBuf;
use tracing::{debug, warn};

use forecast_core::{
    AppState, Config, DashboardView, ErrorDialog, ForecastClient, ForecastRequest,
    MAX_FORECAST_DAYS, Session, ThemeController, ThemeStore,
    chart::ChartGeometry,
    inspector,
    map::MapView,
    provider,
    theme::{FileThemeStore, MemoryThemeStore, detect_system_theme},
};

use crate::{
    interactive,
    render::{self, Palette},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    version,
    about = "AI-generated weather forecasts in the terminal"
)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the Gemini API key, model and default location.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// City name; the configured default location if absent.
        location: Option<String>,

        /// Number of days in the daily forecast.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_FORECAST_DAYS)))]
        days: Option<u8>,

        /// Print the raw forecast data as JSON.
        #[arg(long)]
        json: bool,

        /// Write the hourly chart to an SVG file.
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
    },

    /// List active weather alerts for a location.
    Alerts {
        /// City name; the configured default location if absent.
        location: Option<String>,
    },

    /// Ask a question about a location's forecast.
    Ask {
        /// An optional location followed by the question.
        #[arg(required = true, num_args = 1..=2, value_name = "[LOCATION] QUESTION")]
        words: Vec<String>,
    },

    /// Show or toggle the colour theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Open the interactive dashboard.
    Dashboard {
        /// City name; the configured default location if absent.
        location: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                days,
                json,
                svg,
            } => show(location, days, json, svg).await,
            Command::Alerts { location } => alerts(location).await,
            Command::Ask { words } => {
                let (question, rest) = words.split_last().context("A question is required")?;
                ask(rest.first().cloned(), question).await
            }
            Command::Theme { action } => theme(action.unwrap_or(ThemeAction::Show)),
            Command::Dashboard { location } => {
                let config = Config::load()?;
                let session = open_session(&config, location, None)?;
                interactive::run(session).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("Gemini API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    let model = Text::new("Model:")
        .with_default(&config.gemini.model)
        .prompt()?;
    let location = Text::new("Default location:")
        .with_default(&config.default_location)
        .prompt()?;
    config.gemini.model = model.trim().to_string();
    config.default_location = location.trim().to_string();

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(
    location: Option<String>,
    days: Option<u8>,
    json: bool,
    svg: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config, location, days)?;
    let palette = Palette::for_theme(session.state().theme().current());

    load_with_retry(&mut session, &palette).await?;
    let Some(record) = session.state().dashboard() else {
        bail!("No forecast was loaded");
    };

    if json {
        let text = inspector::pretty_json(record)?;
        println!("{}", render::json(&text, &palette));
    } else if let Some(path) = svg {
        let view = DashboardView::build(record, ChartGeometry::default());
        std::fs::write(&path, render::svg_chart(&view.chart))
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        println!("Hourly chart written to {}", path.display());
    } else {
        let view = DashboardView::build(record, ChartGeometry::default());
        print!(
            "{}",
            render::dashboard(&view, &MapView::default(), session.state().fetched_at(), &palette)
        );
    }
    Ok(())
}

async fn alerts(location: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let session = open_session(&config, location, None)?;
    let palette = Palette::for_theme(session.state().theme().current());

    eprintln!("Fetching alerts for {}...", session.state().location());
    match session.alerts().await {
        Ok(alerts) => {
            print!("{}", render::alerts(&alerts, &palette));
            Ok(())
        }
        Err(err) => {
            eprint!("{}", render::error_dialog(&ErrorDialog::for_error(&err), &palette));
            Err(err.into())
        }
    }
}

async fn ask(location: Option<String>, question: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config, location, None)?;
    let palette = Palette::for_theme(session.state().theme().current());

    load_with_retry(&mut session, &palette).await?;
    match session.ask(question).await {
        Ok(answer) => {
            println!("{answer}");
            Ok(())
        }
        Err(err) => {
            eprint!("{}", render::error_dialog(&ErrorDialog::for_error(&err), &palette));
            Err(err.into())
        }
    }
}

fn theme(action: ThemeAction) -> anyhow::Result<()> {
    let mut theme = theme_controller()?;
    match action {
        ThemeAction::Show => println!("{}", theme.current()),
        ThemeAction::Toggle => println!("{}", theme.toggle()?),
    }
    Ok(())
}

/// Load the forecast; on failure show the dialog and offer to re-issue the
/// identical request until the user declines.
async fn load_with_retry(session: &mut Session, palette: &Palette) -> anyhow::Result<()> {
    eprintln!("{}", render::loading_line(session.state().location()));
    session.load().await;

    while let Some(err) = session.state().error().cloned() {
        eprint!("{}", render::error_dialog(&ErrorDialog::for_error(&err), palette));
        if !confirm_retry() {
            return Err(err.into());
        }
        eprintln!("{}", render::loading_line(session.state().location()));
        session.retry().await;
    }
    Ok(())
}

fn confirm_retry() -> bool {
    match Confirm::new("Try again?").with_default(true).prompt() {
        Ok(answer) => answer,
        Err(e) => {
            debug!(error = %e, "retry prompt unavailable");
            false
        }
    }
}

fn open_session(
    config: &Config,
    location: Option<String>,
    days: Option<u8>,
) -> anyhow::Result<Session> {
    let model = provider::model_from_config(config)?;
    let request = ForecastRequest::new(location.unwrap_or_else(|| config.default_location.clone()))
        .with_days(days.unwrap_or(config.forecast_days));

    let state = AppState::new(request, theme_controller()?);
    Ok(Session::new(ForecastClient::new(model), state))
}

fn theme_controller() -> anyhow::Result<ThemeController> {
    let store: Box<dyn ThemeStore> = match FileThemeStore::in_data_dir() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "theme preference will not be saved");
            Box::new(MemoryThemeStore::default())
        }
    };
    ThemeController::init(store, detect_system_theme()).context("Failed to initialise the theme")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_takes_optional_location() {
        let cli = Cli::try_parse_from(["forecast", "ask", "Will it rain?"]).unwrap();
        assert!(matches!(cli.command, Command::Ask { ref words } if words.len() == 1));

        let cli = Cli::try_parse_from(["forecast", "-v", "ask", "Paris", "Will it rain?"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Ask { words } = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(words, ["Paris", "Will it rain?"]);

        assert!(Cli::try_parse_from(["forecast", "ask"]).is_err());
    }

    #[test]
    fn show_flags() {
        let cli = Cli::try_parse_from([
            "forecast", "show", "Oslo", "--days", "3", "--svg", "chart.svg", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Show {
            location,
            days,
            json,
            svg,
        } = cli.command
        else {
            panic!("expected show");
        };
        assert_eq!(location.as_deref(), Some("Oslo"));
        assert_eq!(days, Some(3));
        assert!(!json);
        assert_eq!(svg, Some(PathBuf::from("chart.svg")));

        assert!(Cli::try_parse_from(["forecast", "show", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["forecast", "show", "--days", "15"]).is_err());
    }

    #[test]
    fn theme_action_is_optional() {
        let cli = Cli::try_parse_from(["forecast", "theme"]).unwrap();
        assert!(matches!(cli.command, Command::Theme { action: None }));

        let cli = Cli::try_parse_from(["forecast", "theme", "toggle"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: Some(ThemeAction::Toggle)
            }
        ));
    }
}
