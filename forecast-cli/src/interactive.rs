//! The interactive dashboard loop behind `forecast dashboard`.

use anyhow::{Context, Result, anyhow, bail};
use inquire::{InquireError, Text};
use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use forecast_core::{
    DashboardState, DashboardView, ErrorDialog, ForecastRecord, Phase, Session,
    chart::ChartGeometry,
    inspector,
    map::{Control, Overlay},
};

use crate::{clipboard, render::{self, Palette}};

const HELP: &str = "\
Commands:
  search <city>            load the forecast for another location
  overlay <name>           temperature, precipitation, wind speed or events
  zoom in|out [ms]         zoom the map, holding the button for <ms>
  pan up|down|left|right [ms]
                           pan the map, holding the button for <ms>
  hover <x>                show the hourly point nearest to x (0-500)
  json                     open the raw data inspector
  copy                     copy the raw data to the clipboard
  alerts                   list active weather alerts
  ask <question>           ask about the current forecast
  theme                    switch between light and dark
  retry                    repeat the last request after an error
  help                     show this help
  quit                     leave the dashboard";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Search(String),
    Overlay(Overlay),
    Hold(Control, Duration),
    Hover(f64),
    Json,
    Copy,
    Alerts,
    Ask(String),
    Theme,
    Retry,
    Help,
    Quit,
}

impl Input {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let input = match command.to_lowercase().as_str() {
            "" => return Ok(None),
            "search" => Input::Search(rest.to_string()),
            "overlay" => Input::Overlay(rest.parse()?),
            "zoom" | "pan" => {
                let mut words = rest.split_whitespace();
                let direction = words
                    .next()
                    .ok_or_else(|| anyhow!("Usage: {command} <direction> [ms]"))?;
                let control: Control = format!("{command} {direction}").parse()?;
                let held = match words.next() {
                    Some(ms) => ms
                        .parse::<u64>()
                        .with_context(|| format!("'{ms}' is not a duration in milliseconds"))?,
                    None => 0,
                };
                Input::Hold(control, Duration::from_millis(held))
            }
            "hover" => Input::Hover(
                rest.parse()
                    .with_context(|| format!("'{rest}' is not a chart position"))?,
            ),
            "json" | "inspect" => Input::Json,
            "copy" => Input::Copy,
            "alerts" => Input::Alerts,
            "ask" if !rest.is_empty() => Input::Ask(rest.to_string()),
            "ask" => bail!("Usage: ask <question>"),
            "theme" => Input::Theme,
            "retry" => Input::Retry,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => bail!("Unknown command '{other}'. Type `help` for a list of commands."),
        };
        Ok(Some(input))
    }
}

pub async fn run(mut session: Session) -> Result<()> {
    let mut ui = DashboardState::default();

    load(&mut session, &mut ui).await;
    println!("Type `help` for commands.");

    loop {
        let line = match Text::new("forecast>").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read command"),
        };

        let input = match Input::parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        if handle(&mut session, &mut ui, input).await.is_break() {
            break;
        }
    }

    Ok(())
}

/// Apply one command. Failures are reported and the loop carries on.
async fn handle(session: &mut Session, ui: &mut DashboardState, input: Input) -> ControlFlow<()> {
    debug!(?input, "dashboard command");

    if !matches!(input, Input::Json | Input::Copy) {
        ui.close_inspector();
    }

    let palette = Palette::for_theme(session.state().theme().current());
    let mounted = session.state().dashboard().is_some();
    match input {
        Input::Search(query) => {
            ui.search_query = query;
            match ui.submit_search() {
                Some(location) => {
                    println!("{}", render::loading_line(&location));
                    let before = session.state().announcement().map(str::to_owned);
                    session.search(&location).await;
                    unmount_if_failed(session, ui);
                    show_phase(session, ui, before.as_deref());
                }
                None => eprintln!("Usage: search <city>"),
            }
        }
        Input::Overlay(_) | Input::Hold(..) if !mounted => eprintln!("No forecast is loaded."),
        Input::Overlay(overlay) => match ui.select_overlay(overlay) {
            Some(fade) => {
                println!("{}", render::transition(&fade));
                println!("{}", render::map_status(&ui.map(), &palette));
            }
            None => println!("{overlay} is already shown."),
        },
        Input::Hold(control, held) => {
            ui.controls().hold(control, held).await;
            println!("{}", render::map_status(&ui.map(), &palette));
        }
        Input::Hover(x) => match session.state().dashboard() {
            Some(record) => {
                let view = DashboardView::build(record, ChartGeometry::default());
                match render::hover(&view.chart, x) {
                    Some(tip) => println!("{tip}"),
                    None => println!("No hourly data."),
                }
            }
            None => eprintln!("No forecast is loaded."),
        },
        Input::Json => match session.state().dashboard() {
            Some(record) => match inspector::pretty_json(record) {
                Ok(text) => {
                    ui.open_inspector();
                    println!("{}", render::json(&text, &palette));
                    println!("[{}]", ui.copy_label(Instant::now()));
                }
                Err(e) => eprintln!("{e:#}"),
            },
            None => eprintln!("No forecast is loaded."),
        },
        Input::Copy => match session.state().dashboard() {
            Some(record) => match copy_json(record) {
                Ok(()) => {
                    ui.mark_copied(Instant::now());
                    println!("[{}]", ui.copy_label(Instant::now()));
                }
                Err(e) => eprintln!("{e:#}"),
            },
            None => eprintln!("No forecast is loaded."),
        },
        Input::Alerts => {
            println!("Fetching alerts for {}...", session.state().location());
            match session.alerts().await {
                Ok(alerts) => print!("{}", render::alerts(&alerts, &palette)),
                Err(err) => print!("{}", render::error_dialog(&ErrorDialog::for_error(&err), &palette)),
            }
        }
        Input::Ask(question) => match session.ask(&question).await {
            Ok(answer) => println!("{answer}"),
            Err(err) => print!("{}", render::error_dialog(&ErrorDialog::for_error(&err), &palette)),
        },
        Input::Theme => match session.state_mut().theme_mut().toggle() {
            Ok(theme) => println!("Theme: {theme}"),
            Err(e) => {
                warn!(error = %e, "theme toggle not saved");
                eprintln!("Could not save the theme, keeping {}.", session.state().theme().current());
            }
        },
        Input::Retry => {
            if session.state().error().is_some() {
                println!("{}", render::loading_line(session.state().location()));
                session.retry().await;
                unmount_if_failed(session, ui);
                show_phase(session, ui, None);
            } else {
                println!("Nothing to retry.");
            }
        }
        Input::Help => println!("{HELP}"),
        Input::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

async fn load(session: &mut Session, ui: &mut DashboardState) {
    println!("{}", render::loading_line(session.state().location()));
    session.load().await;
    unmount_if_failed(session, ui);
    show_phase(session, ui, None);
}

fn copy_json(record: &ForecastRecord) -> Result<()> {
    let text = inspector::pretty_json(record)?;
    clipboard::copy(&text).context("Failed to write to the terminal")
}

/// Map and control state belong to one mounted dashboard. Once the
/// dashboard is gone they are replaced, so the next successful load starts
/// from the default view and any held control is released.
fn unmount_if_failed(session: &Session, ui: &mut DashboardState) {
    if session.state().dashboard().is_none() {
        *ui = DashboardState::default();
    }
}

/// Print the dashboard or the error dialog, plus the location-change
/// announcement if it differs from `previous`.
fn show_phase(session: &Session, ui: &DashboardState, previous: Option<&str>) {
    let state = session.state();
    let palette = Palette::for_theme(state.theme().current());

    match state.phase() {
        Phase::Loading => println!("{}", render::loading_line(state.location())),
        Phase::Ready(record) => {
            let view = DashboardView::build(record, ChartGeometry::default());
            print!("{}", render::dashboard(&view, &ui.map(), state.fetched_at(), &palette));
            if let Some(note) = state.announcement().filter(|note| Some(*note) != previous) {
                println!("{}{note}{}", palette.muted, palette.reset);
            }
        }
        Phase::Failed(err) => {
            print!("{}", render::error_dialog(&ErrorDialog::for_error(err), &palette));
            println!("Type `retry` to try again.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use forecast_core::{
        AppState, ForecastClient, ForecastRequest, Theme, ThemeController,
        map::MapView,
        testing::ScriptedModel,
        theme::{FileThemeStore, MemoryThemeStore},
    };

    fn session(model: &ScriptedModel, theme: ThemeController) -> Session {
        let state = AppState::new(ForecastRequest::new("Lisbon"), theme);
        Session::new(ForecastClient::new(model.boxed()), state)
    }

    fn memory_theme() -> ThemeController {
        ThemeController::init(Box::new(MemoryThemeStore::default()), None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_resets_the_map_for_the_next_dashboard() {
        let forecast = fixtures::lisbon().to_string();
        let model = ScriptedModel::new()
            .reply(forecast.clone())
            .reply("Sorry, I could not find that place.")
            .reply(forecast);
        let mut session = session(&model, memory_theme());
        let mut ui = DashboardState::default();

        load(&mut session, &mut ui).await;
        let zoom = Input::Hold(Control::ZoomIn, Duration::from_millis(950));
        assert!(handle(&mut session, &mut ui, zoom.clone()).await.is_continue());
        handle(&mut session, &mut ui, Input::Overlay(Overlay::Temperature)).await;
        assert_eq!(ui.map().zoom(), 2.0);
        assert_eq!(ui.map().overlay().active(), Overlay::Temperature);

        handle(&mut session, &mut ui, Input::Search("Atlantis".into())).await;
        assert!(session.state().error().is_some());
        assert_eq!(ui.map(), MapView::default());

        // Map commands do nothing while no dashboard is mounted.
        handle(&mut session, &mut ui, zoom).await;
        handle(&mut session, &mut ui, Input::Overlay(Overlay::WindSpeed)).await;
        assert_eq!(ui.map(), MapView::default());

        handle(&mut session, &mut ui, Input::Retry).await;
        assert!(session.state().dashboard().is_some());
        assert_eq!(ui.map().zoom(), 1.0);
        assert_eq!(ui.map().overlay().active(), Overlay::default());
        assert_eq!(model.requests().len(), 3);
    }

    #[tokio::test]
    async fn theme_write_failure_keeps_the_session_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        let theme =
            ThemeController::init(Box::new(FileThemeStore::new(path.clone())), Some(Theme::Dark))
                .unwrap();
        // A directory where the file should be makes every later write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let model = ScriptedModel::new();
        let mut session = session(&model, theme);
        let mut ui = DashboardState::default();

        assert!(handle(&mut session, &mut ui, Input::Theme).await.is_continue());
        assert_eq!(session.state().theme().current(), Theme::Dark);
        assert!(handle(&mut session, &mut ui, Input::Help).await.is_continue());
        assert!(handle(&mut session, &mut ui, Input::Quit).await.is_break());
    }

    #[test]
    fn parses_hold_commands_with_optional_duration() {
        assert_eq!(
            Input::parse("zoom in").unwrap(),
            Some(Input::Hold(Control::ZoomIn, Duration::ZERO))
        );
        assert_eq!(
            Input::parse("  PAN left 400 ").unwrap(),
            Some(Input::Hold(Control::PanLeft, Duration::from_millis(400)))
        );
        assert!(Input::parse("zoom").is_err());
        assert!(Input::parse("pan sideways").is_err());
        assert!(Input::parse("zoom in soon").is_err());
    }

    #[test]
    fn parses_overlay_names() {
        assert_eq!(
            Input::parse("overlay wind speed").unwrap(),
            Some(Input::Overlay(Overlay::WindSpeed))
        );
        assert!(Input::parse("overlay clouds").is_err());
    }

    #[test]
    fn keeps_free_text_arguments() {
        assert_eq!(
            Input::parse("search  Rio de Janeiro, BR").unwrap(),
            Some(Input::Search("Rio de Janeiro, BR".into()))
        );
        assert_eq!(Input::parse("search").unwrap(), Some(Input::Search(String::new())));
        assert_eq!(
            Input::parse("ask will it snow?").unwrap(),
            Some(Input::Ask("will it snow?".into()))
        );
        assert!(Input::parse("ask").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(Input::parse("   ").unwrap(), None);
        assert_eq!(Input::parse("q").unwrap(), Some(Input::Quit));
        assert_eq!(Input::parse("hover 125.5").unwrap(), Some(Input::Hover(125.5)));
        assert!(Input::parse("dance").is_err());
    }
}
