//! Full dashboard flows driven through a scripted model.

mod common;

use common::{forecast_json, london_forecast};
use forecast_core::{
    AppState, DashboardState, DashboardView, ErrorDialog, ErrorKind, ForecastClient,
    ForecastRequest, Phase, Session, Theme, ThemeController, ThemeStore,
    chart::ChartGeometry,
    map::{Control, Overlay},
    testing::ScriptedModel,
    theme::MemoryThemeStore,
};
use std::time::Duration;

fn session(model: &ScriptedModel, location: &str) -> Session {
    let theme = ThemeController::init(Box::new(MemoryThemeStore::default()), None).unwrap();
    let state = AppState::new(ForecastRequest::new(location).with_days(7), theme);
    Session::new(ForecastClient::new(model.boxed()), state)
}

#[tokio::test]
async fn mount_loads_forecast_and_renders_dashboard() {
    let model = ScriptedModel::new().reply(london_forecast().to_string());
    let mut session = session(&model, "London");

    assert!(session.state().is_loading());
    assert!(matches!(session.load().await, Phase::Ready(_)));

    let record = session.state().dashboard().unwrap();
    assert_eq!(record.hourly.len(), 10);
    assert_eq!(record.daily.len(), 7);
    assert!(session.state().fetched_at().is_some());

    let view = DashboardView::build(record, ChartGeometry::default());
    assert_eq!(view.headline, "London");
    assert_eq!(view.current_temp(), 13.0);
    assert_eq!(view.chart.labels().len(), 10);
    assert_eq!(view.chart.labels()[0], "19:00");

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].response_schema.is_some());
}

#[tokio::test]
async fn auth_failure_shows_dialog_and_retry_repeats_request() {
    let model = ScriptedModel::new()
        .fail("403 permission denied")
        .reply(london_forecast().to_string());
    let mut session = session(&model, "London");

    session.load().await;
    let err = session.state().error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(session.state().dashboard().is_none());

    let dialog = ErrorDialog::for_error(err);
    assert_eq!(dialog.title, "API Key Error");
    assert_eq!(dialog.detail, "403 permission denied");
    assert_eq!(dialog.retry_label, "Try Again");

    assert!(matches!(session.retry().await, Phase::Ready(_)));

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn unparseable_reply_unmounts_dashboard() {
    let model = ScriptedModel::new()
        .reply(london_forecast().to_string())
        .reply("{ this is not json");
    let mut session = session(&model, "London");

    session.load().await;
    assert!(session.state().dashboard().is_some());

    assert!(session.search("Nowhere").await);
    let err = session.state().error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Location);
    assert_eq!(ErrorDialog::for_error(err).title, "Invalid Location");
    assert!(session.state().dashboard().is_none());
}

#[tokio::test]
async fn searching_a_new_place_announces_the_update() {
    let model = ScriptedModel::new()
        .reply(london_forecast().to_string())
        .reply(forecast_json("Tokyo, JP", 7).to_string());
    let mut session = session(&model, "London");

    session.load().await;
    assert_eq!(session.state().announcement(), None);

    session.search("  Tokyo ").await;
    assert_eq!(session.state().location(), "Tokyo");
    assert_eq!(
        session.state().announcement(),
        Some("Weather data has been updated for Tokyo, JP.")
    );
}

#[tokio::test]
async fn alerts_and_follow_up_use_current_state() {
    let model = ScriptedModel::new()
        .reply(london_forecast().to_string())
        .reply("[]")
        .reply("Light rain is likely, so take a jacket.");
    let mut session = session(&model, "London");
    session.load().await;

    assert!(session.alerts().await.unwrap().is_empty());
    let answer = session.ask("Should I wear a jacket?").await.unwrap();
    assert_eq!(answer, "Light rain is likely, so take a jacket.");

    let requests = model.requests();
    assert!(requests[1].prompt.contains("weather alerts for London."));
    assert!(requests[2].response_schema.is_none());
    assert!(requests[2].prompt.contains("Should I wear a jacket?"));
}

#[tokio::test]
async fn follow_up_failure_uses_same_classification() {
    let model = ScriptedModel::new()
        .reply(london_forecast().to_string())
        .fail("Failed to fetch");
    let mut session = session(&model, "London");
    session.load().await;

    let err = session.ask("Is it windy?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    // The dashboard stays mounted; only the answer failed.
    assert!(session.state().dashboard().is_some());
}

#[tokio::test]
async fn theme_toggle_persists_through_store() {
    let model = ScriptedModel::new();
    let mut session = session(&model, "London");

    assert_eq!(session.state().theme().current(), Theme::Dark);
    let next = session.state_mut().theme_mut().toggle().unwrap();
    assert_eq!(next, Theme::Light);
    assert_eq!(session.state().theme().store().load().unwrap(), Some(Theme::Light));
}

#[tokio::test(start_paused = true)]
async fn held_zoom_and_overlay_switch_on_dashboard() {
    let mut ui = DashboardState::default();

    ui.controls()
        .hold(Control::ZoomIn, Duration::from_millis(950))
        .await;
    // One step on press plus nine repeats.
    assert_eq!(ui.map().zoom(), 2.0);

    ui.controls()
        .hold(Control::ZoomIn, Duration::from_millis(5_000))
        .await;
    assert_eq!(ui.map().zoom(), 3.0);

    let fade = ui.select_overlay(Overlay::WindSpeed).unwrap();
    assert_eq!(fade.to, Overlay::WindSpeed);
    assert_eq!(ui.map().overlay().active(), Overlay::WindSpeed);
}
