//! Integration tests for dashboard navigation
//!
//! Mounts the navigator against a mock server and checks that the history
//! stack, URL and visible state stay in step.

use std::sync::Arc;

use super::common::fixtures::{admin_details, admin_session, emoji_list};
use super::common::server::TestConsole;
use serde_json::json;
use uniman::nav::{BrowserHistory, NavState, SectionSelection, ViewContent};
use uniman::{
    FailureKind, MemoryHistory, NavOutcome, NavigationController, NavigationRequest, Navigator,
    Toast, UiEvent, ViewRegistry,
};

async fn signed_in_console() -> TestConsole {
    let console = TestConsole::start(Some(admin_session("valid"))).await;
    console
        .respond_for_token("POST", "/api/account/short-details", "valid", 200, admin_details())
        .await;
    console
        .respond_for_token("GET", "/api/emoji/list", "valid", 200, emoji_list())
        .await;
    console
}

fn navigator(console: &TestConsole, history: MemoryHistory) -> Navigator {
    let controller =
        NavigationController::new(Arc::new(ViewRegistry::builtin()), Box::new(history), "/dashboard");
    Navigator::new(console.client.clone(), controller)
}

fn history_len(navigator: &Navigator) -> usize {
    navigator.with_controller(|c| c.history().len())
}

fn current_url(navigator: &Navigator) -> String {
    navigator.with_controller(|c| c.history().current().map(|e| e.url).unwrap_or_default())
}

/// From an empty state, one navigation pushes exactly one entry
#[tokio::test]
async fn test_navigation_from_empty_state_pushes_once() {
    let console = signed_in_console().await;
    let navigator = navigator(&console, MemoryHistory::new());
    navigator
        .with_controller(|c| c.load_menu_for_role("Administrator"))
        .unwrap();

    let outcome = navigator
        .navigate(NavigationRequest::to_section("event").with_view("create-event"))
        .await
        .unwrap();

    let NavOutcome::Committed(state) = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(state.active_view.as_deref(), Some("create-event"));
    assert_eq!(history_len(&navigator), 1);
    assert_eq!(current_url(&navigator), "/dashboard?h=event&w=create-event");
}

/// A crafted section in the URL lands on the first menu item
#[tokio::test]
async fn test_crafted_url_redirects_to_first_item() {
    let url = "/dashboard?h=not-a-real-section";
    let mut console = signed_in_console().await;
    let navigator = navigator(&console, MemoryHistory::with_url(url));

    let (user, outcome) = navigator.mount(Some(url)).await.unwrap();

    assert_eq!(user.role, "Administrator");
    assert!(matches!(outcome, NavOutcome::Committed(_)));
    assert_eq!(
        navigator.state().status(),
        NavState::Ready {
            section: SectionSelection::Section("home".into()),
            view: "home".into(),
        }
    );
    assert_eq!(history_len(&navigator), 1);
    assert_eq!(current_url(&navigator), "/dashboard?h=home&w=home");

    let events = console.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::RenderView { view_id, .. } if view_id == "home"
    )));
}

/// Reloading a valid URL keeps it and its opaque parameters
#[tokio::test]
async fn test_reload_adopts_url_in_place() {
    let url = "/dashboard?h=emojis&w=emojis&page=2";
    let mut console = signed_in_console().await;
    let navigator = navigator(&console, MemoryHistory::with_url(url));

    navigator.mount(Some(url)).await.unwrap();

    assert_eq!(history_len(&navigator), 1);
    assert_eq!(current_url(&navigator), url);
    let rendered = console.drain_events().into_iter().find_map(|e| match e {
        UiEvent::RenderView { content, .. } => Some(content),
        _ => None,
    });
    match rendered {
        Some(ViewContent::Emojis(emojis)) => assert_eq!(emojis.len(), 2),
        other => panic!("unexpected content: {other:?}"),
    }
}

/// Back and forward replay entries without growing history
#[tokio::test]
async fn test_back_and_forward_replay() {
    let console = signed_in_console().await;
    let navigator = navigator(&console, MemoryHistory::with_url("/dashboard"));
    navigator.mount(Some("/dashboard")).await.unwrap();
    navigator.select_header("emojis").await.unwrap();
    navigator
        .navigate(NavigationRequest::deselected("host-list").with_param("id", "7"))
        .await
        .unwrap();
    let len = history_len(&navigator);

    navigator.back().await.unwrap();
    assert_eq!(navigator.state().active_view.as_deref(), Some("emojis"));
    assert_eq!(navigator.state().highlighted_item.as_deref(), Some("emojis"));

    navigator.forward().await.unwrap();
    let state = navigator.state();
    assert_eq!(state.selected_section, Some(SectionSelection::Deselected));
    assert_eq!(state.active_view.as_deref(), Some("host-list"));
    assert_eq!(history_len(&navigator), len);
    assert_eq!(current_url(&navigator), "/dashboard?h=false&w=host-list&id=7");
}

/// A view whose data cannot load leaves the dashboard where it was
#[tokio::test]
async fn test_failed_view_load_keeps_state() {
    let mut console = TestConsole::start(Some(admin_session("valid"))).await;
    console
        .respond("POST", "/api/account/short-details", 200, admin_details())
        .await;
    console
        .respond("GET", "/api/emoji/list", 500, json!({"message": "Emoji store unavailable"}))
        .await;
    let navigator = navigator(&console, MemoryHistory::new());
    navigator.mount(None).await.unwrap();
    let before = navigator.state();
    console.drain_events();

    let outcome = navigator.select_header("emojis").await.unwrap();

    assert!(matches!(
        outcome,
        NavOutcome::Failed(ref failure) if failure.kind == FailureKind::Application
    ));
    assert_eq!(navigator.state(), before);
    assert_eq!(
        console.drain_events(),
        vec![UiEvent::Toast(Toast::error("Emoji store unavailable"))]
    );
}
