//! Tests for `Console` routing, login and dispatch.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use gotify_admin_core::testing::FakeGotify;
use gotify_admin_core::{RequestClient, SessionStore};

use super::*;

fn console() -> Console<FakeGotify> {
    let api = RequestClient::with_transport(
        FakeGotify::new(),
        Arc::new(SessionStore::in_memory()),
        "gotify-admin".into(),
    );
    Console::new(api, "https://push.test", 100)
}

async fn type_text(console: &mut Console<FakeGotify>, text: &str) {
    for c in text.chars() {
        console.dispatch(Action::Type(c)).await;
    }
}

async fn logged_in() -> Console<FakeGotify> {
    let mut console = console();
    console.start().await;
    type_text(&mut console, "admin").await;
    console.dispatch(Action::FocusNext).await;
    type_text(&mut console, "admin").await;
    console.dispatch(Action::Submit).await;
    assert!(console.guard.is_authenticated());
    console
}

#[test]
fn routes_cycle_both_ways() {
    assert_eq!(Route::Messages.next(), Route::Applications);
    assert_eq!(Route::Users.next(), Route::Messages);
    assert_eq!(Route::Messages.prev(), Route::Users);
    assert_eq!(Route::Clients.title(), "Clients");
}

#[tokio::test]
async fn without_token_console_shows_login_and_sends_nothing() {
    let mut console = console();
    assert_eq!(console.mode(), Mode::Checking);
    console.start().await;
    assert_eq!(console.mode(), Mode::Login);
    assert_eq!(console.api().transport().request_count(), 0);
}

#[tokio::test]
async fn valid_login_renders_protected_page() {
    let console = logged_in().await;

    assert_eq!(console.mode(), Mode::Browse);
    assert_eq!(console.route, Route::Messages);
    assert!(console.api().session().is_authenticated());
    assert_eq!(console.identity.as_ref().unwrap().name, "gotify-admin");
    assert_eq!(console.version.version, "2.6.1");
    assert!(console.login.value("username").is_empty());
}

#[tokio::test]
async fn invalid_login_shows_banner_and_persists_nothing() {
    let mut console = console();
    console.start().await;
    type_text(&mut console, "admin").await;
    console.dispatch(Action::FocusNext).await;
    type_text(&mut console, "nope").await;
    console.dispatch(Action::Submit).await;

    assert_eq!(console.mode(), Mode::Login);
    assert_eq!(
        console.login.error.as_deref(),
        Some("Error 401: invalid credentials")
    );
    assert!(console.login.value("password").is_empty());
    assert!(!console.api().session().is_authenticated());
}

#[tokio::test]
async fn empty_login_is_rejected_locally() {
    let mut console = console();
    console.start().await;
    console.dispatch(Action::Submit).await;
    assert_eq!(console.login.error.as_deref(), Some("Username is required"));
    assert_eq!(console.api().transport().request_count(), 0);
}

#[tokio::test]
async fn stored_session_skips_login() {
    let mut console = console();
    let client = console.api().transport().add_client("gotify-admin");
    console
        .api()
        .session()
        .persist(
            &client.token,
            &ClientIdentity {
                id: client.id,
                name: client.name.clone(),
            },
        )
        .unwrap();

    console.start().await;

    assert_eq!(console.mode(), Mode::Browse);
    assert_eq!(console.identity.as_ref().unwrap().id, client.id);
}

#[tokio::test]
async fn quit_works_in_any_mode() {
    let mut console = console();
    console.start().await;
    console.dispatch(Action::Quit).await;
    assert!(console.should_quit);
}

#[tokio::test]
async fn creating_application_from_console() {
    let mut console = logged_in().await;
    console.dispatch(Action::GoTo(Route::Applications)).await;
    let before = console.applications.items.len();

    console.dispatch(Action::New).await;
    assert_eq!(console.mode(), Mode::Form);
    type_text(&mut console, "Test").await;
    console.dispatch(Action::FocusNext).await;
    type_text(&mut console, "desc").await;
    console.dispatch(Action::Submit).await;

    assert_eq!(console.mode(), Mode::Browse);
    assert_eq!(console.applications.items.len(), before + 1);
    assert_eq!(console.applications.selected_item().unwrap().name, "Test");
}

#[tokio::test]
async fn messages_shortcut_opens_application_form() {
    let mut console = logged_in().await;
    console.dispatch(Action::New).await;
    assert_eq!(console.route, Route::Applications);
    assert_eq!(console.mode(), Mode::Form);
    console.dispatch(Action::Cancel).await;
    assert_eq!(console.mode(), Mode::Browse);
}

#[tokio::test]
async fn deleting_after_confirmation() {
    let mut console = logged_in().await;
    console.api().transport().add_application("ci", "");
    console.dispatch(Action::GoTo(Route::Applications)).await;
    assert_eq!(console.applications.items.len(), 1);

    console.dispatch(Action::Delete).await;
    assert_eq!(console.mode(), Mode::Confirm);
    console.dispatch(Action::Cancel).await;
    assert_eq!(console.applications.items.len(), 1);

    console.dispatch(Action::Delete).await;
    console.dispatch(Action::Submit).await;
    assert!(console.applications.items.is_empty());
    assert!(console.applications.selected.is_none());
}

#[tokio::test]
async fn deleting_own_client_warns_and_logs_out() {
    let mut console = logged_in().await;
    console.dispatch(Action::GoTo(Route::Clients)).await;
    let own = console.identity.as_ref().unwrap().id;
    assert_eq!(console.clients.selected, Some(own));

    console.dispatch(Action::Delete).await;
    let confirm = console.clients.confirm.as_ref().unwrap();
    assert_eq!(confirm.tone, Tone::Warning);
    assert!(confirm.message.contains("will log out"));

    console.dispatch(Action::Submit).await;
    assert_eq!(console.mode(), Mode::Login);
    assert!(!console.api().session().is_authenticated());
}

#[tokio::test]
async fn logout_returns_to_login() {
    let mut console = logged_in().await;
    console.dispatch(Action::GoTo(Route::Users)).await;
    console.dispatch(Action::Logout).await;

    assert_eq!(console.mode(), Mode::Login);
    assert!(!console.api().session().is_authenticated());
    assert!(console.identity.is_none());
    assert!(console.users.items.is_empty());
    assert_eq!(
        console.guard,
        Guard::Unauthenticated {
            return_to: Route::Users
        }
    );
}

#[tokio::test]
async fn revoked_session_sends_operator_to_login() {
    let mut console = logged_in().await;
    let own_client = console.identity.as_ref().unwrap().id;
    console.api().clients().delete(own_client).await.unwrap();

    console.dispatch(Action::Refresh).await;

    assert_eq!(console.mode(), Mode::Login);
    assert_eq!(
        console.login.error.as_deref(),
        Some("Session expired, please log in again")
    );
    assert!(!console.api().session().is_authenticated());
}

#[tokio::test]
async fn login_returns_to_requested_route() {
    let mut console = logged_in().await;
    console.dispatch(Action::GoTo(Route::Clients)).await;
    console.dispatch(Action::Logout).await;

    type_text(&mut console, "admin").await;
    console.dispatch(Action::FocusNext).await;
    type_text(&mut console, "admin").await;
    console.dispatch(Action::Submit).await;

    assert_eq!(console.route, Route::Clients);
    assert!(!console.clients.items.is_empty());
}

#[tokio::test]
async fn message_filter_moves_with_arrows() {
    let mut console = logged_in().await;
    let app = console.api().transport().add_application("ci", "");
    console.api().transport().add_message(app.id, "t", "m", 1);
    console.dispatch(Action::Refresh).await;

    console.dispatch(Action::Right).await;
    assert_eq!(console.messages.filter, Some(app.id));
    console.dispatch(Action::Left).await;
    assert_eq!(console.messages.filter, None);
}
