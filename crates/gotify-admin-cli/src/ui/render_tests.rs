//! Tests for TUI rendering.

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use gotify_admin_core::testing::FakeGotify;
    use gotify_admin_core::{RequestClient, SessionStore};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::app::{Action, Console, Route};
    use crate::ui::draw;

    fn console() -> Console<FakeGotify> {
        let api = RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        );
        Console::new(api, "https://push.test", 100)
    }

    async fn logged_in() -> Console<FakeGotify> {
        let mut console = console();
        console.start().await;
        for c in "admin".chars() {
            console.dispatch(Action::Type(c)).await;
        }
        console.dispatch(Action::FocusNext).await;
        for c in "admin".chars() {
            console.dispatch(Action::Type(c)).await;
        }
        console.dispatch(Action::Submit).await;
        console
    }

    /// Draw `console` once on a `width` x `height` test terminal and return
    /// the screen as one string per row.
    fn screen(width: u16, height: u16, console: &Console<FakeGotify>) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, console)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut rows = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                rows.push_str(buffer[(x, y)].symbol());
            }
            rows.push('\n');
        }
        rows
    }

    #[test]
    fn checking_indicator_before_start() {
        let text = screen(80, 24, &console());
        assert!(text.contains("Checking session..."));
    }

    #[tokio::test]
    async fn login_screen_shows_server_and_fields() {
        let mut console = console();
        console.start().await;
        console.dispatch(Action::Type('x')).await;
        console.dispatch(Action::FocusNext).await;
        console.dispatch(Action::Type('s')).await;

        let text = screen(80, 24, &console);
        assert!(text.contains("Gotify Login"));
        assert!(text.contains("https://push.test"));
        assert!(text.contains("Username*: x"));
        assert!(text.contains("Password*: •"));
        assert!(!text.contains("Password*: s"));
    }

    #[tokio::test]
    async fn login_error_is_rendered() {
        let mut console = console();
        console.start().await;
        console.dispatch(Action::Submit).await;
        let text = screen(80, 24, &console);
        assert!(text.contains("Username is required"));
    }

    #[tokio::test]
    async fn header_shows_tabs_identity_and_version() {
        let console = logged_in().await;
        let text = screen(120, 30, &console);
        assert!(text.contains("1 Messages"));
        assert!(text.contains("4 Users"));
        assert!(text.contains("gotify-admin | v2.6.1"));
    }

    #[tokio::test]
    async fn application_detail_masks_token_until_revealed() {
        let mut console = logged_in().await;
        let app = console.api().transport().add_application("Backups", "nightly");
        console.dispatch(Action::GoTo(Route::Applications)).await;

        let text = screen(140, 40, &console);
        assert!(text.contains("[B] Backups"));
        assert!(text.contains("nightly"));
        assert!(text.contains("X-Gotify-Key: <token>"));
        assert!(!text.contains(&app.token));

        console.dispatch(Action::ToggleToken).await;
        let text = screen(140, 40, &console);
        assert!(text.contains(&app.token));
    }

    #[tokio::test]
    async fn empty_page_invites_creation() {
        let mut console = logged_in().await;
        console.dispatch(Action::GoTo(Route::Applications)).await;
        let text = screen(120, 30, &console);
        assert!(text.contains("No applications yet."));
    }

    #[tokio::test]
    async fn messages_show_priority_band_and_application() {
        let mut console = logged_in().await;
        let app = console.api().transport().add_application("ci", "");
        console
            .api()
            .transport()
            .add_message(app.id, "build failed", "main is red", 9);
        console.dispatch(Action::Refresh).await;

        let text = screen(120, 30, &console);
        assert!(text.contains("All messages"));
        assert!(text.contains("high"));
        assert!(text.contains("build failed"));
        assert!(text.contains("main is red"));
    }

    #[tokio::test]
    async fn form_overlay_renders_over_page() {
        let mut console = logged_in().await;
        console.dispatch(Action::GoTo(Route::Users)).await;
        console.dispatch(Action::New).await;

        let text = screen(120, 30, &console);
        assert!(text.contains("New user"));
        assert!(text.contains("Confirm password"));
        assert!(text.contains("Administrator: [ ]"));
    }

    #[tokio::test]
    async fn confirm_overlay_names_the_item() {
        let mut console = logged_in().await;
        console.dispatch(Action::GoTo(Route::Clients)).await;
        console.dispatch(Action::Delete).await;

        let text = screen(120, 30, &console);
        assert!(text.contains("Delete client"));
        assert!(text.contains("\"gotify-admin\""));
    }

    #[tokio::test]
    async fn error_banner_is_shown() {
        let mut console = logged_in().await;
        console.api().transport().set_offline(true);
        console.dispatch(Action::Refresh).await;

        let text = screen(140, 30, &console);
        assert!(text.contains("Request failed"));
    }

    #[tokio::test]
    async fn tiny_terminal_does_not_panic() {
        let mut console = logged_in().await;
        console.dispatch(Action::GoTo(Route::Applications)).await;
        console.dispatch(Action::New).await;
        screen(10, 4, &console);
    }
}
