//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; all HTTP work stays on the
//! tokio runtime. Communication via a `tokio::sync::mpsc` channel.

mod input;

use std::fmt::Display;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use gotify_admin_core::Transport;

use crate::app::Console;
use crate::ui;

pub use input::map_key;

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

/// Run the interactive console until the operator quits.
///
/// Enters raw mode, spawns a dedicated terminal reader thread, resolves the
/// stored session and then runs the main `select!` loop. The terminal is
/// restored on every exit path after raw mode was entered.
pub async fn run<T: Transport>(console: &mut Console<T>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let setup = execute!(stdout, EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    let mut terminal = match setup {
        Ok(terminal) => terminal,
        Err(e) => {
            restore_terminal();
            return Err(e.into());
        }
    };

    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = tokio::sync::mpsc::channel::<TermEvent>(64);

    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        // Windows emits Press + Release per keystroke
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        if term_tx.blocking_send(TermEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(Event::Resize(w, h)) => {
                        if term_tx.blocking_send(TermEvent::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let result = event_loop(&mut terminal, console, &mut term_rx).await;

    cancel.cancel();
    let _ = ui_thread.join(); // fast, <50ms due to poll timeout

    restore_terminal();
    let _ = terminal.show_cursor();

    result
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn redraw<B: Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    console: &Console<T>,
) -> anyhow::Result<()>
where
    B::Error: Display,
{
    terminal
        .draw(|f| ui::draw(f, console))
        .map_err(|e| anyhow::anyhow!("Cannot draw the console: {e}"))?;
    Ok(())
}

/// Draw, resolve the session, then handle ticks and keys until quit.
async fn event_loop<B: Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    console: &mut Console<T>,
    term_rx: &mut Receiver<TermEvent>,
) -> anyhow::Result<()>
where
    B::Error: Display,
{
    // Show the checking indicator while the guard resolves.
    redraw(terminal, console)?;
    console.start().await;
    info!(mode = ?console.mode(), "Console started");

    let mut tick = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            biased;
            _ = tick.tick() => redraw(terminal, console)?,
            Some(term_event) = term_rx.recv() => {
                match term_event {
                    TermEvent::Key(key) => {
                        if let Some(action) = map_key(console.mode(), key) {
                            debug!(?action, "Dispatching");
                            console.dispatch(action).await;
                        }
                    }
                    TermEvent::Resize(_, _) => {}
                }
            }
        }
        if console.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    use gotify_admin_core::testing::FakeGotify;
    use gotify_admin_core::{RequestClient, SessionStore};

    use super::*;
    use crate::app::Mode;

    #[tokio::test]
    async fn loop_draws_then_quits_on_ctrl_c() {
        let api = RequestClient::with_transport(
            FakeGotify::new(),
            Arc::new(SessionStore::in_memory()),
            "gotify-admin".into(),
        );
        let mut console = Console::new(api, "https://push.test", 100);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        tx.send(TermEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .await
        .unwrap();

        event_loop(&mut terminal, &mut console, &mut rx).await.unwrap();

        assert!(console.should_quit);
        assert_eq!(console.mode(), Mode::Login);
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(screen.contains("Gotify Login"));
    }
}
