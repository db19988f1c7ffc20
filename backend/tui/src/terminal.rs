//! Terminal event loop for `crumb chat`.

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crumb_core::RelayClient;

use crate::app::AppState;
use crate::input::{handle_key_event, InputAction};
use crate::render::draw_ui;
use crate::streaming::StreamConsumer;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the chat UI until the user quits.
///
/// The loop redraws whenever a key arrives or the consumer publishes a new
/// snapshot. Quitting drops any in-flight reply.
pub async fn run<C>(consumer: Arc<StreamConsumer<C>>) -> Result<()>
where
    C: RelayClient + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, consumer).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<C>(terminal: &mut Term, consumer: Arc<StreamConsumer<C>>) -> Result<()>
where
    C: RelayClient + 'static,
{
    let mut state = AppState::new();
    let mut view = consumer.subscribe();
    let mut events = EventStream::new();

    while !state.should_quit {
        let snapshot = view.borrow_and_update().clone();
        terminal.draw(|f| draw_ui(f, &state, &snapshot))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = handle_key_event(key, &mut state, consumer.is_busy()) {
                        submit(&consumer, &mut state, action);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Claim the consumer on the UI task, then stream on a spawned one. A refused
/// submission goes back into the input box.
fn submit<C>(consumer: &Arc<StreamConsumer<C>>, state: &mut AppState, action: InputAction)
where
    C: RelayClient + 'static,
{
    let InputAction::Submit(text) = action else {
        info!("quit requested");
        return;
    };
    match consumer.begin_send(&text) {
        Ok(pending) => {
            let consumer = Arc::clone(consumer);
            tokio::spawn(async move {
                let outcome = consumer.finish_send(pending).await;
                debug!(?outcome, "send finished");
            });
        }
        Err(outcome) => {
            debug!(?outcome, "send refused");
            state.restore_input(text);
        }
    }
}
