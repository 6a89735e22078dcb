//! The UI loop: draws, receives messages, applies them, and carries out
//! the resulting actions.

use std::sync::Arc;

use tokio::sync::{Notify, mpsc};
use tracing::{debug, error};

use crate::Result;
use crate::holdings::HoldingsStore;
use crate::prompt::TextPrompt;

use super::event::{Action, Message, update};
use super::{App, Tui, render};

/// Text shown in the native holdings dialog.
const HOLDINGS_PROMPT: &str = "Enter your BTC holdings:";

/// Performs the side effects the UI state machine asks for.
pub struct ActionHandler {
    store: HoldingsStore,
    refresh: Vec<Arc<Notify>>,
    prompt: Option<Arc<dyn TextPrompt>>,
    tx: mpsc::UnboundedSender<Message>,
}

impl ActionHandler {
    /// Creates a handler.
    ///
    /// `refresh` holds one handle per background poller to wake on
    /// "Refresh"; `prompt` is the native dialog, if any.
    pub fn new(
        store: HoldingsStore,
        refresh: Vec<Arc<Notify>>,
        prompt: Option<Arc<dyn TextPrompt>>,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            store,
            refresh,
            prompt,
            tx,
        }
    }

    /// Carries out one action. Failures are logged, never returned.
    pub fn handle(&self, action: Action) {
        match action {
            Action::Refresh => {
                debug!(pollers = self.refresh.len(), "Manual refresh");
                for notify in &self.refresh {
                    notify.notify_one();
                }
            }
            Action::PromptHoldings { default } => self.spawn_prompt(default),
            Action::PersistHoldings(quantity) => {
                if let Err(e) = self.store.save(quantity) {
                    error!(path = %self.store.path().display(), "Failed to save holdings: {e}");
                }
            }
        }
    }

    /// Shows the native dialog on a detached thread and reports the answer
    /// back as [`Message::HoldingsEntered`], or [`Message::PromptUnavailable`]
    /// if it could not be launched.
    ///
    /// The thread is not owned by the runtime, so quitting with the dialog
    /// still open does not wait for it.
    fn spawn_prompt(&self, default: String) {
        let Some(prompt) = self.prompt.clone() else {
            let _ = self.tx.send(Message::PromptUnavailable(
                "no native dialog configured".to_string(),
            ));
            return;
        };

        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name("holdings-dialog".to_string())
            .spawn(move || {
                let message = match prompt.prompt_for_text(HOLDINGS_PROMPT, &default) {
                    Ok(answer) => Message::HoldingsEntered(answer),
                    Err(e) => Message::PromptUnavailable(e.to_string()),
                };
                let _ = tx.send(message);
            });

        if let Err(e) = spawned {
            error!("Failed to start dialog thread: {e}");
            let _ = self
                .tx
                .send(Message::PromptUnavailable(format!("cannot start dialog: {e}")));
        }
    }
}

/// Runs the UI loop until the user quits.
///
/// # Errors
///
/// Returns [`BtcBarError::Io`](crate::BtcBarError::Io) if drawing fails.
pub async fn run(
    terminal: &mut Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    handler: &ActionHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        dispatch(app, message, handler);

        // Apply everything already queued before the next draw.
        while let Ok(message) = rx.try_recv() {
            dispatch(app, message, handler);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn dispatch(app: &mut App, message: Message, handler: &ActionHandler) {
    if let Some(action) = update(app, message) {
        handler.handle(action);
    }
}
