//! Main chat event loop
//!
//! The loop owns the [`ConversationController`] outright. Key events, turn
//! outcomes and connectivity changes all arrive on channels and are applied
//! here one at a time, so no locking is needed around conversation state.

mod keys;

use self::keys::{map_key, UiAction};

use crate::core::config::Settings;
use crate::core::conversation::ConversationController;
use crate::core::monitor::ConnectionMonitor;
use crate::core::transport::{ChatTransport, InferenceClient};
use crate::core::turn::{TurnOutcome, TurnService};
use crate::ui::renderer::{ui, ChatView};
use ratatui::crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Conversation state plus the plumbing needed to start turns.
pub struct ChatSession {
    pub controller: ConversationController,
    pub scroll_from_bottom: u16,
    transport: Arc<dyn ChatTransport>,
    turns: TurnService,
}

impl ChatSession {
    pub fn new(
        controller: ConversationController,
        transport: Arc<dyn ChatTransport>,
        turns: TurnService,
    ) -> Self {
        Self {
            controller,
            scroll_from_bottom: 0,
            transport,
            turns,
        }
    }

    /// Apply one UI action. Returns `false` when the user asked to quit.
    pub fn handle_action(&mut self, action: UiAction) -> bool {
        match action {
            UiAction::Quit => {
                self.controller.abort();
                return false;
            }
            UiAction::Submit => {
                if let Some(request) = self.controller.submit() {
                    self.scroll_from_bottom = 0;
                    self.turns.spawn_turn(Arc::clone(&self.transport), request);
                }
            }
            UiAction::Abort => self.controller.abort(),
            UiAction::NewChat => {
                self.controller.new_chat();
                self.scroll_from_bottom = 0;
            }
            UiAction::CyclePersona => {
                let persona = self.controller.cycle_persona();
                info!(persona = persona.id(), "persona changed");
            }
            UiAction::Insert(c) => {
                if !self.controller.is_awaiting_reply() {
                    self.controller.push_input_char(c);
                }
            }
            UiAction::Backspace => {
                if !self.controller.is_awaiting_reply() {
                    self.controller.pop_input_char();
                }
            }
            UiAction::ScrollUp(rows) => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
            }
            UiAction::ScrollDown(rows) => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
            }
        }
        true
    }

    pub fn handle_outcome(&mut self, id: u64, outcome: TurnOutcome) {
        if self.controller.resolve(id, outcome) {
            self.scroll_from_bottom = 0;
        }
    }
}

fn spawn_event_reader(
    tx: mpsc::UnboundedSender<Event>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.is_cancelled() {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        }
    })
}

pub async fn run_chat(settings: Settings) -> Result<(), Box<dyn Error>> {
    let transport: Arc<dyn ChatTransport> = Arc::new(InferenceClient::new(&settings));
    let monitor = ConnectionMonitor::spawn(Arc::clone(&transport), settings.poll_interval);
    let mut status_rx = monitor.subscribe();
    let (turns, mut turn_rx) = TurnService::new();
    let mut session = ChatSession::new(
        ConversationController::new(settings.persona),
        transport,
        turns,
    );
    info!(
        base_url = %settings.base_url,
        model = %settings.model,
        persona = settings.persona.id(),
        "starting chat"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let stop_reader = CancellationToken::new();
    let reader = spawn_event_reader(event_tx, stop_reader.clone());

    let mut monitor_alive = true;
    let result: Result<(), Box<dyn Error>> = async {
        loop {
            let status = *status_rx.borrow();
            terminal.draw(|f| {
                ui(
                    f,
                    &ChatView {
                        controller: &session.controller,
                        status,
                        base_url: &settings.base_url,
                        model: &settings.model,
                        scroll_from_bottom: session.scroll_from_bottom,
                    },
                )
            })?;

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    let Some(ev) = maybe_event else { break };
                    if let Event::Key(key) = ev {
                        if let Some(action) = map_key(key) {
                            if !session.handle_action(action) {
                                break;
                            }
                        }
                    }
                }
                Some((outcome, id)) = turn_rx.recv() => {
                    session.handle_outcome(id, outcome);
                }
                changed = status_rx.changed(), if monitor_alive => {
                    if changed.is_err() {
                        debug!("connection monitor channel closed");
                        monitor_alive = false;
                    }
                }
            }
        }
        Ok(())
    }
    .await;

    stop_reader.cancel();
    monitor.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    let _ = reader.await;

    result
}
