pub mod state;
pub mod terminal;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use std::{sync::Arc, time::Duration};

use crate::{
    api::NotesBackend,
    ui::{self, ApiBadge, modal::Modal},
};

pub use state::{Outcome, Request, ShellState};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl Request {
    /// Runs the request against a backend
    pub async fn execute<B: NotesBackend>(self, backend: &B) -> Outcome {
        match self {
            Self::List => Outcome::Listed(backend.list_notes().await),
            Self::Create(payload) => {
                let result = backend.create_note(&payload).await;
                Outcome::Created(payload, result)
            }
            Self::Update(id, payload) => {
                let result = backend.update_note(&id, &payload).await;
                Outcome::Updated(id, payload, result)
            }
            Self::Delete(id) => {
                let result = backend.delete_note(&id).await;
                Outcome::Deleted(id, result)
            }
        }
    }
}

/// Owns the screen state and runs requests in the background.
///
/// Requests are spawned on the tokio runtime; their outcomes come back over a
/// channel and are folded into the state by the event loop.
pub struct Shell<B: NotesBackend> {
    backend: Arc<B>,
    state: ShellState,
    badge: ApiBadge,
    outcomes_tx: UnboundedSender<Outcome>,
    outcomes_rx: UnboundedReceiver<Outcome>,
    viewport: Rect,
    should_quit: bool,
}

impl<B: NotesBackend> Shell<B> {
    pub fn new(backend: Arc<B>, badge: ApiBadge) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            state: ShellState::new(),
            badge,
            outcomes_tx,
            outcomes_rx,
            viewport: Rect::default(),
            should_quit: false,
        }
    }

    pub const fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    pub const fn badge(&self) -> &ApiBadge {
        &self.badge
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Size of the last drawn frame, used for mouse hit tests
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Kicks off the initial fetch
    pub fn start(&mut self) {
        if let Some(request) = self.state.begin_load(false) {
            self.dispatch(request);
        }
    }

    pub fn refresh(&mut self) {
        if let Some(request) = self.state.begin_load(true) {
            self.dispatch(request);
        }
    }

    fn dispatch(&self, request: Request) {
        tracing::debug!("Dispatching {:?}", request);
        let backend = Arc::clone(&self.backend);
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = request.execute(backend.as_ref()).await;
            if outcomes.send(outcome).is_err() {
                tracing::warn!("Shell closed before request finished");
            }
        });
    }

    /// Waits for the next finished request and applies it
    pub async fn settle(&mut self) -> bool {
        match self.outcomes_rx.recv().await {
            Some(outcome) => {
                self.state.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Applies every outcome that is already available
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.state.apply(outcome);
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event
            && key.kind != KeyEventKind::Press
        {
            return;
        }

        if self.state.editor().is_some() {
            self.handle_editor_event(event);
        } else if self.state.pending_delete().is_some() {
            self.handle_confirm_event(event);
        } else if let Event::Key(key) = event {
            self.handle_list_key(*key);
        }
    }

    fn handle_editor_event(&mut self, event: &Event) {
        if let Some(reason) = Modal::EDITOR.dismissal(event, self.viewport) {
            tracing::debug!("Editor dismissed via {:?}", reason);
            self.state.close_editor();
            return;
        }

        let Event::Key(key) = event else {
            return;
        };
        let busy = self.state.is_saving();
        let submitted = self
            .state
            .editor_mut()
            .and_then(|session| session.form.handle_key(*key, busy));

        if let Some(payload) = submitted
            && let Some(request) = self.state.submit(payload)
        {
            self.dispatch(request);
        }
    }

    fn handle_confirm_event(&mut self, event: &Event) {
        if Modal::CONFIRM.dismissal(event, self.viewport).is_some() {
            self.state.cancel_delete();
            return;
        }

        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    if let Some(request) = self.state.confirm_delete() {
                        self.dispatch(request);
                    }
                }
                KeyCode::Char('n' | 'N') => self.state.cancel_delete(),
                _ => {}
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let selected = self.state.selected();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('n') => self.state.open_create(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('e') | KeyCode::Enter => self.state.open_edit(selected),
            KeyCode::Char('d') | KeyCode::Delete => self.state.request_delete(selected),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
            _ => {}
        }
    }

    /// Takes over the terminal until the user quits. The terminal is
    /// restored on every exit path, including panics.
    pub fn run(&mut self) -> Result<()> {
        let (guard, mut terminal) = terminal::enter()?;
        let outcome = self.event_loop(&mut terminal);
        terminal::first_error(outcome, guard.restore())
    }

    fn event_loop(&mut self, terminal: &mut terminal::Tui) -> Result<()> {
        self.start();

        loop {
            self.drain_outcomes();

            let mut viewport = self.viewport;
            terminal
                .draw(|frame| {
                    viewport = frame.area();
                    ui::draw_app(frame, &self.state, &self.badge);
                })
                .context("rendering frame")?;
            self.set_viewport(viewport);

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL).context("polling for terminal events")? {
                let event = event::read().context("reading terminal event")?;
                self.handle_event(&event);
            }
        }

        tracing::info!("Shutting down");
        Ok(())
    }
}
