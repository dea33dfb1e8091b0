use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::core::game::{Flow, Game, InputEvent};
use crate::core::renderer::DrawList;
use crate::core::terminal::{paint, Viewport};

/// Upper bound on one tick's delta, in frames, so a stalled terminal does not teleport particles
const MAX_DELTA_FRAMES: f32 = 4.0;
const FRAME: Duration = Duration::from_micros(16_667);

pub struct Engine<G: Game> {
    game: G,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Run until the game or the player asks to quit. Mouse capture is released on every exit path.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<G> {
        execute!(stdout(), EnableMouseCapture).context("enabling mouse capture")?;
        info!(title = %self.game.title(), "engine started");

        let result = self.run_loop(&mut terminal).await;

        if let Err(e) = execute!(stdout(), DisableMouseCapture) {
            debug!(error = %e, "failed to release mouse capture");
        }
        info!("engine stopped");
        result.map(|_| self.game)
    }

    async fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut events = EventStream::new();
        let mut frame_timer = tokio::time::interval(self.game.tick_rate());
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_tick = Instant::now();
        let mut list = DrawList::new();
        let mut viewport: Option<Viewport> = None;

        loop {
            tokio::select! {
                // INPUT: applied as it arrives, always on this task
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if is_hard_quit(&event) {
                                info!("escape pressed");
                                break;
                            }
                            if let Some(input) = translate(&event, viewport.as_ref()) {
                                if self.game.handle_input(input) == Flow::Quit {
                                    break;
                                }
                            }
                        }
                        Some(Err(e)) => return Err(e).context("reading terminal events"),
                        None => break,
                    }
                }

                // TICK then DRAW
                _ = frame_timer.tick() => {
                    let delta = frame_delta(last_tick.elapsed());
                    last_tick = Instant::now();
                    self.game.on_tick(delta);

                    list.clear_commands();
                    self.game.render(&mut list);

                    let title = self.game.title();
                    let size = self.game.canvas_size();
                    terminal.draw(|f| {
                        viewport = Some(paint(f, &list, &title, size));
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Esc and Ctrl-C leave regardless of the game's key bindings
pub fn is_hard_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent { code, modifiers, kind, .. }) if *kind == KeyEventKind::Press => {
            *code == KeyCode::Esc
                || (*code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        }
        _ => false,
    }
}

/// Convert a terminal event into game input. Mouse positions need the last painted viewport.
pub fn translate(event: &Event, viewport: Option<&Viewport>) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(InputEvent::Key(key.code)),
        Event::Mouse(mouse) => {
            let point = viewport?.to_virtual(mouse.column, mouse.row)?;
            match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::PointerMoved(point)),
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerPressed(point)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Elapsed wall time in 60 Hz frames
pub fn frame_delta(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / FRAME.as_secs_f32()).clamp(0.0, MAX_DELTA_FRAMES)
}
