//! Boundary between the run and the UI layer
//!
//! Outbound: the run queues [`GameEvent`]s during a tick and [`dispatch`]
//! forwards them to a [`UiNotifier`] once the tick is over.
//! Inbound: the UI pushes [`Command`]s into a [`CommandQueue`]; they are
//! drained and applied at the start of the next tick, never mid-tick.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;

use crate::sim::{GameEvent, PowerupKind};

/// Receiver for run notifications. Every method defaults to a no-op.
pub trait UiNotifier {
    fn on_pause(&mut self) {}
    fn on_resume(&mut self) {}
    fn on_game_over(&mut self, _final_score: u64) {}
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_coin_collected(&mut self, _value: u32) {}
    fn on_powerup_activated(&mut self, _kind: PowerupKind, _duration_secs: f32) {}
    fn on_powerup_deactivated(&mut self, _kind: PowerupKind) {}
}

/// Notifier that drops everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl UiNotifier for NullNotifier {}

/// Notifier that records every call as an event
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub events: Vec<GameEvent>,
}

impl UiNotifier for RecordingNotifier {
    fn on_pause(&mut self) {
        self.events.push(GameEvent::Paused);
    }
    fn on_resume(&mut self) {
        self.events.push(GameEvent::Resumed);
    }
    fn on_game_over(&mut self, final_score: u64) {
        self.events.push(GameEvent::GameOver { final_score });
    }
    fn on_score_changed(&mut self, score: u64) {
        self.events.push(GameEvent::ScoreChanged { score });
    }
    fn on_coin_collected(&mut self, value: u32) {
        self.events.push(GameEvent::CoinCollected { value });
    }
    fn on_powerup_activated(&mut self, kind: PowerupKind, duration_secs: f32) {
        self.events.push(GameEvent::PowerupActivated {
            kind,
            duration_secs,
        });
    }
    fn on_powerup_deactivated(&mut self, kind: PowerupKind) {
        self.events.push(GameEvent::PowerupDeactivated { kind });
    }
}

/// Forward queued events to the notifier in order
pub fn dispatch<N: UiNotifier + ?Sized>(events: impl IntoIterator<Item = GameEvent>, notifier: &mut N) {
    for event in events {
        match event {
            GameEvent::Paused => notifier.on_pause(),
            GameEvent::Resumed => notifier.on_resume(),
            GameEvent::GameOver { final_score } => notifier.on_game_over(final_score),
            GameEvent::ScoreChanged { score } => notifier.on_score_changed(score),
            GameEvent::CoinCollected { value } => notifier.on_coin_collected(value),
            GameEvent::PowerupActivated {
                kind,
                duration_secs,
            } => notifier.on_powerup_activated(kind, duration_secs),
            GameEvent::PowerupDeactivated { kind } => notifier.on_powerup_deactivated(kind),
        }
    }
}

/// Control commands from the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Jump,
    Pause,
    Resume,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Case-insensitive command name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "jump" => Ok(Command::Jump),
            "pause" => Ok(Command::Pause),
            "resume" => Ok(Command::Resume),
            "restart" => Ok(Command::Restart),
            _ => Err(UnknownCommand(s.to_string())),
        }
    }
}

/// Shared FIFO of pending commands.
///
/// Clones share the same queue, so UI callbacks can hold a handle and push
/// while the game itself is borrowed for a tick.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.inner.borrow_mut().push_back(command);
    }

    /// Take every pending command, oldest first
    pub fn drain(&self) -> Vec<Command> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
