//! Frame driver
//!
//! Owns the run state, the UI notifier and the command queue. The host
//! calls [`Game::frame`] once per rendered frame with the elapsed time.

use crate::bridge::{self, Command, CommandQueue, UiNotifier};
use crate::sim::{GameState, RunSnapshot, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Longest frame the driver will simulate (tab switches, debugger pauses)
pub const MAX_FRAME_MS: f32 = 100.0;

pub struct Game<N: UiNotifier> {
    pub state: GameState,
    notifier: N,
    commands: CommandQueue,
}

impl<N: UiNotifier> Game<N> {
    /// Build a driver for an idle run. `tuning.seed` overrides `seed`.
    pub fn new(tuning: Tuning, seed: u64, notifier: N) -> Result<Self, TuningError> {
        tuning.validate()?;
        let seed = tuning.seed.unwrap_or(seed);
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state: GameState::new(tuning, seed),
            notifier,
            commands: CommandQueue::new(),
        })
    }

    /// Handle for pushing commands from UI callbacks
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Queue a command for the next frame
    pub fn send(&self, command: Command) {
        self.commands.push(command);
    }

    /// Apply pending commands, advance one tick, then notify the UI
    pub fn frame(&mut self, dt_ms: f32) {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            log::warn!("Non-finite frame delta {} ignored", dt_ms);
            0.0
        };
        let input = TickInput::new(self.commands.drain());
        tick(&mut self.state, &input, dt_ms);

        let events = std::mem::take(&mut self.state.events);
        bridge::dispatch(events, &mut self.notifier);
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.state.snapshot()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
