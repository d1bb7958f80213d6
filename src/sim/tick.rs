//! Per-frame run loop
//!
//! Applies buffered UI commands at the tick boundary, then advances the run:
//! distance and speed, score, spawner, powerup timers, entity motion,
//! player, and finally overlap resolution.

use super::collision::{self, Resolution};
use super::pool::{Pool, Poolable};
use super::state::{GameEvent, GamePhase, GameState, PowerupKind};
use crate::bridge::Command;

/// Commands collected since the previous tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn single(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }
}

/// Advance the run by `dt_ms` milliseconds of simulated time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    for &command in &input.commands {
        apply_command(state, command);
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let dt_ms = if dt_ms >= 0.0 {
        dt_ms
    } else {
        log::warn!("Negative tick delta {} clamped to 0", dt_ms);
        0.0
    };
    let dt_secs = dt_ms / 1000.0;
    state.elapsed_ms += dt_ms as f64;

    // Distance uses the speed from the start of the tick
    state.distance += state.game_speed * dt_secs;
    state.game_speed += dt_ms * state.tuning.acceleration;
    if let Some(cap) = state.tuning.speed_cap {
        state.game_speed = state.game_speed.min(cap);
    }
    update_score(state);

    let travelled = state.game_speed * dt_secs;
    state.spawner.advance(
        travelled,
        &state.tuning,
        &mut state.rng,
        &mut state.world,
        &state.powerups,
    );

    state.powerups.advance(dt_secs, &mut state.player, &mut state.events);

    scroll_pool(&mut state.world.obstacles, travelled);
    scroll_pool(&mut state.world.pickups, travelled);
    let magnet = state
        .powerups
        .is_active(PowerupKind::Magnet)
        .then_some(state.tuning.magnet_radius);
    collision::update_coins(
        &mut state.world.coins,
        state.player.pos,
        magnet,
        state.game_speed,
        dt_secs,
    );

    state.player.update(dt_secs, state.tuning.ground_y());

    resolve_overlaps(state);
}

fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Start => {
            if state.phase == GamePhase::Idle {
                start_run(state);
            }
        }
        Command::Restart => {
            state.reset();
            start_run(state);
        }
        Command::Pause => {
            if state.phase == GamePhase::Running {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
            }
        }
        Command::Resume => {
            if state.phase == GamePhase::Paused {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
            }
        }
        Command::Jump => {
            if state.phase == GamePhase::Running {
                state.player.jump();
            }
        }
    }
}

fn start_run(state: &mut GameState) {
    state.phase = GamePhase::Running;
    log::info!("Run started (seed {})", state.seed);
}

/// Recompute the score and notify when it changed
fn update_score(state: &mut GameState) {
    let score = state.computed_score();
    if score != state.score {
        state.score = score;
        state.events.push(GameEvent::ScoreChanged { score });
    }
}

/// Move every active entity left and release the ones that left the screen
fn scroll_pool<T: Poolable>(pool: &mut Pool<T>, dx: f32) {
    let mut offscreen = Vec::new();
    for (id, entity) in pool.iter_active_mut() {
        let body = entity.body_mut();
        body.pos.x -= dx;
        if body.is_offscreen_left() {
            offscreen.push(id);
        }
    }
    for id in offscreen {
        pool.release(id);
    }
}

fn resolve_overlaps(state: &mut GameState) {
    for contact in collision::find_contacts(&state.player, &state.world) {
        let resolution = collision::resolve_contact(
            contact,
            &mut state.world,
            &mut state.powerups,
            &mut state.player,
            state.tuning.coin_value,
            &mut state.events,
        );
        match resolution {
            Resolution::Fatal => {
                end_run(state);
                return;
            }
            Resolution::Coin { value } => {
                state.coins += value as u64;
                state.coins_collected += 1;
                state.events.push(GameEvent::CoinCollected { value });
                update_score(state);
            }
            Resolution::Shielded | Resolution::Powerup(_) | Resolution::Stale => {}
        }
    }
}

/// Freeze the run and report the final score
fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over: score {} distance {:.0} coins {}",
        state.score,
        state.distance,
        state.coins
    );
    state.events.push(GameEvent::GameOver {
        final_score: state.score,
    });
}
