//! Browser bindings
//!
//! `WebGame` is what the page holds on to. It forwards run notifications to
//! a plain JS object of callbacks (the `gameCallbacks` shape: `pauseGame`,
//! `resumeGame`, `gameOver`, `updateScore`, `collectCoin`, `activatePowerup`,
//! `deactivatePowerup`) and queues UI commands for the next frame.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::bridge::{Command, CommandQueue, UiNotifier};
use crate::game::Game;
use crate::highscores::HighScores;
use crate::sim::PowerupKind;
use crate::tuning::Tuning;

/// Calls into the page's callback object. Missing callbacks are skipped.
pub struct JsNotifier {
    callbacks: JsValue,
}

impl JsNotifier {
    pub fn new(callbacks: JsValue) -> Self {
        Self { callbacks }
    }

    fn call(&self, name: &str, args: &[JsValue]) {
        if !self.callbacks.is_object() {
            return;
        }
        let Ok(value) = js_sys::Reflect::get(&self.callbacks, &JsValue::from_str(name)) else {
            return;
        };
        let Some(func) = value.dyn_ref::<js_sys::Function>() else {
            return;
        };
        let args: js_sys::Array = args.iter().collect();
        if let Err(e) = func.apply(&JsValue::NULL, &args) {
            log::warn!("Callback {} threw: {:?}", name, e);
        }
    }
}

impl UiNotifier for JsNotifier {
    fn on_pause(&mut self) {
        self.call("pauseGame", &[]);
    }

    fn on_resume(&mut self) {
        self.call("resumeGame", &[]);
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.call("gameOver", &[JsValue::from_f64(final_score as f64)]);
    }

    fn on_score_changed(&mut self, score: u64) {
        self.call("updateScore", &[JsValue::from_f64(score as f64)]);
    }

    fn on_coin_collected(&mut self, value: u32) {
        self.call("collectCoin", &[JsValue::from(value)]);
    }

    fn on_powerup_activated(&mut self, kind: PowerupKind, duration_secs: f32) {
        self.call(
            "activatePowerup",
            &[JsValue::from_str(kind.as_str()), JsValue::from_f64(duration_secs as f64)],
        );
    }

    fn on_powerup_deactivated(&mut self, kind: PowerupKind) {
        self.call("deactivatePowerup", &[JsValue::from_str(kind.as_str())]);
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: RefCell<Game<JsNotifier>>,
    commands: CommandQueue,
    high_scores: RefCell<HighScores>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` overrides the default balance when given
    #[wasm_bindgen(constructor)]
    pub fn new(callbacks: JsValue, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(tuning, seed, JsNotifier::new(callbacks))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let commands = game.commands();

        Ok(WebGame {
            game: RefCell::new(game),
            commands,
            high_scores: RefCell::new(HighScores::load()),
        })
    }

    pub fn start(&self) {
        self.commands.push(Command::Start);
    }

    pub fn jump(&self) {
        self.commands.push(Command::Jump);
    }

    pub fn pause(&self) {
        self.commands.push(Command::Pause);
    }

    pub fn resume(&self) {
        self.commands.push(Command::Resume);
    }

    pub fn restart(&self) {
        self.commands.push(Command::Restart);
    }

    /// Queue a command by name (`"jump"`, `"pause"`, ...). Unknown names are rejected.
    pub fn command(&self, name: &str) -> Result<(), JsValue> {
        let command: Command = name.parse().map_err(|e: crate::bridge::UnknownCommand| {
            JsValue::from_str(&e.to_string())
        })?;
        self.commands.push(command);
        Ok(())
    }

    /// Advance one frame. `dt_ms` is the time since the previous frame.
    pub fn frame(&self, dt_ms: f32) {
        // A callback calling back into frame() would re-enter the borrow
        let Ok(mut game) = self.game.try_borrow_mut() else {
            log::warn!("frame() called re-entrantly, skipped");
            return;
        };

        let was_over = game.state.is_game_over();
        game.frame(dt_ms);

        if !was_over && game.state.is_game_over() {
            let mut scores = self.high_scores.borrow_mut();
            if let Some(rank) = scores.record_run(&game.snapshot(), js_sys::Date::now()) {
                log::info!("New local high score, rank {}", rank);
                scores.save();
            }
        }
    }

    /// Current run state as a JSON string
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let game = self
            .game
            .try_borrow()
            .map_err(|_| JsValue::from_str("game is busy"))?;
        serde_json::to_string(&game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = bestScore)]
    pub fn best_score(&self) -> f64 {
        self.high_scores.borrow().best() as f64
    }

    /// Record the high score the server holds for the signed-in user
    #[wasm_bindgen(js_name = setRemoteBest)]
    pub fn set_remote_best(&self, score: f64) {
        if score.is_finite() && score >= 0.0 {
            let mut scores = self.high_scores.borrow_mut();
            scores.set_remote_best(score as u64);
            scores.save();
        }
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Dash Runner loaded");
}
