//! Browser bindings
//!
//! JS owns the frame scheduler and the DOM. Each animation frame it calls
//! [`WebGame::frame`] with the taps it collected and paints the returned
//! JSON view. High scores live in LocalStorage; the shared board is an
//! optional GET endpoint.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::highscores::ScoreKeeper;
use crate::persistence::LocalStorageStore;
use crate::remote::{NullRemote, RemoteSync, SheetRemote};
use crate::settings::Settings;
use crate::sim::{
    Effect, EngineState, GameEvent, GamePhase, Session, SpawnSource, StackEngine, TickInput, tick,
};
use crate::tuning::Tuning;

/// Everything the page needs to paint one frame
#[derive(Serialize)]
struct GameView<'a> {
    phase: GamePhase,
    state: EngineState,
    best: u32,
    /// Best at the start of the run, for the "beat N" hint
    target: u32,
    next_is_artifact: bool,
    /// Leaderboard rank the current score would take
    rank: Option<usize>,
    camera_rows: usize,
    effects: Vec<&'a Effect>,
    game_over: bool,
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    keeper: ScoreKeeper<LocalStorageStore, Box<dyn RemoteSync>>,
    settings: Settings,
    target: u32,
}

#[wasm_bindgen]
impl WebGame {
    /// `board_url`: optional shared best-score endpoint
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, board_url: Option<String>) -> WebGame {
        crate::platform::init_logging();
        let settings = Settings::load();

        let remote: Box<dyn RemoteSync> = match board_url {
            Some(url) if settings.remote_sync => Box::new(SheetRemote::new(url)),
            _ => Box::new(NullRemote),
        };
        let keeper = ScoreKeeper::open(LocalStorageStore::new(), remote);

        let engine = StackEngine::with_tuning(Tuning::default(), SpawnSource::seeded(seed));
        let mut session = Session::new(engine).with_effects(settings.effective_popups());
        session.set_best(keeper.best());

        log::info!("Pyramid Builder ready (best {})", keeper.best());
        WebGame {
            session,
            target: keeper.best(),
            keeper,
            settings,
        }
    }

    /// Update and persist preferences. Popups apply immediately; remote
    /// sync takes effect on the next page load.
    pub fn set_settings(&mut self, popups: bool, remote_sync: bool, reduced_motion: bool) {
        self.settings = Settings {
            popups,
            remote_sync,
            reduced_motion,
        };
        self.settings.save();
        self.session.set_effects(self.settings.effective_popups());
    }

    /// Current preferences as JSON
    pub fn settings(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_default()
    }

    /// Run one frame. Returns the view as JSON.
    pub fn frame(&mut self, taps: u32, start: bool, pause: bool) -> String {
        if self.keeper.poll_remote() && self.session.phase() != GamePhase::Playing {
            self.session.set_best(self.keeper.best());
        }
        if start && self.session.phase() != GamePhase::Playing {
            self.session.set_best(self.keeper.best());
            self.target = self.keeper.best();
        }

        let input = TickInput {
            start,
            taps,
            pause,
            autoplay: false,
        };
        for event in tick(&mut self.session, &input) {
            match event {
                GameEvent::Placed(block) => self.keeper.observe_score(block.index),
                GameEvent::GameOver { score } => {
                    let perfect = self.session.stats().perfect_drops;
                    self.keeper
                        .finish_run(score, perfect, crate::platform::now_ms());
                }
                _ => {}
            }
        }

        self.view()
    }

    pub fn best(&self) -> u32 {
        self.keeper.best()
    }

    /// Current view as JSON without advancing
    pub fn view(&self) -> String {
        let state = self.session.snapshot();
        let view = GameView {
            phase: self.session.phase(),
            best: self.keeper.best(),
            target: self.target,
            next_is_artifact: self.session.engine().next_is_artifact(),
            rank: self.keeper.potential_rank(state.score),
            camera_rows: state.camera_rows(),
            effects: self.session.effects().iter().collect(),
            game_over: state.game_over,
            state,
        };
        serde_json::to_string(&view).unwrap_or_default()
    }
}
