//! Pyramid Builder entry point
//!
//! Native builds run a headless session: either the perfect-drop autoplay
//! or a random tapper, logging each placement and the final result. The
//! browser build is driven from JS through `pyramid_builder::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use pyramid_builder::persistence::JsonFileStore;
    use pyramid_builder::platform;
    use pyramid_builder::remote::NullRemote;
    use pyramid_builder::sim::{GameEvent, GamePhase, Session, SpawnSource, StackEngine, TickInput, tick};
    use pyramid_builder::{ScoreKeeper, Settings, Tuning};

    /// Headless Pyramid Builder run
    #[derive(Debug, Parser)]
    #[command(name = "pyramid-builder")]
    #[command(about = "Play a headless Pyramid Builder session and record the score")]
    pub struct Cli {
        /// RNG seed for spawn sides and the random tapper (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Frames to run before stopping
        #[arg(long, default_value_t = 60 * 60 * 5)]
        frames: u64,

        /// Per-frame chance of a random tap
        #[arg(long, default_value_t = 0.04, value_parser = parse_chance)]
        tap_chance: f64,

        /// Tap only when the drop would be perfect
        #[arg(long, default_value_t = false)]
        autoplay: bool,

        /// JSON balance file
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// High score file
        #[arg(long, default_value = "pyramid_highscores.json")]
        scores: PathBuf,
    }

    fn parse_chance(s: &str) -> Result<f64, String> {
        let p: f64 = s.parse().map_err(|_| format!("not a number: {s}"))?;
        if (0.0..=1.0).contains(&p) {
            Ok(p)
        } else {
            Err(format!("must be in [0, 1], got {p}"))
        }
    }

    fn load_tuning(path: Option<&Path>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Tuning::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn run(cli: Cli) -> Result<(), String> {
        let settings = Settings::load();
        let tuning = load_tuning(cli.tuning.as_deref())?;
        let seed = cli.seed.unwrap_or_else(rand::random);

        // No HTTP client on native; the shared board is web only
        if settings.remote_sync {
            log::debug!("Remote sync is only available in the browser build");
        }
        let mut keeper = ScoreKeeper::open(JsonFileStore::new(cli.scores.as_path()), NullRemote);

        let engine = StackEngine::with_tuning(tuning, SpawnSource::seeded(seed));
        let mut session = Session::new(engine).with_effects(settings.effective_popups());
        session.set_best(keeper.best());

        let mut tapper = Pcg32::seed_from_u64(seed ^ 0x5eed);
        log::info!(
            "Seed {} | best {} | {}",
            seed,
            keeper.best(),
            if cli.autoplay { "autoplay" } else { "random taps" }
        );

        tick(&mut session, &TickInput::start());
        for _ in 0..cli.frames {
            if keeper.poll_remote() {
                session.set_best(keeper.best());
            }

            let input = TickInput {
                taps: u32::from(!cli.autoplay && tapper.random_bool(cli.tap_chance)),
                autoplay: cli.autoplay,
                ..Default::default()
            };

            for event in tick(&mut session, &input) {
                match event {
                    GameEvent::Placed(block) => {
                        keeper.observe_score(block.index);
                        log::info!(
                            "#{:<3} width {:>5.2} center {:>5.2}{}{}",
                            block.index,
                            block.width,
                            block.center,
                            if block.is_perfect_drop { " perfect" } else { "" },
                            if block.is_artifact { " artifact" } else { "" },
                        );
                    }
                    GameEvent::Expanded { width, .. } => log::info!("EXPANDED! back to {width:.2}"),
                    GameEvent::NewRecord { score } => log::info!("NEW RECORD! {score}"),
                    _ => {}
                }
            }

            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let score = session.score();
        let stats = session.stats();
        let rank = keeper.finish_run(score, stats.perfect_drops, platform::now_ms());
        println!(
            "{} after {} frames: score {score}, {} perfect (best streak {}), {} artifacts, {} expansions",
            if session.phase() == GamePhase::GameOver { "Game over" } else { "Stopped" },
            session.frame(),
            stats.perfect_drops,
            stats.best_streak,
            stats.artifacts,
            stats.expansions,
        );
        match rank {
            Some(rank) => println!("Leaderboard rank #{rank}, best {}", keeper.best()),
            None => println!("Best {}", keeper.best()),
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    pyramid_builder::platform::init_logging();
    log::info!("Pyramid Builder (native, headless) starting...");

    use clap::Parser;

    let cli = headless::Cli::parse();
    if let Err(e) = headless::run(cli) {
        eprintln!("{e}");
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::WebGame, this is just to satisfy the compiler
}
