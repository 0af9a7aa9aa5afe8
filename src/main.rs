//! Stick Bridge entry point
//!
//! Native: headless autoplay run that logs each round.
//! Web: exports a `WebGame` handle the page's renderer and overlay drive.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use stick_bridge::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use stick_bridge::sim::{GameSession, QuizResponder, TickInput, tick};
    use stick_bridge::{GameConfig, QuizError};

    /// Game handle owned by the page
    #[wasm_bindgen]
    pub struct WebGame {
        session: GameSession,
        responder: Option<QuizResponder>,
        input: TickInput,
        last_time: f64,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64) -> Result<WebGame, JsValue> {
            let config = match LocalStore::open() {
                Ok(store) => GameConfig::load(&store),
                Err(_) => GameConfig::default(),
            };
            let store: Box<dyn KeyValueStore> = match LocalStore::open() {
                Ok(store) => Box::new(store),
                Err(e) => {
                    log::warn!("LocalStorage unavailable ({}), best score won't persist", e);
                    Box::new(MemoryStore::new())
                }
            };
            let session = GameSession::with_store(config, seed, store)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            log::info!("Game initialized with seed: {}", seed);
            Ok(WebGame {
                session,
                responder: None,
                input: TickInput::default(),
                last_time: 0.0,
            })
        }

        pub fn hold_start(&mut self) {
            self.input.hold_start = true;
        }

        pub fn hold_end(&mut self) {
            self.input.hold_end = true;
        }

        pub fn restart(&mut self) {
            self.responder = None;
            self.session.restart();
        }

        pub fn set_player_name(&mut self, name: &str) {
            self.session.set_player_name(name);
        }

        /// Advance to `now_ms` (requestAnimationFrame time)
        pub fn frame(&mut self, now_ms: f64) {
            let dt = if self.last_time > 0.0 {
                ((now_ms - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = now_ms;

            let input = std::mem::take(&mut self.input);
            tick(&mut self.session, &input, dt);
            self.session.advance_quiz_clock(dt);
            if let Some(prompt) = self.session.take_quiz_prompt() {
                self.responder = Some(prompt.responder);
            }
        }

        /// Submit a quiz choice. Returns false if no quiz accepts it.
        pub fn answer(&mut self, value: u32) -> bool {
            let Some(responder) = self.responder.as_ref() else {
                return false;
            };
            match responder.answer(value) {
                Ok(()) => {
                    self.responder = None;
                    true
                }
                Err(e @ QuizError::OutOfRange(_)) => {
                    log::warn!("Answer rejected: {}", e);
                    false
                }
                Err(e) => {
                    log::warn!("Answer rejected: {}", e);
                    self.responder = None;
                    false
                }
            }
        }

        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
        }

        /// Names of the sound cues emitted since the last call
        pub fn drain_cues(&mut self) -> Vec<String> {
            self.session
                .drain_events()
                .iter()
                .map(|e| e.name().to_string())
                .collect()
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Stick Bridge starting...");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use stick_bridge::Variant;

    #[derive(Parser, Debug)]
    #[command(name = "stick-bridge")]
    #[command(about = "Headless Stick Bridge run driven by the autopilot", long_about = None)]
    pub struct Args {
        /// RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Simulated seconds to play
        #[arg(long, default_value_t = 120.0)]
        pub seconds: f32,

        /// Game variant: classic or legged
        #[arg(long, default_value = "legged", value_parser = parse_variant)]
        pub variant: Variant,
    }

    pub fn parse_variant(s: &str) -> Result<Variant, String> {
        Variant::from_str(s).ok_or_else(|| format!("unknown variant '{}' (classic, legged)", s))
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use stick_bridge::GameConfig;
    use stick_bridge::autoplay::{AimPoint, Autopilot};
    use stick_bridge::sim::{GameEvent, GameSession, tick};

    env_logger::init();

    let args = cli::Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let seconds = args.seconds;
    let variant = args.variant;

    log::info!(
        "Stick Bridge (native) headless run: seed={} seconds={} variant={}",
        seed,
        seconds,
        variant.as_str()
    );

    let mut session = match GameSession::new(GameConfig::from_variant(variant), seed) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    session.set_player_name("Autopilot");
    let mut bot = Autopilot::new(seed ^ 0x5eed)
        .with_aim(AimPoint::PerfectZone, 14.0)
        .with_quiz_accuracy(0.75);

    // Alternate frame lengths to exercise the variable timestep
    let frame_dts = [1.0 / 60.0, 1.0 / 60.0, 1.0 / 45.0, 1.0 / 30.0];
    let mut elapsed = 0.0;
    let mut frame = 0usize;
    let mut rounds = 0u32;
    let mut perfects = 0u32;

    while elapsed < seconds {
        let dt = frame_dts[frame % frame_dts.len()];
        let input = bot.input(&session, dt);
        tick(&mut session, &input, dt);
        session.advance_quiz_clock(dt);
        if let Some(prompt) = session.take_quiz_prompt() {
            if let Err(e) = bot.answer(prompt) {
                log::warn!("Autopilot answer rejected: {}", e);
            }
        }

        for event in session.drain_events() {
            match event {
                GameEvent::Perfect => perfects += 1,
                GameEvent::Fail => rounds += 1,
                _ => {}
            }
        }

        elapsed += dt;
        frame += 1;
    }

    let snap = session.snapshot();
    println!(
        "{}: {} frames, {} rounds lost, {} perfect landings, score {} (level {}), best {}",
        snap.player_name,
        frame,
        rounds,
        perfects,
        snap.score,
        snap.level,
        snap.best
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
