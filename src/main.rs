//! Sat Defense entry point
//!
//! The browser build starts the canvas adapter. Natively the game runs
//! headless on a fixed frame clock so a whole session can be followed
//! through the logs.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    sat_defense::platform::web::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sat_defense::renderer::{DrawList, stats_text};
    use sat_defense::{Game, Settings, autoplay};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sat Defense (native, headless) starting...");

    let settings = Settings::load();
    let mut game = Game::new(&settings);
    let mut surface = DrawList::new();

    let mut now = 0;
    let mut frames = 0;
    while frames < settings.max_frames {
        now += settings.frame_ms;
        frames += 1;
        if settings.autoplay {
            if let Some(event) = autoplay::decide(game.state(), now) {
                let _ = game.handle(event, now);
            }
        }
        if !game.frame(now, &mut surface) {
            break;
        }
        game.drain_events();
    }

    let state = game.state();
    println!("Session ended after {} frames ({} ms)", frames, now);
    println!("{}", stats_text(state));
    println!(
        "{}",
        if state.game_over {
            "Game over"
        } else {
            "Still standing"
        }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
