//! Terminal Starfire runner (default binary).
//!
//! Fixed-timestep loop over crossterm events and the framebuffer renderer.
//! Logging goes to stderr via `env_logger`; run with `RUST_LOG=debug` and a
//! redirected stderr to capture it without disturbing the alternate screen.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use tui_starfire::core::{default_starfield, parse_chunks, Chunk, Config, Scoreboard, State};
use tui_starfire::input::{should_quit, InputHandler};
use tui_starfire::term::{compose_frame, TerminalRenderer, Viewport};
use tui_starfire::types::{FIELD_WIDTH, TICK_MS};

const CONFIG_PATH: &str = "starfire.toml";
const SCORES_PATH: &str = "starfire_scores.csv";
const BACKDROP_PATH: &str = "starfire_bg.txt";

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config(Path::new(CONFIG_PATH))?;
    let mut scores = load_scores(Path::new(SCORES_PATH));
    let backdrop = load_backdrop(Path::new(BACKDROP_PATH));

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1);

    let mut term = TerminalRenderer::stdout();
    term.enter()?;

    let result = run(&mut term, config, seed, backdrop, &mut scores);

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Err(err) = fs::write(SCORES_PATH, scores.to_csv_string()) {
        warn!("could not save scoreboard: {err}");
    }
    if let Some((name, best)) = scores.best() {
        println!("best run: {best} ({name})");
    }
    result
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let text = fs::read_to_string(path)?;
        let config = Config::from_toml_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

fn load_backdrop(path: &Path) -> Vec<Chunk> {
    match fs::read_to_string(path) {
        Ok(text) => match parse_chunks(&text, FIELD_WIDTH as usize) {
            Ok(chunks) => {
                info!("loaded backdrop from {}", path.display());
                chunks
            }
            Err(err) => {
                warn!("ignoring backdrop {}: {err}", path.display());
                default_starfield()
            }
        },
        Err(_) => default_starfield(),
    }
}

fn load_scores(path: &Path) -> Scoreboard {
    match fs::read_to_string(path) {
        Ok(text) => Scoreboard::from_csv_str(&text).unwrap_or_else(|err| {
            warn!("ignoring scoreboard {}: {err}", path.display());
            Scoreboard::default()
        }),
        Err(_) => Scoreboard::default(),
    }
}

fn run(
    term: &mut TerminalRenderer,
    config: Config,
    seed: u32,
    backdrop: Vec<Chunk>,
    scores: &mut Scoreboard,
) -> Result<()> {
    let mut state = State::with_backdrop(seed, config, backdrop);
    state.start();

    let mut input_handler = InputHandler::new();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut run_recorded = false;

    loop {
        // Render, then retire anything that drifted past the field edge.
        let (w, h) = crossterm::terminal::size().unwrap_or((100, 30));
        let (mut fb, obsolete) = compose_frame(&state, Viewport::new(w, h));
        term.present(&mut fb)?;
        for id in obsolete {
            state.remove_obsolete(id);
        }

        // Input with timeout until the next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = input_handler.handle_key_press(key) {
                            state.apply_action(action);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = input_handler.handle_key_release(key.code) {
                            state.apply_action(action);
                        }
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for action in input_handler.update(TICK_MS) {
                state.apply_action(action);
            }
            state.tick(TICK_MS);

            if state.game_over() && !run_recorded {
                info!("run over at {} points", state.score());
                scores.record("pilot", state.score());
                run_recorded = true;
            }
            if !state.game_over() {
                run_recorded = false;
            }
        }
    }
}
