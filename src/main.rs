use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lantern_crawl::constants::TICKS_PER_SECOND;
use lantern_crawl::events::SoundSink;
use lantern_crawl::player::PlayerInput;
use lantern_crawl::render::RecordingCanvas;
use lantern_crawl::{GameConfig, GameSession, SessionInput, SessionState};

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Headless lantern-crawl runner", long_about = None)]
struct Args {
    /// Level seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 60 * TICKS_PER_SECOND)]
    ticks: u32,

    /// JSON file with tuning overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record puffin profiling scopes
    #[arg(long, default_value_t = false)]
    profile: bool,
}

/// Logs sounds instead of playing them
struct LogSound;

impl SoundSink for LogSound {
    fn play(&mut self, name: &str) {
        info!(sound = name, "play");
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Walk straight at the exit with the light pointed ahead
fn bot_input(session: &GameSession) -> SessionInput {
    let from = session.player.center();
    let to = session.level.dungeon.exit.center();
    let d = to - from;

    SessionInput {
        player: PlayerInput {
            dx: axis(d.x),
            dy: axis(d.y),
            aim: Some(to),
            toggle_light: false,
        },
        restart: session.state() == SessionState::GameOver && session.message_timer() == 0,
        advance: session.state() == SessionState::LevelComplete && session.message_timer() == 0,
        zoom: 0.0,
    }
}

fn axis(d: f32) -> f32 {
    if d.abs() < 1.0 {
        0.0
    } else {
        d.signum()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    puffin::set_scopes_on(args.profile);

    let mut session = GameSession::new(config, args.seed).with_sound(Box::new(LogSound));
    let mut canvas = RecordingCanvas::new();
    let mut deaths = 0u32;
    let mut last_state = session.state();

    for tick in 0..args.ticks {
        puffin::GlobalProfiler::lock().new_frame();

        let input = bot_input(&session);
        let state = session.tick(&input);
        if state != last_state && state == SessionState::GameOver {
            deaths += 1;
        }
        last_state = state;

        canvas.clear();
        session.draw(&mut canvas);

        if tick % TICKS_PER_SECOND == 0 {
            let p: Vec2 = session.player.center();
            info!(
                tick,
                x = p.x,
                y = p.y,
                battery = session.player.flashlight.battery,
                enemies = session.level.enemies.len(),
                draw_calls = canvas.calls.len(),
                "status"
            );
        }
    }

    info!(
        seed = session.seed(),
        levels_completed = session.levels_completed(),
        deaths,
        "run finished"
    );
    Ok(())
}
