/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::KeyCode;
use env_logger::{Env, Target};

use config::GameConfig;
use domain::entity::FrameInput;
use sim::clock::{Clock, MonotonicClock};
use sim::event::GameEvent;
use sim::session::{Phase, Session};
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};
use ui::status::StatusLine;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    let seed = config.seed.unwrap_or_else(seed_from_time);
    log::info!("starting with seed {seed}");

    let clock = MonotonicClock::new();
    let mut session = Session::new(&config, seed, clock.now());

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if let Some(sfx) = sound.as_ref() {
        sfx.play_level_start();
    }

    let result = game_loop(&mut session, &clock, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Butterfly Garden!");
    println!("Final Score: {}  (level {})", session.score, session.level);
}

/// Logs go to `general.log_file` when set. Without one, nothing is logged
/// unless RUST_LOG asks for it, since stderr shares the game screen.
fn init_logging(config: &GameConfig) {
    let file = config.log_file.as_ref().and_then(|path| match File::create(path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            None
        }
    });

    let default_filter = if file.is_some() { "info" } else { "off" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(f) = file {
        builder.target(Target::Pipe(Box::new(f)));
    }
    if let Err(e) = builder.try_init() {
        eprintln!("Warning: logger init failed: {e}");
    }
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn game_loop(
    session: &mut Session,
    clock: &impl Clock,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.keyboard_enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(config.fps));

    // Level 1 was started before the loop; announce it like any other.
    let mut status = StatusLine::new();
    status.observe(
        &[GameEvent::LevelStarted {
            level: session.level,
            flowers: session.flowers.len(),
            time_limit: session.time_limit,
        }],
        clock.now(),
    );

    loop {
        let frame_start = Instant::now();

        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let input = build_input(&kb, &gp, session.phase);
        let now = clock.now();
        let frame = step::update(session, now, &input);
        sound::play_events(sound, &frame.events);
        status.observe(&frame.events, now);
        renderer.render(&frame.snapshot, status.current(now))?;

        if frame.snapshot.exit_requested {
            break;
        }

        std::thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_ADVANCE: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Merge keyboard and gamepad into one frame's input. Esc and the gamepad
/// quit button only exit from the game-over screen.
fn build_input(kb: &InputState, gp: &GamepadState, phase: Phase) -> FrameInput {
    let held = |keys: &[KeyCode]| kb.any_held(keys) || kb.any_pressed(keys);
    let game_over = matches!(phase, Phase::GameOver(_));

    FrameInput {
        up: held(KEYS_UP) || gp.up_held(),
        down: held(KEYS_DOWN) || gp.down_held(),
        left: held(KEYS_LEFT) || gp.left_held(),
        right: held(KEYS_RIGHT) || gp.right_held(),
        advance: kb.any_pressed(KEYS_ADVANCE) || gp.advance_pressed(),
        restart: kb.any_pressed(KEYS_RESTART) || gp.restart_pressed(),
        quit: kb.any_pressed(KEYS_QUIT)
            || (game_over && (kb.any_pressed(&[KeyCode::Esc]) || gp.quit_pressed())),
    }
}
