/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::area::PlayArea;
use crate::domain::placement::PlacementParams;
use crate::domain::rules::{MIN_FLOWER_SPACING, MIN_PLAYER_CLEARANCE};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub play_area: PlayArea,
    pub gameplay: GameplayConfig,
    pub placement: PlacementParams,
    pub fps: u32,
    pub gamepad: GamepadConfig,
    /// Fixed RNG seed for reproducible layouts. `None` = seed from the clock.
    pub seed: Option<u64>,
    /// Log destination. The terminal is in raw mode, so stderr is unusable
    /// while playing.
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GameplayConfig {
    pub butterfly_size: f64,
    pub butterfly_speed: f64,  // units per tick
    pub points_per_flower: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub advance: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    play_area: TomlPlayArea,
    #[serde(default)]
    gameplay: TomlGameplay,
    #[serde(default)]
    placement: TomlPlacement,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPlayArea {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGameplay {
    #[serde(default = "default_butterfly_size")]
    butterfly_size: f64,
    #[serde(default = "default_butterfly_speed")]
    butterfly_speed: f64,
    #[serde(default = "default_points")]
    points_per_flower: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPlacement {
    #[serde(default = "default_spacing")]
    min_spacing: f64,
    #[serde(default = "default_clearance")]
    min_clearance: f64,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    #[serde(default = "default_relax_factor")]
    relax_factor: f64,
    #[serde(default = "default_max_relaxations")]
    max_relaxations: u32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_advance")]
    advance: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_width() -> u32 { 700 }
fn default_height() -> u32 { 800 }
fn default_butterfly_size() -> f64 { 30.0 }
fn default_butterfly_speed() -> f64 { 5.0 }
fn default_points() -> u32 { 50 }
fn default_spacing() -> f64 { MIN_FLOWER_SPACING }
fn default_clearance() -> f64 { MIN_PLAYER_CLEARANCE }
fn default_max_attempts() -> u32 { 2000 }
fn default_relax_factor() -> f64 { 0.8 }
fn default_max_relaxations() -> u32 { 10 }
fn default_fps() -> u32 { 60 }

fn default_advance() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into(), "B".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlPlayArea {
    fn default() -> Self {
        TomlPlayArea { width: default_width(), height: default_height() }
    }
}

impl Default for TomlGameplay {
    fn default() -> Self {
        TomlGameplay {
            butterfly_size: default_butterfly_size(),
            butterfly_speed: default_butterfly_speed(),
            points_per_flower: default_points(),
        }
    }
}

impl Default for TomlPlacement {
    fn default() -> Self {
        TomlPlacement {
            min_spacing: default_spacing(),
            min_clearance: default_clearance(),
            max_attempts: default_max_attempts(),
            relax_factor: default_relax_factor(),
            max_relaxations: default_max_relaxations(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { fps: default_fps() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            advance: default_advance(),
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_from(&candidate_dirs())
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        // Out-of-range knobs are clamped rather than rejected.
        let relax_factor = if cfg.placement.relax_factor > 0.0 && cfg.placement.relax_factor < 1.0 {
            cfg.placement.relax_factor
        } else {
            default_relax_factor()
        };

        GameConfig {
            play_area: PlayArea::new(cfg.play_area.width, cfg.play_area.height),
            gameplay: GameplayConfig {
                butterfly_size: cfg.gameplay.butterfly_size.max(0.0),
                butterfly_speed: cfg.gameplay.butterfly_speed.max(0.0),
                points_per_flower: cfg.gameplay.points_per_flower,
            },
            placement: PlacementParams {
                spacing: cfg.placement.min_spacing.max(0.0),
                clearance: cfg.placement.min_clearance.max(0.0),
                max_attempts: cfg.placement.max_attempts.max(1),
                relax_factor,
                max_relaxations: cfg.placement.max_relaxations,
            },
            fps: cfg.timing.fps.clamp(1, 240),
            gamepad: GamepadConfig {
                advance: cfg.gamepad.advance,
                restart: cfg.gamepad.restart,
                quit: cfg.gamepad.quit,
            },
            seed: cfg.general.seed,
            log_file: cfg.general.log_file.filter(|s| !s.is_empty()).map(PathBuf::from),
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories. The first readable
/// file wins. Runs before the logger exists, so problems go to stderr.
fn load_from(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::parse(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return GameConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    GameConfig::default()
}
