/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Fly
///   A / Start             →  Next level
///   Start / B             →  Restart (game over screen)
///   Select                →  Quit (game over screen)

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    advance: Vec<Btn>,
    restart: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            advance: vec![Btn::A, Btn::Start],
            restart: vec![Btn::Start, Btn::B],
            quit:    vec![Btn::Select],
        }
    }
}

/// Directional state: index 0..4 = up, down, left, right.
#[derive(Clone, Copy, Debug, Default)]
struct Dirs {
    dpad: [bool; 4],
    stick: [bool; 4],
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Edge flags: set on press, cleared at the start of each `update`.
    just_pressed: [bool; BTN_COUNT],
    dirs: Dirs,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (f32, f32),

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                if let Some((_, pad)) = g.gamepads().next() {
                    log::info!("gamepad connected: {}", pad.name());
                }
                Some(g)
            }
            Err(e) => {
                log::warn!("gamepad backend unavailable: {e}");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            just_pressed: [false; BTN_COUNT],
            dirs: Dirs::default(),
            stick: (0.0, 0.0),
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// action whose list resolves to nothing keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter()
                .filter_map(|s| {
                    let b = Btn::from_name(s);
                    if b.is_none() { log::warn!("unknown gamepad button '{s}' in config"); }
                    b
                })
                .collect()
        }
        let map = &mut self.action_map;
        let adv = parse_list(&cfg.advance);
        if !adv.is_empty() { map.advance = adv; }
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() { map.restart = rs; }
        let q = parse_list(&cfg.quit);
        if !q.is_empty() { map.quit = q; }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick.0 = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick.1 = v,
                EventType::Connected => log::info!("gamepad connected"),
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.release_all();
                }
                _ => {}
            }
        }

        let (x, y) = self.stick;
        self.dirs.stick = [y > STICK_DEADZONE, y < -STICK_DEADZONE, x < -STICK_DEADZONE, x > STICK_DEADZONE];
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(0),
            Button::DPadDown => Some(1),
            Button::DPadLeft => Some(2),
            Button::DPadRight => Some(3),
            _ => None,
        };
        if let Some(i) = dir {
            self.dirs.dpad[i] = held;
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            if held { self.just_pressed[btn as usize] = true; }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn advance_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.advance)
    }
    pub fn restart_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.restart)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }

    fn dir_held(&self, i: usize) -> bool {
        self.dirs.dpad[i] || self.dirs.stick[i]
    }
    pub fn up_held(&self) -> bool { self.dir_held(0) }
    pub fn down_held(&self) -> bool { self.dir_held(1) }
    pub fn left_held(&self) -> bool { self.dir_held(2) }
    pub fn right_held(&self) -> bool { self.dir_held(3) }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dirs = Dirs::default();
        self.stick = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("Z9"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig {
            advance: names(&["X"]),
            restart: names(&["nonsense"]),
            quit: names(&["Y", "Select"]),
        });
        assert_eq!(gp.action_map.advance, vec![Btn::X]);
        // Nothing valid: default kept.
        assert_eq!(gp.action_map.restart, ActionMap::default().restart);
        assert_eq!(gp.action_map.quit, vec![Btn::Y, Btn::Select]);
    }

    #[test]
    fn just_pressed_clears_on_update() {
        let mut gp = GamepadState::new();
        gp.just_pressed[Btn::A as usize] = true;
        assert!(gp.advance_pressed());
        gp.update();
        assert!(!gp.advance_pressed());
    }

    #[test]
    fn stick_or_dpad_counts_as_held() {
        let mut gp = GamepadState::new();
        gp.dirs.dpad[2] = true;
        gp.dirs.stick[0] = true;
        assert!(gp.left_held());
        assert!(gp.up_held());
        assert!(!gp.right_held());
        assert!(!gp.down_held());
    }
}
