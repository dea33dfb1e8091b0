/// Explicit configuration: theme palette, board layout, animation tuning and key bindings
use std::path::Path;

use anyhow::{ensure, Context, Result};
use crossterm::event::KeyCode;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::board::GRID_SIZE;
use super::geometry::BoardGeometry;
use crate::core::renderer::Color;

/// Names accepted by [`Theme::preset`]
pub const THEME_NAMES: [&str; 3] = ["classic", "modern", "cyberpunk"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub title: String,
    pub background: Color,
    pub grid: Color,
    pub x_color: Color,
    pub o_color: Color,
    pub hover: Color,
    pub win_line: Color,
    pub text: Color,
    pub button: Color,
    pub button_hover: Color,
    /// Tint of the offset copies drawn while the glitch timer runs
    pub glitch: Color,
    pub particle_colors: Vec<Color>,
    /// Particles spawned when someone wins
    pub win_burst: usize,
    /// Particles spawned on a draw
    pub draw_burst: usize,
    /// Extra translucent strokes drawn around marks and the winning line
    pub glow_layers: u8,
    /// Shake intensity (pixels) set on a win, 0 disables
    pub shake_on_win: f32,
    /// Glitch duration (frames) set on a win, 0 disables
    pub glitch_on_win: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}

impl Theme {
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            "cyberpunk" => Some(Self::cyberpunk()),
            _ => None,
        }
    }

    pub fn classic() -> Self {
        Self {
            name: "classic".into(),
            title: "TIC TAC TOE".into(),
            background: Color::rgb(28, 170, 156),
            grid: Color::rgb(23, 145, 135),
            x_color: Color::rgb(66, 66, 66),
            o_color: Color::rgb(239, 231, 200),
            hover: Color::rgb(40, 185, 170),
            win_line: Color::rgb(255, 255, 255),
            text: Color::rgb(255, 255, 255),
            button: Color::rgb(23, 145, 135),
            button_hover: Color::rgb(66, 66, 66),
            glitch: Color::rgb(255, 255, 255),
            particle_colors: vec![Color::rgb(239, 231, 200), Color::rgb(66, 66, 66)],
            win_burst: 30,
            draw_burst: 10,
            glow_layers: 0,
            shake_on_win: 0.0,
            glitch_on_win: 0.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            name: "modern".into(),
            title: "TIC TAC TOE".into(),
            background: Color::rgb(15, 23, 42),
            grid: Color::rgb(71, 85, 105),
            x_color: Color::rgb(239, 68, 68),
            o_color: Color::rgb(59, 130, 246),
            hover: Color::rgb(51, 65, 85),
            win_line: Color::rgb(250, 204, 21),
            text: Color::rgb(248, 250, 252),
            button: Color::rgb(100, 116, 139),
            button_hover: Color::rgb(148, 163, 184),
            glitch: Color::rgb(248, 250, 252),
            particle_colors: vec![
                Color::rgb(250, 204, 21),
                Color::rgb(251, 146, 60),
                Color::rgb(239, 68, 68),
                Color::rgb(168, 85, 247),
            ],
            win_burst: 50,
            draw_burst: 20,
            glow_layers: 0,
            shake_on_win: 0.0,
            glitch_on_win: 0.0,
        }
    }

    pub fn cyberpunk() -> Self {
        Self {
            name: "cyberpunk".into(),
            title: "TIC//TAC//TOE".into(),
            background: Color::rgb(10, 4, 24),
            grid: Color::rgb(0, 255, 255),
            x_color: Color::rgb(255, 0, 128),
            o_color: Color::rgb(0, 255, 170),
            hover: Color::rgb(40, 16, 72),
            win_line: Color::rgb(255, 240, 0),
            text: Color::rgb(230, 230, 255),
            button: Color::rgb(120, 0, 180),
            button_hover: Color::rgb(255, 0, 128),
            glitch: Color::rgb(0, 255, 255),
            particle_colors: vec![
                Color::rgb(255, 0, 128),
                Color::rgb(0, 255, 255),
                Color::rgb(255, 240, 0),
                Color::rgb(170, 0, 255),
            ],
            win_burst: 80,
            draw_burst: 30,
            glow_layers: 2,
            shake_on_win: 12.0,
            glitch_on_win: 20.0,
        }
    }

    pub fn mark_color(&self, player: super::board::Player) -> Color {
        match player {
            super::board::Player::X => self.x_color,
            super::board::Player::O => self.o_color,
        }
    }
}

/// Per-frame animation constants, in 60 Hz frame units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub mark_pop_step: f32,
    pub sweep_step: f32,
    pub gravity: f32,
    pub particle_lifetime: f32,
    pub particle_vx: [f32; 2],
    pub particle_vy: [f32; 2],
    pub particle_radius: [f32; 2],
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            mark_pop_step: 0.15,
            sweep_step: 0.05,
            gravity: 0.3,
            particle_lifetime: 60.0,
            particle_vx: [-5.0, 5.0],
            particle_vy: [-8.0, -2.0],
            particle_radius: [4.0, 8.0],
        }
    }
}

impl Animation {
    /// Reject values that would stall or break the effects: non-finite numbers,
    /// negative lifetimes and ranges too wide to sample
    pub fn validate(&self) -> Result<()> {
        let steps = [
            ("mark_pop_step", self.mark_pop_step),
            ("sweep_step", self.sweep_step),
            ("gravity", self.gravity),
            ("particle_lifetime", self.particle_lifetime),
        ];
        for (field, value) in steps {
            ensure!(value.is_finite(), "{field} must be finite, got {value}");
        }
        ensure!(
            self.particle_lifetime >= 0.0,
            "particle_lifetime must not be negative, got {}",
            self.particle_lifetime
        );

        let ranges = [
            ("particle_vx", self.particle_vx),
            ("particle_vy", self.particle_vy),
            ("particle_radius", self.particle_radius),
        ];
        for (field, [lo, hi]) in ranges {
            ensure!(
                lo.is_finite() && hi.is_finite() && (hi - lo).is_finite(),
                "{field} must be a finite range, got [{lo}, {hi}]"
            );
        }
        ensure!(
            self.particle_radius.iter().all(|r| *r >= 0.0),
            "particle_radius must not be negative, got {:?}",
            self.particle_radius
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Restart,
    Quit,
    /// Clear the session scoreboard
    ResetScores,
    /// Play the current player's mark at (row, col)
    Place(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub command: Command,
}

/// Table of key -> command. Letters match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(Vec<KeyBinding>);

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = vec![
            KeyBinding { key: KeyCode::Char('r'), command: Command::Restart },
            KeyBinding { key: KeyCode::Char('q'), command: Command::Quit },
            KeyBinding { key: KeyCode::Char('c'), command: Command::ResetScores },
        ];
        // 1-9 in reading order, top-left to bottom-right
        for (digit, index) in ('1'..='9').zip(0..GRID_SIZE * GRID_SIZE) {
            bindings.push(KeyBinding {
                key: KeyCode::Char(digit),
                command: Command::Place(index / GRID_SIZE, index % GRID_SIZE),
            });
        }
        Self(bindings)
    }
}

impl KeyBindings {
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self(bindings)
    }

    pub fn command_for(&self, key: KeyCode) -> Option<Command> {
        let key = match key {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        self.0.iter().find_map(|b| {
            let bound = match b.key {
                KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
                other => other,
            };
            (bound == key).then_some(b.command)
        })
    }

    /// Labels for the help line, e.g. "[R] Restart". Cell keys collapse into one "[1-9] Place".
    pub fn describe(&self) -> Vec<String> {
        let label = |key: KeyCode| match key {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            other => other.to_string(),
        };

        let mut lines: Vec<String> = self
            .0
            .iter()
            .filter(|b| !matches!(b.command, Command::Place(..)))
            .map(|b| format!("[{}] {:?}", label(b.key), b.command))
            .collect();

        let places: Vec<String> = self
            .0
            .iter()
            .filter(|b| matches!(b.command, Command::Place(..)))
            .map(|b| label(b.key))
            .collect();
        match places.as_slice() {
            [] => {}
            [only] => lines.push(format!("[{only}] Place")),
            [first, .., last] => lines.push(format!("[{first}-{last}] Place")),
        }
        lines
    }

    fn validate(&self) -> Result<()> {
        for binding in &self.0 {
            if let Command::Place(row, col) = binding.command {
                ensure!(
                    row < GRID_SIZE && col < GRID_SIZE,
                    "key {} places off the board at ({row}, {col})",
                    binding.key
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `name` picks the preset the other fields override
    #[serde(deserialize_with = "theme_over_preset")]
    pub theme: Theme,
    pub geometry: BoardGeometry,
    pub animation: Animation,
    pub keys: KeyBindings,
}

impl Config {
    /// Default layout with a built-in theme. Unknown names fall back to `modern`.
    pub fn with_theme(name: &str) -> Self {
        let theme = Theme::preset(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme, falling back to modern");
            Theme::modern()
        });
        Self { theme, ..Self::default() }
    }

    /// Load a JSON config; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.animation.validate().context("invalid animation settings")?;
        config.keys.validate().context("invalid key bindings")?;
        Ok(config)
    }
}

/// Start from the preset named by `name` (modern when absent or unknown) and apply the given fields on top
fn theme_over_preset<'de, D: Deserializer<'de>>(de: D) -> Result<Theme, D::Error> {
    let overrides = serde_json::Map::<String, serde_json::Value>::deserialize(de)?;
    let base = overrides
        .get("name")
        .and_then(serde_json::Value::as_str)
        .and_then(Theme::preset)
        .unwrap_or_default();

    let serde_json::Value::Object(mut merged) = serde_json::to_value(base).map_err(D::Error::custom)? else {
        return Err(D::Error::custom("theme is not a JSON object"));
    };
    merged.extend(overrides);
    serde_json::from_value(serde_json::Value::Object(merged)).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_found_by_name() {
        for name in THEME_NAMES {
            assert_eq!(Theme::preset(name).map(|t| t.name), Some(name.to_string()));
        }
        assert_eq!(Theme::preset("CyberPunk").map(|t| t.glow_layers), Some(2));
        assert!(Theme::preset("vaporwave").is_none());
    }

    #[test]
    fn unknown_theme_falls_back_to_modern() {
        assert_eq!(Config::with_theme("nope").theme, Theme::modern());
    }

    #[test]
    fn default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.command_for(KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(keys.command_for(KeyCode::Char('R')), Some(Command::Restart));
        assert_eq!(keys.command_for(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(keys.command_for(KeyCode::Char('c')), Some(Command::ResetScores));
        assert_eq!(keys.command_for(KeyCode::Char('1')), Some(Command::Place(0, 0)));
        assert_eq!(keys.command_for(KeyCode::Char('5')), Some(Command::Place(1, 1)));
        assert_eq!(keys.command_for(KeyCode::Char('9')), Some(Command::Place(2, 2)));
        assert_eq!(keys.command_for(KeyCode::Char('0')), None);
        assert_eq!(keys.command_for(KeyCode::Char('z')), None);
        assert_eq!(keys.command_for(KeyCode::Enter), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{
                "theme": { "name": "mine", "win_burst": 5 },
                "geometry": { "cell_size": 100.0 },
                "keys": [ { "key": "Enter", "command": "Restart" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.theme.name, "mine");
        assert_eq!(config.theme.win_burst, 5);
        assert_eq!(config.theme.background, Theme::modern().background);
        assert_eq!(config.geometry.cell_size, 100.0);
        assert_eq!(config.geometry.offset_x, 30.0);
        assert_eq!(config.animation, Animation::default());
        assert_eq!(config.keys.command_for(KeyCode::Enter), Some(Command::Restart));
        assert_eq!(config.keys.command_for(KeyCode::Char('r')), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json("{ theme: ").is_err());
    }

    #[test]
    fn help_line_collapses_cell_keys() {
        assert_eq!(
            KeyBindings::default().describe(),
            ["[R] Restart", "[Q] Quit", "[C] ResetScores", "[1-9] Place"]
        );
    }

    #[test]
    fn theme_name_selects_the_base_preset() {
        let config = Config::from_json(r#"{ "theme": { "name": "cyberpunk", "win_burst": 5 } }"#).unwrap();
        assert_eq!(config.theme.background, Theme::cyberpunk().background);
        assert_eq!(config.theme.glow_layers, 2);
        assert_eq!(config.theme.win_burst, 5);
    }

    #[test]
    fn overflowing_particle_range_is_rejected() {
        // -1e39 is past f32::MIN and parses as -inf
        let err = Config::from_json(r#"{ "animation": { "particle_vx": [-1e39, 5.0] } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("particle_vx"));

        let err = Config::from_json(r#"{ "animation": { "particle_lifetime": -1.0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("particle_lifetime"));
    }

    #[test]
    fn off_board_place_binding_is_rejected() {
        let err = Config::from_json(r#"{ "keys": [ { "key": { "Char": "0" }, "command": { "Place": [3, 0] } } ] }"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("off the board"));
    }
}
