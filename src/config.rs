// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};

use crate::particle::MagnitudeStrategy;

// ====================
// World
// ====================
pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;
/// Grid resolution of the neighbor search
pub const DEFAULT_GRID_ROWS: usize = 20;
pub const DEFAULT_GRID_COLS: usize = 20;

// ====================
// Physics
// ====================
pub const DEFAULT_GRAVITY: f64 = 0.0;
pub const DEFAULT_AIR_RES: f64 = 0.05;
pub const DEFAULT_GROUND_FRICTION: f64 = 0.0;
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_SPEED: f64 = 1.0;
/// Upper bound on |acceleration| per tick before noise is added
pub const MAX_ACCELERATION: f64 = 2.0;
/// Standard deviation of the thermal noise per unit temperature
pub const NOISE_SIGMA: f64 = 0.75;

// ====================
// Pair magnitudes
// ====================
/// Divisor applied to the repulsive overlap term
pub const REPULSION_DIVISOR: f64 = 10.0;
/// Divisor applied to the spring-like attraction term
pub const ATTRACTION_DIVISOR: f64 = 3000.0;
/// Prefactor of the inverse-square attraction used in gravity mode
pub const GRAVITY_MODE_FACTOR: f64 = 10.0;

// ====================
// Mouse / Editor
// ====================
pub const DEFAULT_MOUSE_RADIUS: f64 = 30.0;
pub const MIN_MOUSE_RADIUS: f64 = 1.0;
pub const DEFAULT_GROUP: &str = "group1";
pub const GROUP_PREFIX: &str = "group";

// ====================
// Particle defaults
// ====================
pub const DEFAULT_RADIUS: f64 = 4.0;
pub const DEFAULT_COLOR: [u8; 3] = [0, 0, 255];
pub const DEFAULT_BG_COLOR: [u8; 3] = [255, 255, 255];

/// Global physics, world and toggle settings (the `sim-settings` section).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: f64,
    pub height: f64,
    pub g: f64,
    /// Unit vector; normalized by `SimulationState::set_config`
    pub g_dir: [f64; 2],
    pub wind_force: [f64; 2],
    pub air_res: f64,
    pub ground_friction: f64,
    pub temperature: f64,
    pub speed: f64,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub void_edges: bool,
    /// Rebuild the uniform grid every tick; otherwise every particle is a candidate
    #[serde(default = "default_use_grid")]
    pub use_grid: bool,
    #[serde(default = "default_grid_rows")]
    pub grid_rows: usize,
    #[serde(default = "default_grid_cols")]
    pub grid_cols: usize,
    #[serde(default)]
    pub strategy: MagnitudeStrategy,
    /// Collect per-link stress for rendering
    #[serde(default)]
    pub show_links: bool,
    #[serde(default = "default_bg_color")]
    pub bg_color: [u8; 3],
    #[serde(default)]
    pub code: String,
}

fn default_use_grid() -> bool {
    true
}

fn default_grid_rows() -> usize {
    DEFAULT_GRID_ROWS
}

fn default_grid_cols() -> usize {
    DEFAULT_GRID_COLS
}

fn default_bg_color() -> [u8; 3] {
    DEFAULT_BG_COLOR
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            g: DEFAULT_GRAVITY,
            g_dir: [0.0, 1.0],
            wind_force: [0.0, 0.0],
            air_res: DEFAULT_AIR_RES,
            ground_friction: DEFAULT_GROUND_FRICTION,
            temperature: DEFAULT_TEMPERATURE,
            speed: DEFAULT_SPEED,
            top: true,
            bottom: true,
            left: true,
            right: true,
            void_edges: false,
            use_grid: true,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_cols: DEFAULT_GRID_COLS,
            strategy: MagnitudeStrategy::Default,
            show_links: false,
            bg_color: DEFAULT_BG_COLOR,
            code: String::new(),
        }
    }
}

impl SimConfig {
    /// Check every field against its domain. Returns the offending field on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(format!("world size must be positive, got {}x{}", self.width, self.height));
        }
        if !(0.0..=1.0).contains(&self.air_res) {
            return Err(format!("air_res must lie in [0, 1], got {}", self.air_res));
        }
        if !(0.0..=1.0).contains(&self.ground_friction) {
            return Err(format!("ground_friction must lie in [0, 1], got {}", self.ground_friction));
        }
        if !(self.temperature >= 0.0) {
            return Err(format!("temperature must be non-negative, got {}", self.temperature));
        }
        if !(self.speed >= 0.0) {
            return Err(format!("speed must be non-negative, got {}", self.speed));
        }
        let [gx, gy] = self.g_dir;
        if !(gx * gx + gy * gy > 0.0) {
            return Err("g_dir must be a non-zero vector".to_string());
        }
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err("grid must have at least one row and one column".to_string());
        }
        Ok(())
    }

    /// `g_dir` scaled to unit length.
    pub fn normalized_g_dir(&self) -> [f64; 2] {
        let [gx, gy] = self.g_dir;
        let mag = (gx * gx + gy * gy).sqrt();
        if mag > 0.0 {
            [gx / mag, gy / mag]
        } else {
            [0.0, 1.0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut cfg = SimConfig::default();
        cfg.air_res = 1.5;
        assert!(cfg.validate().unwrap_err().contains("air_res"));

        let mut cfg = SimConfig::default();
        cfg.g_dir = [0.0, 0.0];
        assert!(cfg.validate().is_err());

        let mut cfg = SimConfig::default();
        cfg.temperature = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let text = r#"{
            "width": 200.0, "height": 100.0, "g": 0.1, "g_dir": [0.0, 1.0],
            "wind_force": [0.0, 0.0], "air_res": 0.0, "ground_friction": 0.0,
            "temperature": 0.0, "speed": 1.0, "top": false, "bottom": true,
            "left": false, "right": false, "void_edges": false
        }"#;
        let cfg: SimConfig = serde_json::from_str(text).unwrap();
        assert!(cfg.use_grid);
        assert_eq!(cfg.grid_rows, DEFAULT_GRID_ROWS);
        assert_eq!(cfg.strategy, MagnitudeStrategy::Default);
        assert_eq!(cfg.bg_color, DEFAULT_BG_COLOR);
    }
}
