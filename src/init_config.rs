// init_config.rs
// Handles loading and parsing the initial scene description from a TOML file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::SimConfig;
use crate::conversion::Spawner;
use crate::particle::ParticleProperties;

#[derive(Debug, Deserialize, Serialize)]
pub struct InitConfig {
    pub simulation: Option<SimulationConfig>,
    #[serde(default)]
    pub particles: ParticlesConfig,
}

/// Overrides applied on top of [`SimConfig::default`].
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub g: Option<f64>,
    pub g_dir: Option<[f64; 2]>,
    pub air_res: Option<f64>,
    pub temperature: Option<f64>,
    pub void_edges: Option<bool>,
    pub show_links: Option<bool>,
}

impl SimulationConfig {
    pub fn apply(&self, base: SimConfig) -> SimConfig {
        SimConfig {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            g: self.g.unwrap_or(base.g),
            g_dir: self.g_dir.unwrap_or(base.g_dir),
            air_res: self.air_res.unwrap_or(base.air_res),
            temperature: self.temperature.unwrap_or(base.temperature),
            void_edges: self.void_edges.unwrap_or(base.void_edges),
            show_links: self.show_links.unwrap_or(base.show_links),
            ..base
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParticlesConfig {
    #[serde(default)]
    pub circles: Vec<CircleConfig>,
    #[serde(default)]
    pub rectangles: Vec<RectangleConfig>,
    #[serde(default)]
    pub random: Vec<RandomConfig>,
}

/// Disk of the given radius filled with particles on a square lattice.
#[derive(Debug, Deserialize, Serialize)]
pub struct CircleConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub group: Option<String>,
    /// Link every particle of the block to its lattice neighbours
    #[serde(default)]
    pub linked: bool,
}

/// Axis-aligned block given by its center.
#[derive(Debug, Deserialize, Serialize)]
pub struct RectangleConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub group: Option<String>,
    #[serde(default)]
    pub linked: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RandomConfig {
    pub count: usize,
    pub group: Option<String>,
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: InitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file("init_config.toml")
    }

    pub fn sim_config(&self) -> SimConfig {
        match &self.simulation {
            Some(overrides) => overrides.apply(SimConfig::default()),
            None => SimConfig::default(),
        }
    }
}

/// The spawner template with its group replaced when `group` is given.
pub fn template_for(spawner: &Spawner, group: Option<&str>) -> Spawner {
    let mut spawner = spawner.clone();
    if let Some(group) = group {
        spawner.template.properties = ParticleProperties {
            group: group.to_string(),
            ..spawner.template.properties
        };
    }
    spawner
}

impl RectangleConfig {
    /// Convert center coordinates to origin (top-left) coordinates
    pub fn to_origin_coords(&self) -> (f64, f64) {
        (self.x - self.width / 2.0, self.y - self.height / 2.0)
    }
}
