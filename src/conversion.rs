// conversion.rs
// Translation between live particles (links keyed by id) and builders (links keyed by list index)

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ultraviolet::DVec2;

use crate::config;
use crate::particle::{Particle, ParticleId, ParticleProperties};

/// Serializable description of a particle. Link keys index into the list the
/// builder belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleBuilder {
    pub x: f64,
    pub y: f64,
    pub velocity: [f64; 2],
    pub radius: f64,
    pub color: [u8; 3],
    pub properties: ParticleProperties,
    #[serde(default)]
    pub link_lengths: BTreeMap<usize, Option<f64>>,
}

impl Default for ParticleBuilder {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            velocity: [0.0, 0.0],
            radius: config::DEFAULT_RADIUS,
            color: config::DEFAULT_COLOR,
            properties: ParticleProperties::default(),
            link_lengths: BTreeMap::new(),
        }
    }
}

impl ParticleBuilder {
    /// Snapshot of a particle without its links.
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            x: p.pos.x,
            y: p.pos.y,
            velocity: [p.vel.x, p.vel.y],
            radius: p.radius,
            color: p.color,
            properties: p.props().clone(),
            link_lengths: BTreeMap::new(),
        }
    }

    /// Fresh particle with a new id and no links.
    pub fn build(&self) -> Particle {
        Particle::new(
            DVec2::new(self.x, self.y),
            DVec2::new(self.velocity[0], self.velocity[1]),
            self.radius,
            self.color,
            self.properties.clone(),
        )
    }

    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }
}

/// Builders for `particles`, keeping only links whose partner is in the list.
pub fn to_builders<'a>(particles: impl IntoIterator<Item = &'a Particle>) -> Vec<ParticleBuilder> {
    let particles: Vec<&Particle> = particles.into_iter().collect();
    let index: HashMap<ParticleId, usize> =
        particles.iter().enumerate().map(|(i, p)| (p.id(), i)).collect();
    particles
        .iter()
        .map(|p| {
            let mut builder = ParticleBuilder::from_particle(p);
            builder.link_lengths = p
                .link_lengths()
                .iter()
                .filter_map(|(id, len)| index.get(id).map(|&j| (j, *len)))
                .collect();
            builder
        })
        .collect()
}

/// Materialize builders in list order, translating index links to the new ids.
/// Out-of-range and self-referencing indices are dropped.
pub fn to_particles(builders: &[ParticleBuilder]) -> Vec<Particle> {
    let mut particles: Vec<Particle> = builders.iter().map(ParticleBuilder::build).collect();
    let ids: Vec<ParticleId> = particles.iter().map(Particle::id).collect();
    for (i, builder) in builders.iter().enumerate() {
        for (&j, &len) in &builder.link_lengths {
            if j < ids.len() && j != i {
                particles[i].set_link(ids[j], len);
                particles[j].set_link(ids[i], len);
            }
        }
    }
    particles
}

/// Template used by ADD-mode spawning (the `particle-settings` section).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub template: ParticleBuilder,
    /// Pick a random hue for every spawned particle
    #[serde(default)]
    pub random_color: bool,
}

impl Default for Spawner {
    fn default() -> Self {
        Self { template: ParticleBuilder::default(), random_color: true }
    }
}

impl Spawner {
    pub fn validate(&self) -> Result<(), String> {
        let (mass, radius) = (self.template.properties.mass, self.template.radius);
        if !(mass > 0.0) || !(radius > 0.0) {
            return Err(format!("spawner needs positive mass and radius, got mass {} radius {}", mass, radius));
        }
        Ok(())
    }

    pub fn spawn_at(&self, x: f64, y: f64) -> Particle {
        let mut builder = self.template.clone();
        builder.x = x;
        builder.y = y;
        builder.link_lengths.clear();
        if self.random_color {
            builder.color = random_color();
        }
        builder.build()
    }
}

/// Saturated color with a uniformly random hue.
pub fn random_color() -> [u8; 3] {
    let hsv: Hsv = Hsv::new(fastrand::f32() * 360.0, 0.8, 0.9);
    let rgb: Srgb = Srgb::from_color(hsv);
    let rgb: Srgb<u8> = rgb.into_format();
    [rgb.red, rgb.green, rgb.blue]
}
