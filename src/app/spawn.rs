use rand_distr::{Distribution, StandardNormal};
use ultraviolet::DVec2;

use crate::conversion::Spawner;
use crate::errors::ErrorKind;
use crate::particle::{Particle, ParticleId};
use crate::simulation::SimulationState;

const RANDOM_ATTEMPTS: usize = super::RANDOM_ATTEMPTS;

/// Sample a random velocity vector with per-axis spread `sqrt(temperature / mass)`.
pub fn sample_velocity(mass: f64, temperature: f64) -> DVec2 {
    let sigma = (temperature / mass).sqrt();
    let mut rng = rand::rng();
    let vx: f64 = StandardNormal.sample(&mut rng);
    let vy: f64 = StandardNormal.sample(&mut rng);
    DVec2::new(vx * sigma, vy * sigma)
}

pub fn overlaps_any(existing: &[Particle], pos: DVec2, radius: f64) -> Option<ParticleId> {
    existing
        .iter()
        .find(|p| (p.pos - pos).mag() < p.radius + radius)
        .map(Particle::id)
}

/// Spawn one particle from the template, replacing anything it would overlap.
fn place(simulation: &mut SimulationState, spawner: &Spawner, pos: DVec2) -> Option<ParticleId> {
    let radius = spawner.template.radius;
    while let Some(id) = overlaps_any(simulation.particles(), pos, radius) {
        simulation.remove(id);
    }
    spawn_at(simulation, spawner, pos)
}

fn spawn_at(simulation: &mut SimulationState, spawner: &Spawner, pos: DVec2) -> Option<ParticleId> {
    let mut particle = spawner.spawn_at(pos.x, pos.y);
    let temperature = simulation.config.temperature;
    if temperature > 0.0 {
        particle.vel += sample_velocity(particle.props().mass, temperature);
    }
    match simulation.register(particle) {
        Ok(id) => Some(id),
        Err(e) => {
            simulation.push_error(ErrorKind::Input, e.to_string());
            None
        }
    }
}

/// Fill a disk with concentric rings of particles.
pub fn add_circle(simulation: &mut SimulationState, spawner: &Spawner, x: f64, y: f64, radius: f64) -> Vec<ParticleId> {
    let center = DVec2::new(x, y);
    let particle_radius = spawner.template.radius;
    let particle_diameter = 2.0 * particle_radius;
    let mut ids = Vec::new();
    if let Some(id) = place(simulation, spawner, center) {
        ids.push(id);
    }
    let mut r = particle_diameter;
    while r <= radius {
        let circumference = 2.0 * std::f64::consts::PI * r;
        let count = (circumference / particle_diameter).floor() as usize;
        for i in 0..count {
            let angle = (i as f64) * std::f64::consts::TAU / (count as f64);
            let pos = center + DVec2::new(angle.cos(), angle.sin()) * r;
            match place(simulation, spawner, pos) {
                Some(id) => ids.push(id),
                None => return ids,
            }
        }
        r += particle_diameter;
    }
    ids
}

/// Fill an axis-aligned rectangle (given by its center) on a square lattice.
pub fn add_rectangle(
    simulation: &mut SimulationState,
    spawner: &Spawner,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<ParticleId> {
    let origin = DVec2::new(x - width / 2.0, y - height / 2.0);
    let particle_diameter = 2.0 * spawner.template.radius;
    let cols = (width / particle_diameter).floor() as usize;
    let rows = (height / particle_diameter).floor() as usize;
    let mut ids = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let pos = origin
                + DVec2::new(
                    (col as f64 + 0.5) * particle_diameter,
                    (row as f64 + 0.5) * particle_diameter,
                );
            match place(simulation, spawner, pos) {
                Some(id) => ids.push(id),
                None => return ids,
            }
        }
    }
    ids
}

/// Scatter `count` particles over the world without overlapping existing ones.
/// A particle is skipped after `RANDOM_ATTEMPTS` rejected positions.
pub fn add_random(simulation: &mut SimulationState, spawner: &Spawner, count: usize) -> Vec<ParticleId> {
    let radius = spawner.template.radius;
    let (width, height) = (simulation.config.width, simulation.config.height);
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let mut attempts = 0;
        loop {
            let pos = DVec2::new(
                radius + fastrand::f64() * (width - 2.0 * radius).max(0.0),
                radius + fastrand::f64() * (height - 2.0 * radius).max(0.0),
            );
            if overlaps_any(simulation.particles(), pos, radius).is_none() {
                if let Some(id) = spawn_at(simulation, spawner, pos) {
                    ids.push(id);
                }
                break;
            }
            attempts += 1;
            if attempts >= RANDOM_ATTEMPTS {
                break;
            }
        }
    }
    ids
}

/// Fit-link every pair of `ids` that sits within 1.5 diameters.
pub fn link_neighbours(simulation: &mut SimulationState, ids: &[ParticleId]) {
    let mut pairs = Vec::new();
    for (n, &a) in ids.iter().enumerate() {
        for &b in &ids[n + 1..] {
            if let (Some(p), Some(q)) = (simulation.particle(a), simulation.particle(b)) {
                if (p.pos - q.pos).mag() <= 1.5 * (p.radius + q.radius) {
                    pairs.push([a, b]);
                }
            }
        }
    }
    for pair in pairs {
        simulation.link(&pair, true, None);
    }
}
