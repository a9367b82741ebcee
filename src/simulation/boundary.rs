// simulation/boundary.rs
// Grabbed-particle motion, wall reflection and void-edge culling

use crate::config::SimConfig;
use crate::geometry::Rect;
use crate::particle::{Particle, ParticleId};

use super::simulation::SimulationState;

/// Reflect a particle off the enabled walls of the world rectangle.
pub fn reflect_off_walls(p: &mut Particle, cfg: &SimConfig) {
    let bounce = p.props.bounciness;
    let friction = 1.0 - cfg.ground_friction;
    let r = p.radius;

    if cfg.right && p.pos.x + r >= cfg.width {
        p.vel.x *= -bounce;
        p.vel.y *= friction;
        p.pos.x = cfg.width - r;
    }
    if cfg.left && p.pos.x - r <= 0.0 {
        p.vel.x *= -bounce;
        p.vel.y *= friction;
        p.pos.x = r;
    }
    if cfg.bottom && p.pos.y + r >= cfg.height {
        p.vel.y *= -bounce;
        p.vel.x *= friction;
        p.pos.y = cfg.height - r;
    }
    if cfg.top && p.pos.y - r <= 0.0 {
        p.vel.y *= -bounce;
        p.vel.x *= friction;
        p.pos.y = r;
    }
}

impl SimulationState {
    /// Grabbed particles follow the cursor delta of this tick.
    pub(crate) fn move_grabbed(&mut self) {
        let delta = self.mouse.delta();
        for p in self.particles.iter_mut().filter(|p| p.mouse) {
            p.vel = delta;
            p.pos += delta;
        }
    }

    pub(crate) fn apply_walls(&mut self) {
        let cfg = &self.config;
        for p in &mut self.particles {
            reflect_off_walls(p, cfg);
        }
    }

    /// With `void_edges`, particles whose bounding box left the world are removed.
    pub(crate) fn cull_void_edges(&mut self) {
        if !self.config.void_edges {
            return;
        }
        let world = Rect::new(0.0, 0.0, self.config.width, self.config.height);
        let lost: Vec<ParticleId> = self
            .particles
            .iter()
            .filter(|p| p.bounding_rect().isdisjoint(&world))
            .map(Particle::id)
            .collect();
        if !lost.is_empty() {
            log::debug!("{} particle(s) left the world", lost.len());
            self.remove_many(&lost);
        }
    }
}
