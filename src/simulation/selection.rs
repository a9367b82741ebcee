// simulation/selection.rs
// Selection, cursor and mouse-mode operations

use crate::config::MIN_MOUSE_RADIUS;
use crate::errors::{ErrorKind, SimError};
use crate::geometry::rotate2d;
use crate::particle::{Particle, ParticleId};

use super::simulation::{Mode, SimulationState};

impl SimulationState {
    /// Append `id` to the selection unless it is already there.
    pub fn select(&mut self, id: ParticleId) -> Result<(), SimError> {
        if !self.index.contains_key(&id) {
            return Err(SimError::UnknownParticle(id));
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        Ok(())
    }

    pub fn deselect(&mut self, id: ParticleId) {
        self.selection.retain(|s| *s != id);
    }

    pub fn select_all(&mut self) {
        self.selection = self.particles.iter().map(Particle::id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Particles whose circle overlaps the cursor circle, in insertion order.
    pub fn in_range(&self) -> Vec<ParticleId> {
        let cursor = self.mouse.circle();
        self.particles
            .iter()
            .filter(|p| p.circle().is_in_range(&cursor))
            .map(Particle::id)
            .collect()
    }

    pub fn select_in_range(&mut self) {
        for id in self.in_range() {
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Deselect everything under the cursor.
    pub fn remove_in_range(&mut self) {
        let hit = self.in_range();
        self.selection.retain(|id| !hit.contains(id));
    }

    /// Clicking empty space clears the selection; otherwise the hits are added.
    pub fn select_or_reset_in_range(&mut self) {
        if self.in_range().is_empty() {
            self.selection.clear();
        } else {
            self.select_in_range();
        }
    }

    /// Grab what is under the cursor. Grabbing a selected particle grabs the
    /// whole selection.
    pub fn move_in_range(&mut self) {
        let hit = self.in_range();
        let mut grabbed = hit.clone();
        if hit.iter().any(|id| self.selection.contains(id)) {
            grabbed.extend(self.selection.iter().copied());
        }
        for id in grabbed {
            if let Some(p) = self.particle_mut(id) {
                p.mouse = true;
            }
        }
    }

    pub fn move_mouse(&mut self, x: f64, y: f64) {
        self.mouse.x = x;
        self.mouse.y = y;
    }

    pub fn mouse_pressed(&mut self) {
        match self.mode {
            Mode::Add => {
                let particle = self.spawner.spawn_at(self.mouse.x, self.mouse.y);
                if let Err(e) = self.register(particle) {
                    self.errors.push(ErrorKind::Input, e.to_string());
                }
            }
            Mode::Select => self.select_or_reset_in_range(),
            Mode::Move => self.move_in_range(),
        }
    }

    /// Release every grabbed particle.
    pub fn mouse_released(&mut self) {
        for p in &mut self.particles {
            p.mouse = false;
        }
    }

    /// Rotate the selection around the cursor by `factor * mouse radius` degrees.
    pub fn rotate_selection(&mut self, factor: f64) {
        let angle = factor * self.mouse.radius;
        let (cx, cy) = (self.mouse.x, self.mouse.y);
        for id in self.selection.clone() {
            if let Some(p) = self.particle_mut(id) {
                let (x, y) = rotate2d(p.pos.x, p.pos.y, cx, cy, angle);
                p.pos.x = x;
                p.pos.y = y;
            }
        }
    }

    /// Scale the cursor radius by `2^factor`, never below 1.
    pub fn mouse_radius_scale(&mut self, factor: f64) {
        self.mouse.radius = (self.mouse.radius * 2f64.powf(factor)).max(MIN_MOUSE_RADIUS);
    }

    pub fn delete_selection(&mut self) -> usize {
        let doomed = std::mem::take(&mut self.selection);
        self.remove_many(&doomed)
    }
}
