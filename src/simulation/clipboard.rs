// simulation/clipboard.rs
// Copy, cut and paste of selected subgraphs, positioned relative to the cursor

use crate::conversion::{to_builders, to_particles};
use crate::errors::SimError;
use crate::particle::ParticleId;

use super::simulation::SimulationState;

impl SimulationState {
    /// Snapshot the selection into the clipboard, positions relative to the cursor.
    pub fn copy_selection(&mut self) {
        let (mx, my) = (self.mouse.x, self.mouse.y);
        let selected = self.selection.iter().filter_map(|&id| self.particle(id));
        self.clipboard = to_builders(selected)
            .into_iter()
            .map(|b| b.translated(-mx, -my))
            .collect();
        log::debug!("copied {} particle(s)", self.clipboard.len());
    }

    pub fn cut_selection(&mut self) {
        self.copy_selection();
        self.delete_selection();
    }

    /// Materialize the clipboard at the cursor. The new particles are grabbed
    /// and become the selection.
    pub fn paste(&mut self) -> Result<Vec<ParticleId>, SimError> {
        let (mx, my) = (self.mouse.x, self.mouse.y);
        let builders: Vec<_> = self.clipboard.iter().cloned().map(|b| b.translated(mx, my)).collect();
        let mut particles = to_particles(&builders);
        for p in &mut particles {
            p.mouse = true;
        }
        let ids = self.register_all(particles)?;
        self.selection = ids.clone();
        Ok(ids)
    }
}
