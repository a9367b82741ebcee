// simulation/links.rs
// Link editing over sets of particles. Every edit writes both directions.

use crate::particle::ParticleId;

use super::simulation::SimulationState;

impl SimulationState {
    /// Indices of the known, distinct ids in `ids`, in first-seen order.
    fn resolve(&self, ids: &[ParticleId]) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::with_capacity(ids.len());
        for id in ids {
            match self.index.get(id) {
                Some(&i) if !out.contains(&i) => out.push(i),
                Some(_) => {}
                None => log::debug!("ignoring unknown particle {:?}", id),
            }
        }
        out
    }

    /// Link every pair in `ids`.
    ///
    /// Without `fit_link` the link has no rest length. Otherwise the rest length
    /// is `distance`, or the current separation when `distance` is `None`.
    pub fn link(&mut self, ids: &[ParticleId], fit_link: bool, distance: Option<f64>) {
        let members = self.resolve(ids);
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                let length = if !fit_link {
                    None
                } else {
                    Some(distance.unwrap_or_else(|| (self.particles[j].pos - self.particles[i].pos).mag()))
                };
                let (id_i, id_j) = (self.particles[i].id(), self.particles[j].id());
                self.particles[i].set_link(id_j, length);
                self.particles[j].set_link(id_i, length);
            }
        }
    }

    /// Drop every link between two members of `ids`.
    pub fn unlink(&mut self, ids: &[ParticleId]) {
        let members = self.resolve(ids);
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                let (id_i, id_j) = (self.particles[i].id(), self.particles[j].id());
                self.particles[i].remove_link(id_j);
                self.particles[j].remove_link(id_i);
            }
        }
    }

    /// Add `delta` to the rest length of every fit link between members of `ids`.
    pub fn change_link_lengths(&mut self, ids: &[ParticleId], delta: f64) {
        let members = self.resolve(ids);
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                let id_j = self.particles[j].id();
                if let Some(length) = self.particles[i].rest_length(id_j) {
                    let id_i = self.particles[i].id();
                    self.particles[i].set_link(id_j, Some(length + delta));
                    self.particles[j].set_link(id_i, Some(length + delta));
                }
            }
        }
    }

    pub fn link_selection(&mut self, fit_link: bool, distance: Option<f64>) {
        let ids = self.selection.clone();
        self.link(&ids, fit_link, distance);
    }

    pub fn unlink_selection(&mut self) {
        let ids = self.selection.clone();
        self.unlink(&ids);
    }
}
