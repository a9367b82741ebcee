// simulation/forces.rs
//! Neighbourhood pass: evaluates every interacting pair once per tick.
//!
//! Candidates come from the uniform grid unless the particle reaches
//! everything (or the grid is off). Linked partners are always candidates.

use super::simulation::SimulationState;
use super::transformers::InteractionMap;
use crate::particle::ParticleId;
use crate::profile_scope;

impl SimulationState {
    /// Build the interaction map. Each unordered pair is evaluated once and
    /// stored on both sides, the second copy reversed.
    pub(crate) fn compute_interactions(&mut self) -> InteractionMap {
        profile_scope!("interactions");
        let n = self.particles.len();
        let mut map: InteractionMap = vec![Vec::new(); n];
        if n < 2 {
            return map;
        }

        let use_grid = self.config.use_grid;
        if use_grid {
            self.grid.rebuild(&self.particles);
        }
        let max_radius = self.particles.iter().map(|p| p.radius).fold(0.0, f64::max);
        let strategy = self.config.strategy;

        for i in 0..n {
            let p = &self.particles[i];
            if !p.interacts() && p.link_lengths.is_empty() {
                continue;
            }

            let candidates: Vec<usize> = if !use_grid || p.interacts_with_all() || p.range() < 0.0 {
                (0..n).collect()
            } else {
                let mut c = self.grid.neighbors(&self.particles, i, p.range() + max_radius);
                c.extend(p.link_lengths.keys().filter_map(|id| self.index.get(id).copied()));
                c.sort_unstable();
                c.dedup();
                c
            };

            for j in candidates {
                let (p, q) = (&self.particles[i], &self.particles[j]);
                if !p.considers(q) {
                    continue;
                }
                let d = (q.pos - p.pos).mag();
                if !p.should_interact(q, d) {
                    continue;
                }
                let interaction = p.calculate_interaction(q, strategy, self.noise.as_mut());
                let (id_i, id_j): (ParticleId, ParticleId) = (p.id(), q.id());
                map[i].push((j, interaction));
                map[j].push((i, interaction.reversed()));
                self.particles[i].collisions.insert(id_j);
                self.particles[j].collisions.insert(id_i);
            }
        }

        for p in &mut self.particles {
            p.clear_collisions();
        }
        map
    }
}
