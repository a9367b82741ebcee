// simulation/transformers.rs
//! Per-particle passes that consume the interaction map of a tick.
//!
//! Every pass visits every particle before the next pass starts. The
//! collision pass marks visited pairs in the transient collision sets so a
//! pair is resolved once; the sets are emptied when the chain finishes.

use ultraviolet::DVec2;

use super::simulation::SimulationState;
use crate::config::{SimConfig, MAX_ACCELERATION, NOISE_SIGMA};
use crate::noise::NoiseSource;
use crate::particle::{resolve_collision, Interaction, Particle, ParticleId};
use crate::profile_scope;

/// Interactions of each particle, indexed like `particles`.
pub type InteractionMap = Vec<Vec<(usize, Interaction)>>;

/// What a transformer may touch while it runs.
pub struct StepContext<'a> {
    pub particles: &'a mut [Particle],
    pub config: &'a SimConfig,
    pub noise: &'a mut dyn NoiseSource,
    pub link_stress: &'a mut Vec<LinkStress>,
}

pub type Transformer = fn(&mut StepContext<'_>, usize, &[(usize, Interaction)]);

/// Always run, in this order.
pub const BUILTIN: [Transformer; 3] = [apply_collisions, remove_broken_links, apply_forces];

/// Stress of a surviving link, recorded once per pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStress {
    pub a: ParticleId,
    pub b: ParticleId,
    pub percentage: f64,
}

/// Two distinct mutable entries of one slice.
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = particles.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = particles.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

pub fn apply_collisions(ctx: &mut StepContext<'_>, i: usize, interactions: &[(usize, Interaction)]) {
    for (j, interaction) in interactions {
        let (a, b) = pair_mut(ctx.particles, i, *j);
        if a.collisions.contains(&b.id()) {
            continue;
        }
        resolve_collision(a, b, interaction);
        let (id_a, id_b) = (a.id(), b.id());
        a.collisions.insert(id_b);
        b.collisions.insert(id_a);
    }
}

pub fn remove_broken_links(ctx: &mut StepContext<'_>, i: usize, interactions: &[(usize, Interaction)]) {
    for (j, interaction) in interactions {
        if !interaction.is_broken() {
            continue;
        }
        let (a, b) = pair_mut(ctx.particles, i, *j);
        let (id_a, id_b) = (a.id(), b.id());
        if a.remove_link(id_b).is_some() | b.remove_link(id_a).is_some() {
            log::debug!("link {:?}-{:?} broke", id_a, id_b);
        }
    }
}

/// Integrate the summed pair forces, wind, gravity and thermal noise.
/// Locked and grabbed particles keep their velocity.
pub fn apply_forces(ctx: &mut StepContext<'_>, i: usize, interactions: &[(usize, Interaction)]) {
    let p = &ctx.particles[i];
    if p.props.locked || p.mouse {
        return;
    }
    let cfg = ctx.config;

    let mut force = DVec2::zero();
    for (_, interaction) in interactions {
        force += interaction.force;
    }
    let wind = DVec2::new(cfg.wind_force[0], cfg.wind_force[1]);
    let [gx, gy] = cfg.normalized_g_dir();
    let mut acc = (force + wind * p.radius) / p.props.mass + DVec2::new(gx, gy) * cfg.g;

    let magnitude = acc.mag();
    if magnitude > MAX_ACCELERATION {
        acc *= MAX_ACCELERATION / magnitude;
    }
    if cfg.temperature != 0.0 {
        let jitter = DVec2::new(ctx.noise.normal(NOISE_SIGMA), ctx.noise.normal(NOISE_SIGMA));
        acc += jitter * cfg.temperature;
    }

    let p = &mut ctx.particles[i];
    p.vel += acc;
    p.vel *= (1.0 - cfg.air_res).powf(cfg.speed);
    p.pos += p.vel * cfg.speed;
}

/// Record the stress of every link that survived this tick.
pub fn compute_links(ctx: &mut StepContext<'_>, i: usize, interactions: &[(usize, Interaction)]) {
    for (j, interaction) in interactions {
        if *j <= i {
            continue;
        }
        let (a, b) = (ctx.particles[i].id(), ctx.particles[*j].id());
        // broken links were already dropped by remove_broken_links
        if !ctx.particles[i].is_linked_to(b) {
            continue;
        }
        if let Some(percentage) = interaction.link_percentage {
            ctx.link_stress.push(LinkStress { a, b, percentage });
        }
    }
}

impl SimulationState {
    /// Run `chain` transformer-major over the interaction map.
    pub(crate) fn run_transformers(&mut self, interactions: &InteractionMap, chain: &[Transformer]) {
        profile_scope!("transformers");
        self.link_stress.clear();
        let mut ctx = StepContext {
            particles: &mut self.particles,
            config: &self.config,
            noise: self.noise.as_mut(),
            link_stress: &mut self.link_stress,
        };
        for transformer in chain {
            for (i, list) in interactions.iter().enumerate() {
                transformer(&mut ctx, i, list);
            }
        }
        for p in ctx.particles.iter_mut() {
            p.clear_collisions();
        }
    }
}
