// particle/interaction.rs
// Pair force magnitudes, per-pair interaction records and elastic collision resolution

use serde::{Deserialize, Serialize};
use ultraviolet::DVec2;

use super::types::Particle;
use crate::config::{ATTRACTION_DIVISOR, GRAVITY_MODE_FACTOR, REPULSION_DIVISOR};
use crate::noise::NoiseSource;

/// How the scalar pair magnitude is derived from the two particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagnitudeStrategy {
    /// Strengths of both particles combined into one formula.
    #[default]
    Default,
    /// Each side contributes on its own, using its own radii, when it reaches.
    RadiiDiff,
}

/// Result of evaluating one ordered pair during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    /// Force acting on the owner of the record
    pub force: DVec2,
    /// Unit vector from the owner towards the neighbor
    pub direction: DVec2,
    pub distance: f64,
    /// Stress of the link between the two, if they are linked
    pub link_percentage: Option<f64>,
}

impl Interaction {
    /// The same interaction seen from the neighbor.
    pub fn reversed(&self) -> Self {
        Self {
            force: -self.force,
            direction: -self.direction,
            distance: self.distance,
            link_percentage: self.link_percentage,
        }
    }

    pub fn is_broken(&self) -> bool {
        matches!(self.link_percentage, Some(p) if p > 1.0)
    }
}

impl MagnitudeStrategy {
    /// Signed magnitude along the direction from `a` to `b`; positive attracts.
    pub fn magnitude(self, a: &Particle, b: &Particle, d: f64) -> f64 {
        match self {
            MagnitudeStrategy::Default => combined_magnitude(a, b, d),
            MagnitudeStrategy::RadiiDiff => {
                let mut m = 0.0;
                if a.reaches(d) || a.is_linked_to(b.id()) {
                    m += one_sided_magnitude(a, a, b, d);
                }
                if b.reaches(d) || b.is_linked_to(a.id()) {
                    m += one_sided_magnitude(b, a, b, d);
                }
                m
            }
        }
    }
}

/// Repulsion radius of the pair, overridden by a fit link's rest length.
fn pair_repel_r(a: &Particle, b: &Particle) -> f64 {
    a.rest_length(b.id())
        .unwrap_or_else(|| a.props.repel_r.max(b.props.repel_r))
}

fn attracts(a: &Particle, b: &Particle) -> bool {
    a.is_in_same_group(b) || a.is_linked_to(b.id())
}

fn combined_magnitude(a: &Particle, b: &Particle, d: f64) -> f64 {
    let repel_r = pair_repel_r(a, b);
    let rest = (d - repel_r).abs();
    if d < repel_r {
        -(a.props.repulsion_strength + b.props.repulsion_strength) * rest / REPULSION_DIVISOR
    } else if attracts(a, b) {
        let attr = a.props.attraction_strength + b.props.attraction_strength;
        if a.props.gravity_mode || b.props.gravity_mode {
            GRAVITY_MODE_FACTOR * attr * a.props.mass * b.props.mass / (d * d)
        } else {
            attr * rest / ATTRACTION_DIVISOR
        }
    } else {
        0.0
    }
}

fn one_sided_magnitude(actor: &Particle, a: &Particle, b: &Particle, d: f64) -> f64 {
    let repel_r = a.rest_length(b.id()).unwrap_or(actor.props.repel_r);
    let rest = (d - repel_r).abs();
    if d < repel_r {
        -actor.props.repulsion_strength * rest / REPULSION_DIVISOR
    } else if attracts(a, b) {
        if actor.props.gravity_mode {
            GRAVITY_MODE_FACTOR * actor.props.attraction_strength * a.props.mass * b.props.mass / (d * d)
        } else {
            actor.props.attraction_strength * rest / ATTRACTION_DIVISOR
        }
    } else {
        0.0
    }
}

impl Particle {
    /// Whether the pair at separation `d` needs an interaction record at all.
    pub fn should_interact(&self, other: &Particle, d: f64) -> bool {
        self.is_linked_to(other.id())
            || self.reaches(d)
            || other.reaches(d)
            || (self.props.collisions && other.props.collisions && d < self.radius + other.radius)
    }

    /// Evaluate the pair from this particle's side. The record for `other` is `reversed()`.
    pub fn calculate_interaction(
        &self,
        other: &Particle,
        strategy: MagnitudeStrategy,
        noise: &mut dyn NoiseSource,
    ) -> Interaction {
        let delta = other.pos - self.pos;
        let d = delta.mag();
        let gravity = self.props.gravity_mode || other.props.gravity_mode;

        if d == 0.0 {
            if gravity {
                return Interaction {
                    force: DVec2::zero(),
                    direction: DVec2::zero(),
                    distance: 0.0,
                    link_percentage: self.link_percentage(other, 0.0, 0.0),
                };
            }
            let direction = noise.unit_vector();
            let m = -self.props.repulsion_strength;
            return Interaction {
                force: direction * m,
                direction,
                distance: 0.0,
                link_percentage: self.link_percentage(other, m, 0.0),
            };
        }

        let direction = delta / d;
        let m = strategy.magnitude(self, other, d);
        Interaction {
            force: direction * m,
            direction,
            distance: d,
            link_percentage: self.link_percentage(other, m, d),
        }
    }

    /// |m| over the breaking threshold selected by the side of the rest length.
    fn link_percentage(&self, other: &Particle, m: f64, d: f64) -> Option<f64> {
        if !self.is_linked_to(other.id()) {
            return None;
        }
        let repel_r = pair_repel_r(self, other);
        let max_force = if d - repel_r >= 0.0 {
            self.props.link_attr_breaking_force
        } else {
            self.props.link_repel_breaking_force
        };
        Some(if max_force > 0.0 {
            m.abs() / max_force
        } else if max_force == 0.0 {
            1.0
        } else {
            0.0
        })
    }
}

/// Exchange 1-D elastic velocities and push overlapping disks apart.
///
/// `interaction` is the record owned by `a`. Returns whether anything changed.
pub fn resolve_collision(a: &mut Particle, b: &mut Particle, interaction: &Interaction) -> bool {
    if !(a.props.collisions && b.props.collisions) {
        return false;
    }
    let overlap = a.radius + b.radius - interaction.distance;
    if overlap <= 0.0 {
        return false;
    }

    let (ma, mb) = (a.props.mass, b.props.mass);
    let total = ma + mb;
    let (va, vb) = (a.vel, b.vel);
    a.vel = va * ((ma - mb) / total) + vb * (2.0 * mb / total);
    b.vel = vb * ((mb - ma) / total) + va * (2.0 * ma / total);

    let shift = interaction.direction * overlap;
    if !a.mouse {
        a.pos -= shift * (ma / total);
    }
    if !(b.mouse || b.props.locked) {
        b.pos += shift * (mb / total);
    }
    true
}
