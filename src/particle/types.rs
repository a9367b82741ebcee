// particle/types.rs
// Particle identity, static properties and mutable per-particle state

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use ultraviolet::DVec2;

use crate::config;
use crate::geometry::{Circle, Rect};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a particle. Ids are never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

impl ParticleId {
    pub fn next() -> Self {
        ParticleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Static per-particle parameters edited through the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleProperties {
    pub mass: f64,
    pub bounciness: f64,
    pub locked: bool,
    pub collisions: bool,
    /// Attraction radius; negative means unlimited
    pub attract_r: f64,
    pub repel_r: f64,
    pub attraction_strength: f64,
    pub repulsion_strength: f64,
    /// Same-group particles interact as if they were linked
    pub linked_group_particles: bool,
    /// Negative means the link never breaks under attraction
    pub link_attr_breaking_force: f64,
    /// Negative means the link never breaks under repulsion
    pub link_repel_breaking_force: f64,
    pub group: String,
    pub separate_group: bool,
    pub gravity_mode: bool,
}

impl Default for ParticleProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            bounciness: 0.7,
            locked: false,
            collisions: false,
            attract_r: -1.0,
            repel_r: 10.0,
            attraction_strength: 0.5,
            repulsion_strength: 1.0,
            linked_group_particles: true,
            link_attr_breaking_force: -1.0,
            link_repel_breaking_force: -1.0,
            group: config::DEFAULT_GROUP.to_string(),
            separate_group: false,
            gravity_mode: false,
        }
    }
}

/// A disk with physical state and a symmetric link map to other particles.
///
/// Equality and hashing use the id only.
#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub color: [u8; 3],
    /// Driven by the cursor delta this tick instead of by forces
    pub mouse: bool,
    pub(crate) props: ParticleProperties,
    /// `None` rest length is a repel-only link
    pub(crate) link_lengths: BTreeMap<ParticleId, Option<f64>>,
    /// Partners already handled this tick; empty between ticks
    pub(crate) collisions: HashSet<ParticleId>,
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Particle {}

impl Hash for Particle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Particle {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, color: [u8; 3], props: ParticleProperties) -> Self {
        Self {
            id: ParticleId::next(),
            pos,
            vel,
            radius,
            color,
            mouse: false,
            props,
            link_lengths: BTreeMap::new(),
            collisions: HashSet::new(),
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn props(&self) -> &ParticleProperties {
        &self.props
    }

    pub fn group(&self) -> &str {
        &self.props.group
    }

    pub fn link_lengths(&self) -> &BTreeMap<ParticleId, Option<f64>> {
        &self.link_lengths
    }

    pub fn is_linked_to(&self, other: ParticleId) -> bool {
        self.link_lengths.contains_key(&other)
    }

    /// Rest length of the link to `other`, if the link exists and is fit.
    pub fn rest_length(&self, other: ParticleId) -> Option<f64> {
        self.link_lengths.get(&other).copied().flatten()
    }

    pub fn collision_partners(&self) -> &HashSet<ParticleId> {
        &self.collisions
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos.x, self.pos.y, self.radius)
    }

    pub fn interacts(&self) -> bool {
        self.props.attraction_strength != 0.0
            || self.props.repulsion_strength != 0.0
            || self.props.collisions
    }

    pub fn interacts_with_all(&self) -> bool {
        self.props.attraction_strength != 0.0 && self.props.attract_r < 0.0
    }

    /// Radius within which neighbors have to be looked up.
    pub fn range(&self) -> f64 {
        let p = &self.props;
        if p.attraction_strength != 0.0 && !(p.collisions && self.radius > p.attract_r) {
            p.attract_r
        } else if p.attraction_strength == 0.0
            && p.repulsion_strength != 0.0
            && !(p.collisions && self.radius > p.repel_r)
        {
            p.repel_r
        } else {
            self.radius
        }
    }

    pub fn is_in_same_group(&self, other: &Particle) -> bool {
        !self.props.separate_group && self.props.group == other.props.group
    }

    /// Compatibility filter applied before a neighbor is evaluated.
    pub fn considers(&self, other: &Particle) -> bool {
        other.id != self.id
            && !self.collisions.contains(&other.id)
            && (self.props.linked_group_particles
                || self.is_linked_to(other.id)
                || !self.is_in_same_group(other))
    }

    /// Whether this particle's attraction or repulsion reaches separation `d`.
    pub fn reaches(&self, d: f64) -> bool {
        (self.props.attraction_strength != 0.0 || self.props.repulsion_strength != 0.0)
            && (self.props.attract_r < 0.0 || d < self.props.attract_r)
    }

    pub(crate) fn set_link(&mut self, other: ParticleId, length: Option<f64>) {
        if other != self.id {
            self.link_lengths.insert(other, length);
        }
    }

    pub(crate) fn remove_link(&mut self, other: ParticleId) -> Option<Option<f64>> {
        self.link_lengths.remove(&other)
    }

    pub(crate) fn clear_collisions(&mut self) {
        self.collisions.clear();
    }
}
