// simulation/simulation.rs
// Contains the SimulationState struct, particle/group ownership and the step pipeline

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ultraviolet::DVec2;

use super::transformers::{self, LinkStress, Transformer};
use crate::code::CodeEvaluator;
use crate::config::{self, SimConfig};
use crate::conversion::{ParticleBuilder, Spawner};
use crate::errors::{ErrorKind, ErrorQueue, SimError, SimErrorRecord};
use crate::events::EventBus;
use crate::geometry::Circle;
use crate::grid::UniformGrid;
use crate::noise::{NoiseSource, RandomNoise};
use crate::particle::{Particle, ParticleId, ParticleProperties};
use crate::profile_scope;

/// What a mouse press does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Select,
    Move,
    Add,
}

/// Cursor position for this and the previous tick, plus the selection radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseState {
    pub x: f64,
    pub y: f64,
    pub prev_x: f64,
    pub prev_y: f64,
    pub radius: f64,
}

impl Default for MouseState {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, prev_x: 0.0, prev_y: 0.0, radius: config::DEFAULT_MOUSE_RADIUS }
    }
}

impl MouseState {
    pub fn delta(&self) -> DVec2 {
        DVec2::new(self.x - self.prev_x, self.y - self.prev_y)
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }
}

/// A named, ordered bag of particles.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub name: String,
    pub members: Vec<ParticleId>,
}

/// Owns the particle graph and everything the editor manipulates.
pub struct SimulationState {
    pub config: SimConfig,
    pub spawner: Spawner,
    pub mouse: MouseState,
    pub events: EventBus,
    pub frame: usize,
    pub(crate) particles: Vec<Particle>,
    pub(crate) index: HashMap<ParticleId, usize>,
    pub(crate) groups: Vec<Group>,
    pub(crate) selection: Vec<ParticleId>,
    pub(crate) clipboard: Vec<ParticleBuilder>,
    pub(crate) mode: Mode,
    pub(crate) paused: bool,
    pub(crate) pause_pending: bool,
    pub(crate) running: bool,
    pub(crate) errors: ErrorQueue,
    pub(crate) grid: UniformGrid,
    pub(crate) noise: Box<dyn NoiseSource>,
    pub(crate) evaluator: Option<Box<dyn CodeEvaluator>>,
    pub(crate) link_stress: Vec<LinkStress>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationState {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Start from `config`; invalid settings fall back to the defaults.
    pub fn with_config(config: SimConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("rejected initial settings ({}), using defaults", e);
                SimConfig::default()
            }
        };
        let grid = UniformGrid::new(config.width, config.height, config.grid_rows, config.grid_cols);
        Self {
            config,
            spawner: Spawner::default(),
            mouse: MouseState::default(),
            events: EventBus::default(),
            frame: 0,
            particles: Vec::new(),
            index: HashMap::new(),
            groups: vec![Group { name: config::DEFAULT_GROUP.to_string(), members: Vec::new() }],
            selection: Vec::new(),
            clipboard: Vec::new(),
            mode: Mode::Select,
            paused: false,
            pause_pending: false,
            running: true,
            errors: ErrorQueue::new(),
            grid,
            noise: Box::new(RandomNoise::new()),
            evaluator: None,
            link_stress: Vec::new(),
        }
    }

    // ---- observers ----

    /// Every particle in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.index.get(&id).map(|&i| &self.particles[i])
    }

    /// Mutable access to the free state of a particle (position, velocity, color, radius).
    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.particles[i]),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn selection(&self) -> &[ParticleId] {
        &self.selection
    }

    pub fn clipboard(&self) -> &[ParticleBuilder] {
        &self.clipboard
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Stress of every linked pair from the last tick (when `show_links` is on).
    pub fn link_stress(&self) -> &[LinkStress] {
        &self.link_stress
    }

    /// Handle to the error queue that can be drained from another thread.
    pub fn error_queue(&self) -> ErrorQueue {
        self.errors.clone()
    }

    pub fn drain_errors(&self) -> Vec<SimErrorRecord> {
        self.errors.drain()
    }

    pub fn push_error(&self, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(kind, message);
    }

    // ---- settings ----

    /// Replace the global settings. Invalid settings are reported as `Input-Error`
    /// and leave the current ones untouched.
    pub fn set_config(&mut self, mut config: SimConfig) -> bool {
        if let Err(e) = config.validate() {
            log::warn!("rejected settings: {}", e);
            self.errors.push(ErrorKind::Input, e);
            return false;
        }
        config.g_dir = config.normalized_g_dir();
        if (config.width, config.height, config.grid_rows, config.grid_cols)
            != (self.config.width, self.config.height, self.config.grid_rows, self.config.grid_cols)
        {
            self.grid.resize(config.width, config.height, config.grid_rows, config.grid_cols);
        }
        self.config = config;
        true
    }

    pub fn set_spawner(&mut self, spawner: Spawner) -> bool {
        if let Err(msg) = spawner.validate() {
            log::warn!("{}", msg);
            self.errors.push(ErrorKind::Input, msg);
            return false;
        }
        self.spawner = spawner;
        true
    }

    pub fn set_noise(&mut self, noise: Box<dyn NoiseSource>) {
        self.noise = noise;
    }

    pub fn set_evaluator(&mut self, evaluator: Option<Box<dyn CodeEvaluator>>) {
        self.evaluator = evaluator;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.events.mouse_mode_changed.publish(&mode);
    }

    /// Request a pause flip; it takes effect at the start of the next `step`.
    pub fn toggle_pause(&mut self) {
        self.pause_pending = !self.pause_pending;
    }

    /// Advance one tick with physics on and leave the simulation paused.
    ///
    /// A pending pause request is dropped. `pause_toggled` fires only when
    /// the simulation was running before the call.
    pub fn step_once(&mut self, extra_transformers: &[Transformer]) {
        let was_paused = self.paused;
        self.pause_pending = false;
        self.paused = false;
        self.step(extra_transformers);
        self.paused = true;
        if !was_paused {
            log::debug!("paused = true");
            self.events.pause_toggled.publish(&true);
        }
    }

    /// Stop the stepping loop after the current tick.
    pub fn quit(&mut self) {
        self.running = false;
    }

    // ---- lifecycle ----

    /// Add a particle to `particles` and to its group, creating the group if needed.
    /// Links to particles that are not registered are dropped.
    pub fn register(&mut self, particle: Particle) -> Result<ParticleId, SimError> {
        let id = self.insert(particle)?;
        self.prune_dangling_links(&[id]);
        Ok(id)
    }

    /// Register a batch whose members may link to each other.
    pub fn register_all(&mut self, particles: Vec<Particle>) -> Result<Vec<ParticleId>, SimError> {
        if let Some(p) = particles.iter().find(|p| !(p.props.mass > 0.0)) {
            return Err(SimError::NonPositiveMass(p.props.mass));
        }
        let mut ids = Vec::with_capacity(particles.len());
        for p in particles {
            ids.push(self.insert(p)?);
        }
        self.prune_dangling_links(&ids);
        Ok(ids)
    }

    fn insert(&mut self, mut particle: Particle) -> Result<ParticleId, SimError> {
        if !(particle.props.mass > 0.0) {
            return Err(SimError::NonPositiveMass(particle.props.mass));
        }
        let id = particle.id();
        if self.index.contains_key(&id) {
            return Ok(id);
        }
        particle.clear_collisions();
        let group = particle.props.group.clone();
        self.ensure_group(&group);
        self.index.insert(id, self.particles.len());
        self.particles.push(particle);
        if let Some(g) = self.groups.iter_mut().find(|g| g.name == group) {
            g.members.push(id);
        }
        Ok(id)
    }

    fn prune_dangling_links(&mut self, ids: &[ParticleId]) {
        for id in ids {
            let Some(&i) = self.index.get(id) else { continue };
            let dangling: Vec<ParticleId> = self.particles[i]
                .link_lengths
                .keys()
                .filter(|other| !self.index.contains_key(other))
                .copied()
                .collect();
            for other in dangling {
                self.particles[i].remove_link(other);
            }
        }
    }

    /// Create `name` if it does not exist yet and announce it.
    pub fn ensure_group(&mut self, name: &str) {
        if self.group(name).is_some() {
            return;
        }
        self.groups.push(Group { name: name.to_string(), members: Vec::new() });
        log::info!("created group {}", name);
        self.events.group_created.publish(&name.to_string());
    }

    /// Smallest `groupN` (N >= 1) not yet in use; the group is created.
    pub fn add_group(&mut self) -> String {
        let name = (1..)
            .map(|n| format!("{}{}", config::GROUP_PREFIX, n))
            .find(|name| self.group(name).is_none())
            .unwrap_or_else(|| config::DEFAULT_GROUP.to_string());
        self.ensure_group(&name);
        name
    }

    pub fn select_group(&mut self, name: &str) -> Result<(), SimError> {
        let group = self.group(name).ok_or_else(|| SimError::UnknownGroup(name.to_string()))?;
        self.selection = group.members.clone();
        Ok(())
    }

    /// Remove one particle and every reference to it. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ParticleId) -> bool {
        self.remove_many(&[id]) == 1
    }

    /// Remove a set of particles, keeping groups, selection and links consistent.
    /// Returns how many were removed.
    pub fn remove_many(&mut self, ids: &[ParticleId]) -> usize {
        let doomed: HashSet<ParticleId> =
            ids.iter().copied().filter(|id| self.index.contains_key(id)).collect();
        if doomed.is_empty() {
            return 0;
        }

        // Reciprocal link entries first, while the index is still valid.
        for id in &doomed {
            let i = self.index[id];
            let partners: Vec<ParticleId> = self.particles[i].link_lengths.keys().copied().collect();
            for partner in partners {
                if let Some(&j) = self.index.get(&partner) {
                    self.particles[j].remove_link(*id);
                }
            }
        }

        self.particles.retain(|p| !doomed.contains(&p.id()));
        self.rebuild_index();
        for group in &mut self.groups {
            group.members.retain(|id| !doomed.contains(id));
        }
        self.selection.retain(|id| !doomed.contains(id));
        doomed.len()
    }

    /// Remove every particle. Groups stay.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.index.clear();
        self.selection.clear();
        for group in &mut self.groups {
            group.members.clear();
        }
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.index = self.particles.iter().enumerate().map(|(i, p)| (p.id(), i)).collect();
    }

    /// Replace the static properties of a particle, moving it between groups
    /// when the group name changes.
    pub fn set_properties(&mut self, id: ParticleId, props: ParticleProperties) -> Result<(), SimError> {
        if !(props.mass > 0.0) {
            return Err(SimError::NonPositiveMass(props.mass));
        }
        let &i = self.index.get(&id).ok_or(SimError::UnknownParticle(id))?;
        let old_group = self.particles[i].props.group.clone();
        if old_group != props.group {
            self.ensure_group(&props.group);
            for group in &mut self.groups {
                if group.name == old_group {
                    group.members.retain(|m| *m != id);
                } else if group.name == props.group {
                    group.members.push(id);
                }
            }
        }
        self.particles[i].props = props;
        Ok(())
    }

    /// Apply `edit` to the properties of every selected particle.
    pub fn update_selection(&mut self, mut edit: impl FnMut(&mut ParticleProperties)) -> Result<(), SimError> {
        for id in self.selection.clone() {
            let Some(p) = self.particle(id) else { continue };
            let mut props = p.props.clone();
            edit(&mut props);
            self.set_properties(id, props)?;
        }
        Ok(())
    }

    /// Run the user-code string through the configured evaluator.
    /// Failures are queued as `Code-Error`; without an evaluator this is a no-op.
    pub fn execute(&mut self, code: &str) {
        let Some(mut evaluator) = self.evaluator.take() else {
            log::debug!("no code evaluator configured, skipping");
            return;
        };
        if let Err(e) = evaluator.evaluate(code, self) {
            log::warn!("user code failed: {:#}", e);
            self.errors.push(ErrorKind::Code, format!("{:#}", e));
        }
        if self.evaluator.is_none() {
            self.evaluator = Some(evaluator);
        }
    }

    // ---- stepping ----

    /// Advance one tick.
    ///
    /// Order: pending pause flip, interactions and transformers (when running),
    /// motion of grabbed particles, walls, void-edge culling.
    pub fn step(&mut self, extra_transformers: &[Transformer]) {
        profile_scope!("step");
        if self.pause_pending {
            self.pause_pending = false;
            self.paused = !self.paused;
            if !self.paused {
                self.selection.clear();
            }
            log::debug!("paused = {}", self.paused);
            let paused = self.paused;
            self.events.pause_toggled.publish(&paused);
        }

        if !self.paused {
            let interactions = self.compute_interactions();
            let mut chain: Vec<Transformer> = transformers::BUILTIN.to_vec();
            if self.config.show_links {
                chain.push(transformers::compute_links);
            }
            chain.extend_from_slice(extra_transformers);
            self.run_transformers(&interactions, &chain);
        }

        self.move_grabbed();
        self.apply_walls();
        self.cull_void_edges();

        self.mouse.prev_x = self.mouse.x;
        self.mouse.prev_y = self.mouse.y;
        self.frame += 1;
    }
}
