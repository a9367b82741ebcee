// Ownership, selection, link and clipboard tests for SimulationState

use super::*;
use crate::config::SimConfig;
use crate::errors::{ErrorKind, SimError};
use crate::noise::QuietNoise;
use crate::particle::{Particle, ParticleId, ParticleProperties};
use std::collections::HashSet;
use ultraviolet::DVec2;

fn state() -> SimulationState {
    let mut state = SimulationState::with_config(SimConfig { air_res: 0.0, ..Default::default() });
    state.set_noise(Box::new(QuietNoise));
    state
}

fn add(state: &mut SimulationState, x: f64, y: f64, group: &str) -> ParticleId {
    let props = ParticleProperties { group: group.to_string(), ..Default::default() };
    state
        .register(Particle::new(DVec2::new(x, y), DVec2::zero(), 4.0, [10, 20, 30], props))
        .unwrap()
}

/// Every structural invariant the state promises between operations.
fn assert_consistent(state: &SimulationState) {
    let mut members = 0;
    for group in state.groups() {
        for id in &group.members {
            let p = state.particle(*id).expect("group member is registered");
            assert_eq!(p.group(), group.name);
        }
        members += group.members.len();
    }
    assert_eq!(members, state.len());

    for p in state.particles() {
        assert!(state.group(p.group()).unwrap().members.contains(&p.id()));
        assert!(!p.is_linked_to(p.id()));
        assert!(p.collision_partners().is_empty());
        for (other, length) in p.link_lengths() {
            let q = state.particle(*other).expect("link target is registered");
            assert_eq!(q.link_lengths().get(&p.id()), Some(length));
        }
    }

    let unique: HashSet<_> = state.selection().iter().collect();
    assert_eq!(unique.len(), state.selection().len());
    for id in state.selection() {
        assert!(state.particle(*id).is_some());
    }
}

#[cfg(test)]
mod ownership {
    use super::*;

    #[test]
    fn starts_with_the_default_group() {
        let state = state();
        assert_eq!(state.groups().len(), 1);
        assert_eq!(state.groups()[0].name, "group1");
        assert!(state.is_empty());
    }

    #[test]
    fn removal_cleans_every_reference() {
        let mut state = state();
        let a = add(&mut state, 10.0, 10.0, "group1");
        let b = add(&mut state, 20.0, 10.0, "group1");
        let c = add(&mut state, 30.0, 10.0, "group2");
        state.link(&[a, b, c], true, None);
        state.select_all();

        assert!(state.remove(b));
        assert!(!state.remove(b));
        assert_eq!(state.len(), 2);
        assert!(!state.particle(a).unwrap().is_linked_to(b));
        assert!(state.particle(a).unwrap().is_linked_to(c));
        assert_eq!(state.selection(), &[a, c]);
        assert_consistent(&state);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut state = state();
        let props = ParticleProperties { mass: 0.0, ..Default::default() };
        let p = Particle::new(DVec2::zero(), DVec2::zero(), 4.0, [0, 0, 0], props);
        assert_eq!(state.register(p), Err(SimError::NonPositiveMass(0.0)));
        assert!(state.is_empty());
    }

    #[test]
    fn registering_drops_links_to_unknown_particles() {
        let mut state = state();
        let mut p = Particle::new(DVec2::zero(), DVec2::zero(), 4.0, [0, 0, 0], ParticleProperties::default());
        p.set_link(ParticleId(u64::MAX), None);
        let id = state.register(p).unwrap();
        assert!(state.particle(id).unwrap().link_lengths().is_empty());
    }

    #[test]
    fn add_group_picks_smallest_free_name() {
        let mut state = state();
        add(&mut state, 10.0, 10.0, "group3");
        assert_eq!(state.add_group(), "group2");
        assert_eq!(state.add_group(), "group4");
        assert!(state.group("group2").is_some());
    }

    #[test]
    fn select_group_replaces_selection() {
        let mut state = state();
        let a = add(&mut state, 10.0, 10.0, "group1");
        let b = add(&mut state, 20.0, 10.0, "red");
        state.select(a).unwrap();
        state.select_group("red").unwrap();
        assert_eq!(state.selection(), &[b]);
        assert_eq!(state.select_group("blue"), Err(SimError::UnknownGroup("blue".into())));
    }

    #[test]
    fn changing_group_moves_membership() {
        let mut state = state();
        let a = add(&mut state, 10.0, 10.0, "group1");
        state.select(a).unwrap();
        state.update_selection(|props| props.group = "blue".into()).unwrap();
        assert!(state.group("group1").unwrap().members.is_empty());
        assert_eq!(state.group("blue").unwrap().members, vec![a]);
        assert_consistent(&state);

        let err = state.update_selection(|props| props.mass = -1.0);
        assert_eq!(err, Err(SimError::NonPositiveMass(-1.0)));
        assert_eq!(state.particle(a).unwrap().props().mass, 1.0);
    }

    #[test]
    fn invalid_settings_keep_the_old_ones() {
        let mut state = state();
        let before = state.config.clone();
        assert!(!state.set_config(SimConfig { air_res: 2.0, ..Default::default() }));
        assert_eq!(state.config, before);
        let errors = state.drain_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Input);

        assert!(state.set_config(SimConfig { g_dir: [0.0, 2.0], ..Default::default() }));
        assert_eq!(state.config.g_dir, [0.0, 1.0]);
    }

    #[test]
    fn code_failures_are_queued() {
        let mut state = state();
        state.execute("ignored");
        assert!(state.drain_errors().is_empty());

        state.set_evaluator(Some(Box::new(|src: &str, s: &mut SimulationState| {
            s.add_group();
            anyhow::ensure!(src != "boom", "script raised");
            Ok(())
        })));
        state.execute("fine");
        state.execute("boom");
        let errors = state.drain_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Code-Error: script raised");
        assert_eq!(state.groups().len(), 3);
    }
}

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn select_is_idempotent() {
        let mut state = state();
        let a = add(&mut state, 10.0, 10.0, "group1");
        state.select(a).unwrap();
        state.select(a).unwrap();
        assert_eq!(state.selection(), &[a]);
        assert_eq!(state.select(ParticleId(u64::MAX)), Err(SimError::UnknownParticle(ParticleId(u64::MAX))));
    }

    #[test]
    fn clicking_empty_space_resets_selection() {
        let mut state = state();
        let a = add(&mut state, 100.0, 100.0, "group1");
        let b = add(&mut state, 300.0, 300.0, "group1");
        state.move_mouse(100.0, 100.0);
        state.mouse_pressed();
        assert_eq!(state.selection(), &[a]);

        state.move_mouse(305.0, 300.0);
        state.mouse_pressed();
        assert_eq!(state.selection(), &[a, b]);

        state.move_mouse(600.0, 600.0);
        state.mouse_pressed();
        assert!(state.selection().is_empty());
    }

    #[test]
    fn remove_in_range_only_touches_the_cursor_area() {
        let mut state = state();
        let a = add(&mut state, 100.0, 100.0, "group1");
        let b = add(&mut state, 300.0, 300.0, "group1");
        state.select_all();
        state.move_mouse(100.0, 100.0);
        state.remove_in_range();
        assert_eq!(state.selection(), &[b]);
        assert!(state.particle(a).is_some());
    }

    #[test]
    fn add_mode_spawns_at_cursor() {
        let mut state = state();
        state.set_mode(Mode::Add);
        state.move_mouse(40.0, 60.0);
        state.mouse_pressed();
        assert_eq!(state.len(), 1);
        assert_eq!(state.particles()[0].pos, DVec2::new(40.0, 60.0));
    }

    #[test]
    fn rotation_is_scaled_by_mouse_radius() {
        let mut state = state();
        let a = add(&mut state, 110.0, 100.0, "group1");
        state.select(a).unwrap();
        state.move_mouse(100.0, 100.0);
        state.mouse.radius = 30.0;
        state.rotate_selection(3.0);
        let p = state.particle(a).unwrap().pos;
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn mouse_radius_never_drops_below_one() {
        let mut state = state();
        state.mouse_radius_scale(1.0);
        assert_eq!(state.mouse.radius, 60.0);
        state.mouse_radius_scale(-20.0);
        assert_eq!(state.mouse.radius, 1.0);
    }

    #[test]
    fn delete_selection_removes_selected_only() {
        let mut state = state();
        let a = add(&mut state, 10.0, 10.0, "group1");
        let b = add(&mut state, 20.0, 10.0, "group1");
        state.link(&[a, b], false, None);
        state.select(a).unwrap();
        assert_eq!(state.delete_selection(), 1);
        assert!(state.particle(b).unwrap().link_lengths().is_empty());
        assert_consistent(&state);
    }
}

#[cfg(test)]
mod links {
    use super::*;

    #[test]
    fn plain_link_is_idempotent() {
        let mut state = state();
        let ids: Vec<_> = (0..3).map(|i| add(&mut state, 10.0 * i as f64, 0.0, "group1")).collect();
        state.link(&ids, false, None);
        let once: Vec<_> = state.particles().iter().map(|p| p.link_lengths().clone()).collect();
        state.link(&ids, false, None);
        let twice: Vec<_> = state.particles().iter().map(|p| p.link_lengths().clone()).collect();
        assert_eq!(once, twice);
        assert_eq!(once[0].len(), 2);
    }

    #[test]
    fn unlink_restores_previous_links() {
        let mut state = state();
        let ids: Vec<_> = (0..4).map(|i| add(&mut state, 10.0 * i as f64, 0.0, "group1")).collect();
        state.link(&ids[2..], true, Some(5.0));
        let before: Vec<_> = state.particles().iter().map(|p| p.link_lengths().clone()).collect();
        state.link(&ids[..2], true, None);
        state.unlink(&ids[..2]);
        let after: Vec<_> = state.particles().iter().map(|p| p.link_lengths().clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn fit_link_uses_current_distance() {
        let mut state = state();
        let a = add(&mut state, 0.0, 0.0, "group1");
        let b = add(&mut state, 3.0, 4.0, "group1");
        state.link(&[a, b], true, None);
        assert_eq!(state.particle(a).unwrap().rest_length(b), Some(5.0));
        state.change_link_lengths(&[a, b], 2.5);
        assert_eq!(state.particle(a).unwrap().rest_length(b), Some(7.5));
        assert_eq!(state.particle(b).unwrap().rest_length(a), Some(7.5));
    }

    #[test]
    fn change_link_lengths_skips_plain_links() {
        let mut state = state();
        let a = add(&mut state, 0.0, 0.0, "group1");
        let b = add(&mut state, 3.0, 4.0, "group1");
        state.link(&[a, b], false, None);
        state.change_link_lengths(&[a, b], 1.0);
        assert_eq!(state.particle(a).unwrap().link_lengths().get(&b), Some(&None));
    }
}

#[cfg(test)]
mod clipboard {
    use super::*;

    #[test]
    fn paste_reproduces_the_copied_subgraph() {
        let mut state = state();
        let a = add(&mut state, 100.0, 100.0, "group1");
        let b = add(&mut state, 110.0, 100.0, "red");
        let c = add(&mut state, 120.0, 100.0, "group1");
        state.link(&[a, b], true, None);
        state.link(&[b, c], false, None);
        state.select(a).unwrap();
        state.select(b).unwrap();

        state.move_mouse(100.0, 100.0);
        state.copy_selection();
        state.move_mouse(300.0, 200.0);
        let pasted = state.paste().unwrap();

        assert_eq!(pasted.len(), 2);
        assert_eq!(state.selection(), pasted.as_slice());
        let (pa, pb) = (state.particle(pasted[0]).unwrap(), state.particle(pasted[1]).unwrap());
        assert_eq!(pa.pos, DVec2::new(300.0, 200.0));
        assert_eq!(pb.pos, DVec2::new(310.0, 200.0));
        assert_eq!(pb.group(), "red");
        assert!(pa.mouse && pb.mouse);
        assert_eq!(pa.rest_length(pb.id()), Some(10.0));
        // the link to c lay outside the copied set
        assert_eq!(pb.link_lengths().len(), 1);
        assert_consistent(&state);
    }

    #[test]
    fn cut_removes_the_originals() {
        let mut state = state();
        let a = add(&mut state, 100.0, 100.0, "group1");
        state.select(a).unwrap();
        state.cut_selection();
        assert!(state.is_empty());
        assert_eq!(state.clipboard().len(), 1);
        state.paste().unwrap();
        assert_eq!(state.len(), 1);
    }
}

#[cfg(test)]
mod invariants {
    use super::*;

    fn random_subset(rng: &mut fastrand::Rng, state: &SimulationState) -> Vec<ParticleId> {
        state.particles().iter().filter(|_| rng.bool()).map(Particle::id).collect()
    }

    #[test]
    fn random_workloads_keep_the_graph_consistent() {
        for seed in 0..8 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut state = SimulationState::with_config(SimConfig {
                width: 300.0,
                height: 300.0,
                void_edges: true,
                ..Default::default()
            });
            state.set_noise(Box::new(crate::noise::RandomNoise::seeded(seed)));

            for _ in 0..150 {
                match rng.usize(0..12) {
                    0..=2 => {
                        let props = ParticleProperties {
                            group: format!("group{}", rng.usize(1..4)),
                            collisions: rng.bool(),
                            link_attr_breaking_force: if rng.bool() { 0.01 } else { -1.0 },
                            ..Default::default()
                        };
                        let p = Particle::new(
                            DVec2::new(rng.f64() * 320.0 - 10.0, rng.f64() * 300.0),
                            DVec2::new(rng.f64() - 0.5, rng.f64() - 0.5),
                            4.0,
                            [0, 0, 0],
                            props,
                        );
                        state.register(p).unwrap();
                    }
                    3 => {
                        if let Some(p) = rng.choice(state.particles().iter().map(Particle::id).collect::<Vec<_>>()) {
                            state.remove(p);
                        }
                    }
                    4 => {
                        for id in random_subset(&mut rng, &state) {
                            state.select(id).unwrap();
                        }
                    }
                    5 => {
                        let ids = random_subset(&mut rng, &state);
                        state.link(&ids, rng.bool(), None);
                    }
                    6 => {
                        let ids = random_subset(&mut rng, &state);
                        state.unlink(&ids);
                    }
                    7 => {
                        state.move_mouse(rng.f64() * 300.0, rng.f64() * 300.0);
                        state.copy_selection();
                        state.paste().unwrap();
                        state.mouse_released();
                    }
                    8 => {
                        state.delete_selection();
                    }
                    9 => {
                        let group = format!("group{}", rng.usize(1..5));
                        let _ = state.update_selection(|props| props.group = group.clone());
                    }
                    _ => state.step(&[]),
                }
                assert_consistent(&state);
            }
        }
    }
}
