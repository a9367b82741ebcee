use crate::errors::ErrorKind;
use crate::io::{load_scene, save_scene, SaveFormat, SavedScene};
use crate::profile_scope;
use crate::simulation::SimulationState;

#[cfg(feature = "profiling")]
use crate::PROFILER;

/// Advance exactly one tick with physics on, then leave the simulation paused.
pub fn handle_step_once(simulation: &mut SimulationState) {
    simulation.step_once(&[]);
    #[cfg(feature = "profiling")]
    {
        PROFILER.lock().log_and_clear();
    }
}

/// Save the scene to disk. Failures are queued as `Saving-Error`.
pub fn handle_save_state(simulation: &SimulationState, path: &str, format: SaveFormat, compress: bool) {
    profile_scope!("save");
    let scene = SavedScene::from_state(simulation);
    if let Err(e) = save_scene(path, &scene, format, compress) {
        log::warn!("failed to save {}: {}", path, e);
        simulation.push_error(ErrorKind::Saving, format!("{}: {}", path, e));
    }
}

/// Load a scene from disk. Failures are queued as `Loading-Error`.
pub fn handle_load_state(simulation: &mut SimulationState, path: &str) {
    profile_scope!("load");
    match load_scene(path).and_then(|scene| scene.apply_to(simulation)) {
        Ok(count) => log::info!("loaded {} particle(s) from {}", count, path),
        Err(e) => {
            log::warn!("failed to load {}: {}", path, e);
            simulation.push_error(ErrorKind::Loading, format!("{}: {}", path, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{process_command, SimCommand};
    use crate::events::SubscriberId;
    use crate::particle::{Particle, ParticleProperties};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use ultraviolet::DVec2;

    fn recording_toggles(simulation: &mut SimulationState) -> Arc<Mutex<Vec<bool>>> {
        let toggles = Arc::new(Mutex::new(Vec::new()));
        let sink = toggles.clone();
        simulation.events.pause_toggled.subscribe(SubscriberId(7), move |p: &bool| sink.lock().push(*p));
        toggles
    }

    #[test]
    fn missing_file_is_a_loading_error() {
        let mut simulation = SimulationState::new();
        process_command(SimCommand::Load { path: "/definitely/not/here.json".into() }, &mut simulation);
        let errors = simulation.drain_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Loading);
    }

    #[test]
    fn unknown_group_is_an_input_error() {
        let mut simulation = SimulationState::new();
        process_command(SimCommand::SelectGroup { name: "nope".into() }, &mut simulation);
        assert_eq!(simulation.drain_errors()[0].kind, ErrorKind::Input);
    }

    #[test]
    fn step_once_leaves_the_simulation_paused() {
        let mut simulation = SimulationState::new();
        process_command(SimCommand::StepOnce, &mut simulation);
        assert!(simulation.paused());
        assert_eq!(simulation.frame, 1);
    }

    #[test]
    fn step_once_from_running_announces_the_pause() {
        let mut simulation = SimulationState::new();
        let toggles = recording_toggles(&mut simulation);
        process_command(SimCommand::StepOnce, &mut simulation);
        assert!(simulation.paused());
        assert_eq!(*toggles.lock(), vec![true]);

        process_command(SimCommand::StepOnce, &mut simulation);
        assert_eq!(*toggles.lock(), vec![true]);
    }

    #[test]
    fn step_once_runs_physics_despite_a_pending_toggle() {
        let mut simulation = SimulationState::new();
        let id = simulation
            .register(Particle::new(
                DVec2::new(50.0, 50.0),
                DVec2::new(1.0, 0.0),
                4.0,
                [0, 0, 0],
                ParticleProperties::default(),
            ))
            .unwrap();
        let toggles = recording_toggles(&mut simulation);
        process_command(SimCommand::TogglePause, &mut simulation);
        process_command(SimCommand::StepOnce, &mut simulation);

        assert!(simulation.paused());
        assert!(simulation.particle(id).unwrap().pos.x > 50.0);
        assert_eq!(*toggles.lock(), vec![true]);

        // the request was consumed, so the next tick stays paused
        simulation.step(&[]);
        assert!(simulation.paused());
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut simulation = SimulationState::new();
        process_command(SimCommand::Quit, &mut simulation);
        assert!(!simulation.running());
    }
}
