use crate::app::spawn;
use crate::errors::ErrorKind;
use crate::init_config::template_for;
use crate::particle::ParticleProperties;
use crate::simulation::SimulationState;

pub fn handle_select_group(simulation: &mut SimulationState, name: &str) {
    if let Err(e) = simulation.select_group(name) {
        log::warn!("{}", e);
        simulation.push_error(ErrorKind::Input, e.to_string());
    }
}

/// Give every selected particle `props`.
pub fn handle_set_selection_properties(simulation: &mut SimulationState, props: ParticleProperties) {
    if let Err(e) = simulation.update_selection(|p| *p = props.clone()) {
        log::warn!("{}", e);
        simulation.push_error(ErrorKind::Input, e.to_string());
    }
}

pub fn handle_paste(simulation: &mut SimulationState) {
    match simulation.paste() {
        Ok(ids) => log::debug!("pasted {} particle(s)", ids.len()),
        Err(e) => simulation.push_error(ErrorKind::Input, e.to_string()),
    }
}

pub fn handle_add_circle(
    simulation: &mut SimulationState,
    x: f64,
    y: f64,
    radius: f64,
    group: Option<&str>,
    linked: bool,
) {
    let spawner = template_for(&simulation.spawner, group);
    let ids = spawn::add_circle(simulation, &spawner, x, y, radius);
    if linked {
        spawn::link_neighbours(simulation, &ids);
    }
    log::info!("added circle of {} particle(s) at ({}, {})", ids.len(), x, y);
}

pub fn handle_add_rectangle(
    simulation: &mut SimulationState,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    group: Option<&str>,
    linked: bool,
) {
    let spawner = template_for(&simulation.spawner, group);
    let ids = spawn::add_rectangle(simulation, &spawner, x, y, width, height);
    if linked {
        spawn::link_neighbours(simulation, &ids);
    }
    log::info!("added {}x{} rectangle of {} particle(s)", width, height, ids.len());
}

pub fn handle_add_random(simulation: &mut SimulationState, count: usize, group: Option<&str>) {
    let spawner = template_for(&simulation.spawner, group);
    let ids = spawn::add_random(simulation, &spawner, count);
    if ids.len() < count {
        log::warn!("placed {} of {} random particle(s)", ids.len(), count);
    }
}
