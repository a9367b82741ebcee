use crate::simulation::SimulationState;

use super::{particle, state, SimCommand};

/// Process a single `SimCommand` by delegating to the appropriate handler.
pub fn process_command(cmd: SimCommand, simulation: &mut SimulationState) {
    log::debug!("command {:?}", cmd);
    match cmd {
        SimCommand::MouseMove { x, y } => simulation.move_mouse(x, y),
        SimCommand::MousePressed => simulation.mouse_pressed(),
        SimCommand::MouseReleased => simulation.mouse_released(),
        SimCommand::SetMode { mode } => simulation.set_mode(mode),
        SimCommand::MouseRadiusScale { factor } => simulation.mouse_radius_scale(factor),
        SimCommand::RotateSelection { factor } => simulation.rotate_selection(factor),
        SimCommand::SelectAll => simulation.select_all(),
        SimCommand::ClearSelection => simulation.clear_selection(),
        SimCommand::SelectGroup { name } => {
            particle::handle_select_group(simulation, &name);
        }
        SimCommand::AddGroup => {
            simulation.add_group();
        }
        SimCommand::SetSelectionProperties { props } => {
            particle::handle_set_selection_properties(simulation, props);
        }
        SimCommand::DeleteSelection => {
            simulation.delete_selection();
        }
        SimCommand::Clear => simulation.clear(),
        SimCommand::Copy => simulation.copy_selection(),
        SimCommand::Cut => simulation.cut_selection(),
        SimCommand::Paste => particle::handle_paste(simulation),
        SimCommand::LinkSelection { fit_link, distance } => simulation.link_selection(fit_link, distance),
        SimCommand::UnlinkSelection => simulation.unlink_selection(),
        SimCommand::ChangeLinkLengths { delta } => {
            let ids = simulation.selection().to_vec();
            simulation.change_link_lengths(&ids, delta);
        }
        SimCommand::AddCircle { x, y, radius, group, linked } => {
            particle::handle_add_circle(simulation, x, y, radius, group.as_deref(), linked);
        }
        SimCommand::AddRectangle { x, y, width, height, group, linked } => {
            particle::handle_add_rectangle(simulation, x, y, width, height, group.as_deref(), linked);
        }
        SimCommand::AddRandom { count, group } => {
            particle::handle_add_random(simulation, count, group.as_deref());
        }
        SimCommand::SetConfig { config } => {
            simulation.set_config(config);
        }
        SimCommand::SetSpawner { spawner } => {
            simulation.set_spawner(spawner);
        }
        SimCommand::Execute { code } => simulation.execute(&code),
        SimCommand::TogglePause => simulation.toggle_pause(),
        SimCommand::StepOnce => state::handle_step_once(simulation),
        SimCommand::Save { path, format, compress } => {
            state::handle_save_state(simulation, &path, format, compress);
        }
        SimCommand::Load { path } => state::handle_load_state(simulation, &path),
        SimCommand::Quit => simulation.quit(),
    }
}
