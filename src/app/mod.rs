use crossbeam::channel::{unbounded, Sender};
use std::thread::JoinHandle;

use crate::commands::SimCommand;
use crate::errors::ErrorQueue;
use crate::simulation::SimulationState;

pub mod simulation_loop;
pub mod spawn;

pub const RANDOM_ATTEMPTS: usize = 100;

/// Host-side handle to a simulation running on its own thread.
pub struct SimHandle {
    sender: Sender<SimCommand>,
    errors: ErrorQueue,
    thread: JoinHandle<SimulationState>,
}

impl SimHandle {
    /// Queue a command for the next tick. Returns false once the loop has exited.
    pub fn send(&self, cmd: SimCommand) -> bool {
        self.sender.send(cmd).is_ok()
    }

    /// Queue shared with the stepping thread.
    pub fn errors(&self) -> &ErrorQueue {
        &self.errors
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Ask the loop to stop and wait for the final state.
    pub fn join(self) -> std::thread::Result<SimulationState> {
        let _ = self.sender.send(SimCommand::Quit);
        self.thread.join()
    }
}

/// Move `simulation` onto a stepping thread. With `max_ticks` the loop stops
/// on its own after that many ticks.
pub fn run(simulation: SimulationState, max_ticks: Option<usize>) -> std::io::Result<SimHandle> {
    let (tx, rx) = unbounded();
    let errors = simulation.error_queue();
    let thread = std::thread::Builder::new()
        .name("simulation".into())
        .spawn(move || simulation_loop::run_simulation_loop(rx, simulation, max_ticks))?;
    Ok(SimHandle { sender: tx, errors, thread })
}
