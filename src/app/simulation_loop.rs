use crossbeam::channel::{Receiver, TryRecvError};

use crate::commands::{process_command, SimCommand};
use crate::profile_scope;
use crate::simulation::SimulationState;

#[cfg(feature = "profiling")]
const PROFILE_REPORT_INTERVAL: usize = 600;

/// Apply pending commands, step, repeat. Returns the final state once the
/// simulation quits, the tick budget is spent or every sender is gone.
pub fn run_simulation_loop(
    rx: Receiver<SimCommand>,
    mut simulation: SimulationState,
    max_ticks: Option<usize>,
) -> SimulationState {
    log::info!("simulation loop started with {} particle(s)", simulation.len());
    let start_frame = simulation.frame;
    loop {
        loop {
            match rx.try_recv() {
                Ok(cmd) => process_command(cmd, &mut simulation),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if max_ticks.is_none() {
                        simulation.quit();
                    }
                    break;
                }
            }
        }

        {
            profile_scope!("simulation_loop");
            simulation.step(&[]);
        }

        #[cfg(feature = "profiling")]
        {
            if simulation.frame % PROFILE_REPORT_INTERVAL == 0 {
                crate::PROFILER.lock().log_and_clear();
            }
        }

        if !simulation.running() {
            break;
        }
        if let Some(max) = max_ticks {
            if simulation.frame - start_frame >= max {
                break;
            }
        }
        if simulation.paused() {
            std::thread::yield_now();
        }
    }
    log::info!("simulation loop stopped after {} tick(s)", simulation.frame - start_frame);
    simulation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    #[test]
    fn stops_after_the_tick_budget() {
        let (_tx, rx) = unbounded();
        let simulation = run_simulation_loop(rx, SimulationState::new(), Some(5));
        assert_eq!(simulation.frame, 5);
    }

    #[test]
    fn commands_are_applied_before_stepping() {
        let (tx, rx) = unbounded();
        tx.send(SimCommand::AddGroup).unwrap();
        tx.send(SimCommand::Quit).unwrap();
        let simulation = run_simulation_loop(rx, SimulationState::new(), None);
        assert_eq!(simulation.frame, 1);
        assert!(simulation.group("group2").is_some());
    }

    #[test]
    fn dropped_sender_ends_an_open_ended_loop() {
        let (tx, rx) = unbounded::<SimCommand>();
        drop(tx);
        let simulation = run_simulation_loop(rx, SimulationState::new(), None);
        assert_eq!(simulation.frame, 1);
    }
}
