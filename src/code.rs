// code.rs
// Provider hook for user-supplied scripts

use crate::simulation::SimulationState;

/// Host-provided evaluator for the user-code string.
///
/// The evaluator gets full mutable access to the state for the duration of the
/// call. Any error it returns is queued as a `Code-Error`.
pub trait CodeEvaluator: Send {
    fn evaluate(&mut self, source: &str, state: &mut SimulationState) -> anyhow::Result<()>;
}

impl<F> CodeEvaluator for F
where
    F: FnMut(&str, &mut SimulationState) -> anyhow::Result<()> + Send,
{
    fn evaluate(&mut self, source: &str, state: &mut SimulationState) -> anyhow::Result<()> {
        self(source, state)
    }
}
