// commands/mod.rs
// Messages marshaled from the UI thread onto the stepping thread

use crate::config::SimConfig;
use crate::conversion::Spawner;
use crate::io::SaveFormat;
use crate::particle::ParticleProperties;
use crate::simulation::Mode;

pub mod dispatcher;
pub mod particle;
pub mod state;

pub use dispatcher::process_command;

/// Simulation commands.
/// Sent to the simulation thread, applied before the next tick.
#[derive(Clone, Debug)]
pub enum SimCommand {
    MouseMove { x: f64, y: f64 },
    MousePressed,
    MouseReleased,
    SetMode { mode: Mode },
    MouseRadiusScale { factor: f64 },
    RotateSelection { factor: f64 },
    SelectAll,
    ClearSelection,
    SelectGroup { name: String },
    AddGroup,
    SetSelectionProperties { props: ParticleProperties },
    DeleteSelection,
    Clear,
    Copy,
    Cut,
    Paste,
    LinkSelection { fit_link: bool, distance: Option<f64> },
    UnlinkSelection,
    ChangeLinkLengths { delta: f64 },
    AddCircle {
        x: f64,
        y: f64,
        radius: f64,
        group: Option<String>,
        linked: bool,
    },
    AddRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        group: Option<String>,
        linked: bool,
    },
    AddRandom { count: usize, group: Option<String> },
    SetConfig { config: SimConfig },
    SetSpawner { spawner: Spawner },
    Execute { code: String },
    TogglePause,
    StepOnce,
    Save { path: String, format: SaveFormat, compress: bool },
    Load { path: String },
    Quit,
}
