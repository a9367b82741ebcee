pub mod code;
pub mod commands;
pub mod config;
pub mod conversion;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod init_config;
pub mod io;
pub mod noise;
pub mod particle;
pub mod profiler;
pub mod simulation;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
