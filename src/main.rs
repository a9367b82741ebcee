use anyhow::{anyhow, Context, Result};
use particle_playground::app;
use particle_playground::commands::{process_command, SimCommand};
use particle_playground::init_config::InitConfig;
use particle_playground::io::{save_scene, SaveFormat, SavedScene};
use particle_playground::simulation::SimulationState;

const DEFAULT_TICKS: usize = 600;

/// `particle_playground [scene.toml] [ticks] [output.json|output.json.gz|output.bin]`
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scene = match args.first() {
        Some(path) => Some(
            InitConfig::load_from_file(path).map_err(|e| anyhow!("failed to read scene {}: {}", path, e))?,
        ),
        None => InitConfig::load_default().ok(),
    };
    let ticks = match args.get(1) {
        Some(n) => n.parse::<usize>().with_context(|| format!("invalid tick count {:?}", n))?,
        None => DEFAULT_TICKS,
    };

    let mut simulation = match &scene {
        Some(scene) => SimulationState::with_config(scene.sim_config()),
        None => SimulationState::new(),
    };
    if let Some(scene) = scene {
        populate(&mut simulation, scene);
    }
    log::info!("starting with {} particle(s), {} tick(s)", simulation.len(), ticks);

    let handle = app::run(simulation, Some(ticks)).context("failed to start the simulation thread")?;
    let simulation = handle.join().map_err(|_| anyhow!("simulation thread panicked"))?;
    for error in simulation.drain_errors() {
        log::warn!("{}", error);
    }

    if let Some(out) = args.get(2) {
        let format = if out.contains(".bin") { SaveFormat::Binary } else { SaveFormat::Json };
        let compress = out.ends_with(".gz");
        save_scene(out, &SavedScene::from_state(&simulation), format, compress)
            .with_context(|| format!("failed to save {}", out))?;
    }
    Ok(())
}

fn populate(simulation: &mut SimulationState, scene: InitConfig) {
    for c in scene.particles.circles {
        let cmd = SimCommand::AddCircle { x: c.x, y: c.y, radius: c.radius, group: c.group, linked: c.linked };
        process_command(cmd, simulation);
    }
    for r in scene.particles.rectangles {
        let cmd = SimCommand::AddRectangle {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            group: r.group,
            linked: r.linked,
        };
        process_command(cmd, simulation);
    }
    for r in scene.particles.random {
        process_command(SimCommand::AddRandom { count: r.count, group: r.group }, simulation);
    }
}
