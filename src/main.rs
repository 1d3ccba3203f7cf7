use std::fs::File;
use std::sync::Mutex;

use orbits_term::config::{ENV_LOG, ENV_SYSTEM};
use orbits_term::prelude::*;
use tracing_subscriber::filter::LevelFilter;

/// La terminal es de la pantalla: los registros van a un archivo, si se pide.
fn init_logging() -> OrbitsResult<()> {
    let Some(path) = std::env::var_os(ENV_LOG) else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(LevelFilter::DEBUG)
        .try_init()
        .map_err(|e| OrbitsError::InvalidConfig(format!("{ENV_LOG}: {e}")))
}

fn engine_from_env() -> OrbitsResult<(SolarSystem, &'static str)> {
    match std::env::var(ENV_SYSTEM).ok().as_deref().map(str::trim) {
        None | Some("") | Some("planets") => Ok((SolarSystem::create()?, "Sistema Solar (VSOP87)")),
        Some("mars") => Ok((SolarSystem::mars_comparison(), "Marte: VSOP87 vs Kepler")),
        Some(other) => Err(OrbitsError::InvalidConfig(format!("{ENV_SYSTEM}={other:?}"))),
    }
}

fn main() -> OrbitsResult<()> {
    init_logging()?;

    let config = LoopConfig::from_env()?;
    let (engine, title) = engine_from_env()?;

    let mut scheduler = TerminalScheduler::new(config.frame_budget, title);
    let mut sim = SimulationLoop::new(engine, config, scheduler.surface_size())?;
    sim.run(&mut scheduler, &CancelToken::new())
}
