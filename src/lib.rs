pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod fps;
pub mod kepler;
pub mod prelude;
pub mod projection;
pub mod render_loop;
pub mod scene;
pub mod scheduler;
pub mod solar;
pub mod surface;
pub mod terminal;
pub mod time;

pub use canvas::BrailleCanvas;
pub use config::LoopConfig;
pub use engine::{PositionSnapshot, SimulationEngine};
pub use error::{OrbitsError, OrbitsResult};
pub use render_loop::SimulationLoop;
