pub use crate::canvas::BrailleCanvas;
pub use crate::config::LoopConfig;
pub use crate::engine::{PositionSnapshot, SimulationEngine, CENTRAL_BODY};
pub use crate::error::{OrbitsError, OrbitsResult};
pub use crate::fps::{FrameRateMonitor, FrameStats};
pub use crate::projection::{project, ViewportConfig};
pub use crate::render_loop::{LoopState, SimulationLoop};
pub use crate::scene::{RenderReport, SceneLayout, SceneRenderer, SceneStyle};
pub use crate::scheduler::{CancelToken, FixedFrames, FrameScheduler};
pub use crate::solar::SolarSystem;
pub use crate::surface::Surface;
pub use crate::terminal::TerminalScheduler;
pub use crate::time::{to_calendar_date, CalendarDate, JulianDate, Month};
pub use colored::Color;
