//! Bucle de simulación: un ciclo por cuadro.

use crate::config::LoopConfig;
use crate::engine::SimulationEngine;
use crate::error::{OrbitsError, OrbitsResult};
use crate::fps::FrameRateMonitor;
use crate::projection::ViewportConfig;
use crate::scene::{RenderReport, SceneRenderer};
use crate::scheduler::{CancelToken, FrameScheduler};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Stepping,
    Rendering,
    /// Cuadro terminado, esperando el siguiente tick.
    Scheduled,
    /// Un fallo detuvo el bucle; no se planifican más cuadros.
    Halted,
}

pub struct SimulationLoop<E> {
    engine: E,
    config: LoopConfig,
    viewport: ViewportConfig,
    renderer: SceneRenderer,
    monitor: FrameRateMonitor,
    state: LoopState,
    frames: u64,
}

impl<E: SimulationEngine> SimulationLoop<E> {
    /// `surface_size` es el tamaño del anfitrión; con
    /// `use_engine_viewport_hints` manda la sugerencia del motor si la hay.
    pub fn new(engine: E, config: LoopConfig, surface_size: (u32, u32)) -> OrbitsResult<Self> {
        config.validate()?;

        let (width, height) = match engine.viewport_hint() {
            Some(hint) if config.use_engine_viewport_hints => {
                log::debug!("using engine viewport hint {}x{}", hint.0, hint.1);
                hint
            }
            _ => surface_size,
        };
        let viewport = ViewportConfig::new(width, height, config.zoom_factor)?;

        Ok(Self {
            engine,
            config,
            viewport,
            renderer: SceneRenderer::default(),
            monitor: FrameRateMonitor::new(),
            state: LoopState::Idle,
            frames: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn monitor(&self) -> &FrameRateMonitor {
        &self.monitor
    }

    /// Un ciclo completo. Cualquier error deja el bucle en `Halted`.
    pub fn cycle<S: Surface + ?Sized>(&mut self, surface: &mut S, readout: &mut String) -> OrbitsResult<RenderReport> {
        if self.state == LoopState::Halted {
            return Err(OrbitsError::Halted);
        }

        match self.step_and_draw(surface, readout) {
            Ok(report) => {
                self.frames += 1;
                self.state = LoopState::Scheduled;
                Ok(report)
            }
            Err(err) => {
                log::error!("simulation loop halted at frame {}: {err}", self.frames);
                self.state = LoopState::Halted;
                Err(err)
            }
        }
    }

    fn step_and_draw<S: Surface + ?Sized>(&mut self, surface: &mut S, readout: &mut String) -> OrbitsResult<RenderReport> {
        self.monitor.sample();
        self.monitor.render(readout)?;

        self.renderer.clear(surface);

        self.state = LoopState::Stepping;
        self.engine.advance(self.config.step_days)?;
        let snapshot = self.engine.snapshot()?;

        self.state = LoopState::Rendering;
        let report = self.renderer.render(surface, &snapshot, &self.viewport)?;
        log::debug!(
            "frame {}: JD {:.1}, {} markers, {} skipped",
            self.frames,
            snapshot.epoch.0,
            report.markers,
            report.skipped
        );
        Ok(report)
    }

    /// Entrega el ciclo al planificador hasta que éste pare o un ciclo falle.
    pub fn run<H>(&mut self, scheduler: &mut H, token: &CancelToken) -> OrbitsResult<()>
    where
        H: FrameScheduler,
    {
        log::info!(
            "simulation loop starting: {} days/frame, zoom {}, viewport {}x{}",
            self.config.step_days,
            self.config.zoom_factor,
            self.viewport.width,
            self.viewport.height
        );

        let result = scheduler.run(token, &mut |surface, readout| self.cycle(surface, readout).map(|_| ()));

        if self.state != LoopState::Halted {
            self.state = LoopState::Idle;
        }
        log::info!("simulation loop stopped after {} frames", self.frames);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PositionSnapshot;
    use crate::scheduler::FixedFrames;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use crate::time::JulianDate;

    /// Motor de prueba: dos cuerpos fijos y la época que avanza.
    struct Canned {
        epoch: JulianDate,
        steps: Vec<f64>,
        hint: Option<(u32, u32)>,
        fail_after: Option<usize>,
        /// Entrega un nombre menos que coordenadas.
        drop_name: bool,
    }

    impl SimulationEngine for Canned {
        fn create() -> OrbitsResult<Self> {
            Ok(Self { epoch: JulianDate(2459642.5), steps: Vec::new(), hint: None, fail_after: None, drop_name: false })
        }

        fn advance(&mut self, step_days: f64) -> OrbitsResult<()> {
            if self.fail_after == Some(self.steps.len()) {
                return Err(OrbitsError::Engine("integrator diverged".into()));
            }
            self.steps.push(step_days);
            self.epoch = self.epoch.plus_days(step_days);
            Ok(())
        }

        fn snapshot(&self) -> OrbitsResult<PositionSnapshot> {
            let mut names = vec!["Sol".to_string(), "Earth".to_string()];
            if self.drop_name {
                names.pop();
            }
            Ok(PositionSnapshot::new(self.epoch, vec![(0.0, 0.0), (1.0, 0.0)], names))
        }

        fn viewport_hint(&self) -> Option<(u32, u32)> {
            self.hint
        }
    }

    #[test]
    fn cycle_clears_then_draws_in_order() {
        let mut sim = SimulationLoop::new(Canned::create().unwrap(), LoopConfig::inner(), (1200, 800)).unwrap();
        let mut surface = RecordingSurface::new(1200, 800);
        let mut readout = String::new();

        let report = sim.cycle(&mut surface, &mut readout).unwrap();
        assert_eq!(report.markers, 2);
        assert_eq!(sim.state(), LoopState::Scheduled);
        assert_eq!(sim.engine().steps, vec![10.0]);
        assert!(readout.starts_with("Frames per Second:"));
        assert_eq!(sim.config(), &LoopConfig::inner());
        assert!(sim.monitor().is_empty());

        assert!(matches!(surface.calls[0], DrawCall::FillRect { color: colored::Color::Black, .. }));
        assert!(surface.texts().any(|t| t == "Day: 14"));
    }

    #[test]
    fn engine_failure_halts_the_loop() {
        let mut engine = Canned::create().unwrap();
        engine.fail_after = Some(2);
        let mut sim = SimulationLoop::new(engine, LoopConfig::outer(), (1200, 800)).unwrap();
        let mut sched = FixedFrames::new(RecordingSurface::new(1200, 800), 10);

        let err = sim.run(&mut sched, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, OrbitsError::Engine(_)));
        assert_eq!(sim.state(), LoopState::Halted);
        assert_eq!(sim.frames(), 2);
        assert_eq!(sched.frames_run(), 2);

        let mut surface = RecordingSurface::new(10, 10);
        let mut readout = String::new();
        assert!(matches!(sim.cycle(&mut surface, &mut readout), Err(OrbitsError::Halted)));
    }

    #[test]
    fn malformed_snapshot_is_fatal() {
        let mut engine = Canned::create().unwrap();
        engine.drop_name = true;
        let mut sim = SimulationLoop::new(engine, LoopConfig::inner(), (1200, 800)).unwrap();
        let mut surface = RecordingSurface::new(1200, 800);
        let mut readout = String::new();

        let err = sim.cycle(&mut surface, &mut readout).unwrap_err();
        assert!(matches!(err, OrbitsError::MalformedSnapshot { coords: 2, names: 1 }));
        assert_eq!(sim.state(), LoopState::Halted);
        assert_eq!(sim.frames(), 0);
        // sólo el borrado previo; nada de la escena
        assert_eq!(surface.calls.len(), 1);
        assert!(matches!(surface.calls[0], DrawCall::FillRect { .. }));

        assert!(matches!(sim.cycle(&mut surface, &mut readout), Err(OrbitsError::Halted)));
        assert_eq!(sim.engine().steps.len(), 1);
    }

    #[test]
    fn malformed_snapshot_stops_the_scheduler() {
        let mut engine = Canned::create().unwrap();
        engine.drop_name = true;
        let mut sim = SimulationLoop::new(engine, LoopConfig::inner(), (1200, 800)).unwrap();
        let mut sched = FixedFrames::new(RecordingSurface::new(1200, 800), 5);

        let err = sim.run(&mut sched, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, OrbitsError::MalformedSnapshot { .. }));
        assert_eq!(sim.state(), LoopState::Halted);
        assert_eq!(sched.frames_run(), 0);
    }

    #[test]
    fn viewport_hint_only_with_flag() {
        let mut engine = Canned::create().unwrap();
        engine.hint = Some((640, 480));
        let with = SimulationLoop::new(engine, LoopConfig::outer(), (1200, 800)).unwrap();
        assert_eq!((with.viewport().width, with.viewport().height), (640, 480));

        let mut engine = Canned::create().unwrap();
        engine.hint = Some((640, 480));
        let without = SimulationLoop::new(engine, LoopConfig::inner(), (1200, 800)).unwrap();
        assert_eq!((without.viewport().width, without.viewport().height), (1200, 800));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = LoopConfig { step_days: 0.0, ..LoopConfig::inner() };
        assert!(matches!(
            SimulationLoop::new(Canned::create().unwrap(), config, (100, 100)),
            Err(OrbitsError::InvalidConfig(_))
        ));
        assert!(SimulationLoop::new(Canned::create().unwrap(), LoopConfig::inner(), (0, 100)).is_err());
    }

    #[test]
    fn run_returns_to_idle_when_scheduler_stops() {
        let mut sim = SimulationLoop::new(Canned::create().unwrap(), LoopConfig::inner(), (1200, 800)).unwrap();
        let mut sched = FixedFrames::new(RecordingSurface::new(1200, 800), 3);
        sim.run(&mut sched, &CancelToken::new()).unwrap();
        assert_eq!(sim.frames(), 3);
        assert_eq!(sim.state(), LoopState::Idle);
        assert_eq!(sim.engine().steps, vec![10.0; 3]);
    }

    #[test]
    fn solar_system_on_braille_canvas() {
        use crate::canvas::BrailleCanvas;
        use crate::solar::SolarSystem;

        let engine = SolarSystem::create().unwrap();
        let mut sched = FixedFrames::new(BrailleCanvas::new(120, 40), 3);
        let mut sim = SimulationLoop::new(engine, LoopConfig::inner(), sched.surface_size()).unwrap();
        sim.run(&mut sched, &CancelToken::new()).unwrap();

        assert_eq!(sim.frames(), 3);
        assert!(sched.readout().starts_with("Frames per Second:"));

        let canvas = sched.into_surface();
        // el Sol en el centro de 240x160 píxeles
        assert!(canvas.is_set(120, 80));
        let plain = canvas.render_plain();
        for text in ["Year: 2022", "Month: Apr", "Day: 3", "Sol", "Mercury", "Saturn"] {
            assert!(plain.contains(text), "missing {text:?}\n{plain}");
        }
    }
}
