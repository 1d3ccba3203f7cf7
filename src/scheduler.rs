//! Planificación de cuadros.
//!
//! Un `FrameScheduler` llama al callback de cuadro una vez por tick, nunca
//! dos a la vez: el callback se toma por `&mut` y corre hasta terminar antes
//! de pedir el siguiente tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::OrbitsResult;
use crate::surface::Surface;

/// Token de cancelación opaco. Los clones comparten estado.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Callback de un cuadro: recibe la superficie y el texto del monitor de FPS.
pub type FrameFn<'a, S> = dyn FnMut(&mut S, &mut String) -> OrbitsResult<()> + 'a;

pub trait FrameScheduler {
    type Surface: Surface;

    /// Tamaño de la superficie en píxeles.
    fn surface_size(&self) -> (u32, u32);

    /// Repite `frame` hasta que falle o se cancele `token`. Un error del
    /// cuadro detiene la planificación y se devuelve tal cual.
    fn run(&mut self, token: &CancelToken, frame: &mut FrameFn<'_, Self::Surface>) -> OrbitsResult<()>;
}

/// Ejecuta un número fijo de cuadros sin esperar entre ellos. Sin terminal:
/// para pruebas y ejecuciones sin pantalla.
pub struct FixedFrames<S> {
    surface: S,
    remaining: usize,
    readout: String,
    ran: usize,
}

impl<S: Surface> FixedFrames<S> {
    pub fn new(surface: S, frames: usize) -> Self {
        Self { surface, remaining: frames, readout: String::new(), ran: 0 }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Texto del monitor tras el último cuadro.
    pub fn readout(&self) -> &str {
        &self.readout
    }

    pub fn frames_run(&self) -> usize {
        self.ran
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: Surface> FrameScheduler for FixedFrames<S> {
    type Surface = S;

    fn surface_size(&self) -> (u32, u32) {
        self.surface.size()
    }

    fn run(&mut self, token: &CancelToken, frame: &mut FrameFn<'_, S>) -> OrbitsResult<()> {
        while self.remaining > 0 && !token.is_cancelled() {
            self.remaining -= 1;
            self.readout.clear();
            frame(&mut self.surface, &mut self.readout)?;
            self.ran += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrbitsError;
    use crate::surface::recording::RecordingSurface;

    #[test]
    fn runs_requested_number_of_frames() {
        let mut sched = FixedFrames::new(RecordingSurface::new(10, 10), 5);
        let mut count = 0;
        sched
            .run(&CancelToken::new(), &mut |_, _| {
                count += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 5);
        assert_eq!(sched.frames_run(), 5);
    }

    #[test]
    fn cancellation_stops_before_next_frame() {
        let token = CancelToken::new();
        let inner = token.clone();
        let mut sched = FixedFrames::new(RecordingSurface::new(10, 10), 100);
        let mut count = 0;
        sched
            .run(&token, &mut |_, _| {
                count += 1;
                if count == 3 {
                    inner.cancel();
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn frame_error_stops_scheduling() {
        let mut sched = FixedFrames::new(RecordingSurface::new(10, 10), 10);
        let mut count = 0;
        let result = sched.run(&CancelToken::new(), &mut |_, _| {
            count += 1;
            Err(OrbitsError::Engine("boom".into()))
        });
        assert!(matches!(result, Err(OrbitsError::Engine(_))));
        assert_eq!(count, 1);
        assert_eq!(sched.frames_run(), 0);
    }
}
