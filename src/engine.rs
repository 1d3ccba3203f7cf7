//! Frontera con el motor de simulación.

use crate::error::{OrbitsError, OrbitsResult};
use crate::time::JulianDate;

/// Nombre reservado para el cuerpo central.
pub const CENTRAL_BODY: &str = "Sol";

/// Posiciones de un cuadro. `coords[i]` pertenece a `names[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionSnapshot {
    pub epoch: JulianDate,
    pub coords: Vec<(f64, f64)>,
    pub names: Vec<String>,
}

impl PositionSnapshot {
    pub fn new(epoch: JulianDate, coords: Vec<(f64, f64)>, names: Vec<String>) -> Self {
        Self { epoch, coords, names }
    }

    pub fn empty(epoch: JulianDate) -> Self {
        Self::new(epoch, Vec::new(), Vec::new())
    }

    /// `coords` y `names` deben tener la misma longitud.
    pub fn validate(&self) -> OrbitsResult<()> {
        if self.coords.len() != self.names.len() {
            return Err(OrbitsError::MalformedSnapshot {
                coords: self.coords.len(),
                names: self.names.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (&str, (f64, f64))> + '_ {
        self.names.iter().map(String::as_str).zip(self.coords.iter().copied())
    }
}

/// Motor de simulación visto desde el bucle de render.
pub trait SimulationEngine {
    fn create() -> OrbitsResult<Self>
    where
        Self: Sized;

    /// Avanza la simulación `step_days` días.
    fn advance(&mut self, step_days: f64) -> OrbitsResult<()>;

    fn snapshot(&self) -> OrbitsResult<PositionSnapshot>;

    /// Tamaño de vista sugerido por el motor, si tiene uno.
    fn viewport_hint(&self) -> Option<(u32, u32)> {
        None
    }
}
