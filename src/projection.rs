use crate::error::{OrbitsError, OrbitsResult};

/// Dimensiones de la vista en píxeles y escala en píxeles por unidad (UA).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    pub zoom_factor: f64,
}

impl ViewportConfig {
    pub fn new(width: u32, height: u32, zoom_factor: f64) -> OrbitsResult<Self> {
        if width == 0 || height == 0 {
            return Err(OrbitsError::InvalidConfig(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        if !(zoom_factor.is_finite() && zoom_factor > 0.0) {
            return Err(OrbitsError::InvalidConfig(format!(
                "zoom factor must be positive, got {zoom_factor}"
            )));
        }
        Ok(Self { width, height, zoom_factor })
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Lleva un punto de la simulación a la pantalla. El eje Y se invierte: en la
/// superficie de dibujo crece hacia abajo.
#[inline]
pub fn project(point: (f64, f64), viewport: &ViewportConfig) -> (f64, f64) {
    let (cx, cy) = viewport.center();
    (
        point.0 * viewport.zoom_factor + cx,
        -point.1 * viewport.zoom_factor + cy,
    )
}
