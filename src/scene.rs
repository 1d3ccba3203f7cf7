//! Dibujo de un cuadro: fecha, etiquetas, líneas guía y marcadores.

use colored::Color;

use crate::engine::{PositionSnapshot, CENTRAL_BODY};
use crate::error::OrbitsResult;
use crate::projection::{project, ViewportConfig};
use crate::surface::Surface;
use crate::time::to_calendar_date;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    pub background: Color,
    pub text: Color,
    /// Color del Sol.
    pub highlight: Color,
    pub body: Color,
    pub guide: Color,
    pub central_radius: f64,
    pub body_radius: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Color::Black,
            text: Color::White,
            highlight: Color::Yellow,
            body: Color::White,
            guide: Color::BrightBlack,
            central_radius: 5.0,
            body_radius: 2.0,
        }
    }
}

/// Posiciones fijas en píxeles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLayout {
    /// Distancia del bloque de fecha al borde derecho.
    pub date_inset: f64,
    pub date_top: f64,
    pub label_x: f64,
    pub label_top: f64,
    pub line_pitch: f64,
    /// X de donde salen las líneas guía, a la altura de cada etiqueta.
    pub guide_anchor_x: f64,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            date_inset: 95.0,
            date_top: 20.0,
            label_x: 10.0,
            label_top: 20.0,
            line_pitch: 20.0,
            guide_anchor_x: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub labels: usize,
    pub markers: usize,
    /// Cuerpos sin marcador por coordenadas no finitas.
    pub skipped: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SceneRenderer {
    pub style: SceneStyle,
    pub layout: SceneLayout,
}

impl SceneRenderer {
    /// Pinta toda la superficie con el fondo. Debe llamarse antes de `render`.
    pub fn clear<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (w, h) = surface.size();
        surface.set_fill_color(self.style.background);
        surface.fill_rect(0.0, 0.0, w as f64, h as f64);
    }

    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        snapshot: &PositionSnapshot,
        viewport: &ViewportConfig,
    ) -> OrbitsResult<RenderReport> {
        snapshot.validate()?;

        self.draw_date(surface, snapshot, viewport);

        let mut report = RenderReport::default();
        for (i, (name, coords)) in snapshot.bodies().enumerate() {
            let (x, y) = project(coords, viewport);
            let central = name == CENTRAL_BODY;
            let color = if central { self.style.highlight } else { self.style.body };
            let label_y = self.layout.label_top + self.layout.line_pitch * i as f64;

            surface.set_fill_color(color);
            surface.fill_text(name, self.layout.label_x, label_y);
            report.labels += 1;

            if !(x.is_finite() && y.is_finite()) {
                log::warn!("skipping marker for {name} (#{i}): projected to ({x}, {y})");
                report.skipped += 1;
                continue;
            }

            surface.set_stroke_color(self.style.guide);
            surface.begin_path();
            surface.move_to(self.layout.guide_anchor_x, label_y);
            surface.line_to(x, y);
            surface.stroke();

            let radius = if central { self.style.central_radius } else { self.style.body_radius };
            surface.begin_path();
            surface.fill_circle(x, y, radius);
            report.markers += 1;
        }

        Ok(report)
    }

    fn draw_date<S: Surface + ?Sized>(&self, surface: &mut S, snapshot: &PositionSnapshot, viewport: &ViewportConfig) {
        let date = to_calendar_date(snapshot.epoch);
        let x = viewport.width as f64 - self.layout.date_inset;
        let top = self.layout.date_top;
        let pitch = self.layout.line_pitch;

        surface.set_fill_color(self.style.text);
        surface.fill_text(&format!("Year: {}", date.year), x, top);
        surface.fill_text(&format!("Month: {}", date.month), x, top + pitch);
        surface.fill_text(&format!("Day: {}", date.day), x, top + 2.0 * pitch);
    }
}
