//! Superficie de dibujo 2D en modo inmediato.
//!
//! Coordenadas en píxeles de pantalla: origen arriba a la izquierda, Y hacia
//! abajo. Las llamadas se pintan en orden; lo último queda encima.

use colored::Color;

pub trait Surface {
    /// Tamaño en píxeles (ancho, alto).
    fn size(&self) -> (u32, u32);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);

    /// Rellena un rectángulo con el color de relleno.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Texto con el color de relleno; `(x, y)` es la línea base a la izquierda.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Traza el camino actual con el color de trazo.
    fn stroke(&mut self);

    /// Círculo relleno con el color de relleno.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
}

pub mod recording {
    //! Superficie que sólo anota las llamadas, para pruebas sin terminal.

    use super::Surface;
    use colored::Color;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        FillRect { x: f64, y: f64, w: f64, h: f64, color: Color },
        Text { text: String, x: f64, y: f64, color: Color },
        Line { from: (f64, f64), to: (f64, f64), color: Color },
        Circle { x: f64, y: f64, radius: f64, color: Color },
    }

    pub struct RecordingSurface {
        width: u32,
        height: u32,
        fill: Color,
        stroke: Color,
        cursor: Option<(f64, f64)>,
        path: Vec<((f64, f64), (f64, f64))>,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                fill: Color::White,
                stroke: Color::White,
                cursor: None,
                path: Vec::new(),
                calls: Vec::new(),
            }
        }

        pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
            self.calls.iter().filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
        }

        pub fn circles(&self) -> impl Iterator<Item = &DrawCall> + '_ {
            self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. }))
        }

        pub fn lines(&self) -> impl Iterator<Item = &DrawCall> + '_ {
            self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. }))
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn set_fill_color(&mut self, color: Color) {
            self.fill = color;
        }

        fn set_stroke_color(&mut self, color: Color) {
            self.stroke = color;
        }

        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.calls.push(DrawCall::FillRect { x, y, w, h, color: self.fill });
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64) {
            self.calls.push(DrawCall::Text { text: text.to_string(), x, y, color: self.fill });
        }

        fn begin_path(&mut self) {
            self.path.clear();
            self.cursor = None;
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.cursor = Some((x, y));
        }

        fn line_to(&mut self, x: f64, y: f64) {
            if let Some(from) = self.cursor {
                self.path.push((from, (x, y)));
            }
            self.cursor = Some((x, y));
        }

        fn stroke(&mut self) {
            for &(from, to) in &self.path {
                self.calls.push(DrawCall::Line { from, to, color: self.stroke });
            }
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
            self.calls.push(DrawCall::Circle { x, y, radius, color: self.fill });
        }
    }
}
