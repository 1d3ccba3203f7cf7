use crate::surface::Surface;
use colored::Color;
use std::fmt::{self, Write};

const PIXEL_LIMIT: f64 = 1.0e6;

/// Lienzo de píxeles Braille: cada celda de texto guarda 2x4 puntos.
///
/// Las coordenadas de dibujo son de pantalla (Y hacia abajo), en píxeles.
pub struct BrailleCanvas {
    pub width: usize,
    pub height: usize,
    buffer: Vec<u8>,
    colors: Vec<Option<Color>>,
    text_layer: Vec<Option<char>>,
    fill: Color,
    stroke: Color,
    cursor: Option<(f64, f64)>,
    path: Vec<((f64, f64), (f64, f64))>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            buffer: vec![0u8; size],
            colors: vec![None; size],
            text_layer: vec![None; size],
            fill: Color::White,
            stroke: Color::White,
            cursor: None,
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    #[inline]
    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    // --- Helpers de Coordenadas ---

    #[inline]
    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    fn get_mask(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01, (1, 0) => 0x08,
            (0, 1) => 0x02, (1, 1) => 0x10,
            (0, 2) => 0x04, (1, 2) => 0x20,
            (0, 3) => 0x40, (1, 3) => 0x80,
            _ => 0,
        }
    }

    /// Redondea a píxel; `None` si la coordenada no es finita. Se acota para que
    /// el recorte de líneas no desborde.
    #[inline]
    fn to_px(v: f64) -> Option<isize> {
        v.is_finite().then(|| v.clamp(-PIXEL_LIMIT, PIXEL_LIMIT).round() as isize)
    }

    pub fn is_set(&self, px: usize, py: usize) -> bool {
        if px >= self.pixel_width() || py >= self.pixel_height() {
            return false;
        }
        self.buffer[self.idx(px / 2, py / 4)] & Self::get_mask(px % 2, py % 4) != 0
    }

    pub fn color_at(&self, col: usize, row: usize) -> Option<Color> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.colors[self.idx(col, row)]
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.text_layer[self.idx(col, row)]
    }

    pub fn set_pixel(&mut self, px: isize, py: isize, color: Option<Color>) {
        if px < 0 || py < 0 || px as usize >= self.pixel_width() || py as usize >= self.pixel_height() {
            return;
        }
        let (px, py) = (px as usize, py as usize);
        let index = self.idx(px / 2, py / 4);
        self.buffer[index] |= Self::get_mask(px % 2, py % 4);
        if let Some(c) = color {
            self.colors[index] = Some(c);
        }
    }

    pub fn unset_pixel(&mut self, px: isize, py: isize) {
        if px < 0 || py < 0 || px as usize >= self.pixel_width() || py as usize >= self.pixel_height() {
            return;
        }
        let (px, py) = (px as usize, py as usize);
        let index = self.idx(px / 2, py / 4);
        self.buffer[index] &= !Self::get_mask(px % 2, py % 4);
        if self.buffer[index] == 0 {
            self.colors[index] = None;
        }
    }

    // --- Primitivas con Clipping (Cohen-Sutherland) ---

    fn compute_outcode(&self, x: isize, y: isize) -> u8 {
        let mut code = 0;
        let w = self.pixel_width() as isize;
        let h = self.pixel_height() as isize;

        if x < 0 { code |= 1; } else if x >= w { code |= 2; }
        if y < 0 { code |= 4; } else if y >= h { code |= 8; }
        code
    }

    pub fn line(&mut self, mut x0: isize, mut y0: isize, mut x1: isize, mut y1: isize, color: Option<Color>) {
        let w = self.pixel_width() as isize;
        let h = self.pixel_height() as isize;
        if w == 0 || h == 0 { return; }

        let mut outcode0 = self.compute_outcode(x0, y0);
        let mut outcode1 = self.compute_outcode(x1, y1);

        loop {
            if (outcode0 | outcode1) == 0 {
                break;
            } else if (outcode0 & outcode1) != 0 {
                return;
            }

            let outcode_out = if outcode0 != 0 { outcode0 } else { outcode1 };
            let (x, y);

            if outcode_out & 8 != 0 {
                x = x0 + (x1 - x0) * (h - 1 - y0) / (y1 - y0);
                y = h - 1;
            } else if outcode_out & 4 != 0 {
                x = x0 + (x1 - x0) * (0 - y0) / (y1 - y0);
                y = 0;
            } else if outcode_out & 2 != 0 {
                y = y0 + (y1 - y0) * (w - 1 - x0) / (x1 - x0);
                x = w - 1;
            } else {
                y = y0 + (y1 - y0) * (0 - x0) / (x1 - x0);
                x = 0;
            }

            if outcode_out == outcode0 {
                x0 = x; y0 = y;
                outcode0 = self.compute_outcode(x0, y0);
            } else {
                x1 = x; y1 = y;
                outcode1 = self.compute_outcode(x1, y1);
            }
        }

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    // --- Primitivas 2D ---

    /// Rectángulo relleno. Con tinta negra borra: el fondo de la terminal es negro.
    pub fn rect_filled(&mut self, x: isize, y: isize, w: usize, h: usize, color: Color) {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + w as isize).min(self.pixel_width() as isize);
        let y_end = (y + h as isize).min(self.pixel_height() as isize);

        for py in y_start..y_end {
            for px in x_start..x_end {
                if color == Color::Black {
                    self.unset_pixel(px, py);
                } else {
                    self.set_pixel(px, py, Some(color));
                }
            }
        }

        if color == Color::Black {
            self.erase_text(x_start, y_start, x_end, y_end);
        }
    }

    fn erase_text(&mut self, x0: isize, y0: isize, x1: isize, y1: isize) {
        if x1 <= x0 || y1 <= y0 { return; }
        let (c0, r0) = (x0 as usize / 2, y0 as usize / 4);
        let c1 = ((x1 as usize + 1) / 2).min(self.width);
        let r1 = ((y1 as usize + 3) / 4).min(self.height);
        for row in r0..r1 {
            for col in c0..c1 {
                let idx = self.idx(col, row);
                self.text_layer[idx] = None;
                if self.buffer[idx] == 0 {
                    self.colors[idx] = None;
                }
            }
        }
    }

    pub fn circle_filled(&mut self, xc: isize, yc: isize, r: isize, color: Option<Color>) {
        if r <= 0 {
            self.set_pixel(xc, yc, color);
            return;
        }
        let mut x = 0;
        let mut y = r;
        let mut d = 3 - 2 * r;

        let mut spans = |cx: isize, cy: isize, x: isize, y: isize| {
            self.line(cx - x, cy + y, cx + x, cy + y, color);
            self.line(cx - x, cy - y, cx + x, cy - y, color);
            self.line(cx - y, cy + x, cx + y, cy + x, color);
            self.line(cx - y, cy - x, cx + y, cy - x, color);
        };

        spans(xc, yc, x, y);
        while y >= x {
            x += 1;
            if d > 0 {
                y -= 1;
                d = d + 4 * (x - y) + 10;
            } else {
                d = d + 4 * x + 6;
            }
            spans(xc, yc, x, y);
        }
    }

    /// Escribe un carácter en la capa de texto (coordenadas de celda).
    pub fn set_char(&mut self, col: usize, row: usize, c: char, color: Option<Color>) {
        if col < self.width && row < self.height {
            let idx = self.idx(col, row);
            self.text_layer[idx] = Some(c);
            if let Some(col_val) = color {
                self.colors[idx] = Some(col_val);
            }
        }
    }

    /// Texto a partir del píxel `(x, y)`; la fila es la celda que contiene `y`.
    pub fn text(&mut self, text: &str, x: isize, y: isize, color: Option<Color>) {
        if y < 0 { return; }
        let row = y as usize / 4;
        for (i, ch) in text.chars().enumerate() {
            let col = x.div_euclid(2) + i as isize;
            if col < 0 { continue; }
            if col as usize >= self.width { break; }
            self.set_char(col as usize, row, ch, color);
        }
    }

    // --- Renderizado ---

    /// Evita alocar Strings de `colored` por cada celda.
    fn write_ansi_color<W: Write>(w: &mut W, color: Color) -> fmt::Result {
        match color {
            Color::Black => w.write_str("\x1b[30m"),
            Color::Red => w.write_str("\x1b[31m"),
            Color::Green => w.write_str("\x1b[32m"),
            Color::Yellow => w.write_str("\x1b[33m"),
            Color::Blue => w.write_str("\x1b[34m"),
            Color::Magenta => w.write_str("\x1b[35m"),
            Color::Cyan => w.write_str("\x1b[36m"),
            Color::White => w.write_str("\x1b[37m"),
            Color::BrightBlack => w.write_str("\x1b[90m"),
            Color::BrightRed => w.write_str("\x1b[91m"),
            Color::BrightGreen => w.write_str("\x1b[92m"),
            Color::BrightYellow => w.write_str("\x1b[93m"),
            Color::BrightBlue => w.write_str("\x1b[94m"),
            Color::BrightMagenta => w.write_str("\x1b[95m"),
            Color::BrightCyan => w.write_str("\x1b[96m"),
            Color::BrightWhite => w.write_str("\x1b[97m"),
            Color::TrueColor { r, g, b } => write!(w, "\x1b[38;2;{};{};{}m", r, g, b),
        }
    }

    pub fn render_to<W: Write>(&self, w: &mut W, show_border: bool, title: Option<&str>) -> fmt::Result {
        if let Some(t) = title {
            writeln!(w, "{:^width$}", t, width = self.width + 2)?;
        }

        if show_border {
            w.write_char('┌')?;
            for _ in 0..self.width { w.write_char('─')?; }
            w.write_char('┐')?;
            w.write_char('\n')?;
        }

        let mut last_color: Option<Color> = None;

        for row in 0..self.height {
            if show_border { w.write_char('│')?; }

            for col in 0..self.width {
                let idx = self.idx(col, row);

                let char_to_print = match self.text_layer[idx] {
                    Some(c) => c,
                    None => std::char::from_u32(0x2800 + self.buffer[idx] as u32).unwrap_or(' '),
                };

                let current_color = self.colors[idx];
                if current_color != last_color {
                    match current_color {
                        Some(c) => Self::write_ansi_color(w, c)?,
                        None => w.write_str("\x1b[0m")?,
                    }
                    last_color = current_color;
                }

                w.write_char(char_to_print)?;
            }

            if last_color.is_some() {
                w.write_str("\x1b[0m")?;
                last_color = None;
            }

            if show_border { w.write_char('│')?; }
            w.write_char('\n')?;
        }

        if show_border {
            w.write_char('└')?;
            for _ in 0..self.width { w.write_char('─')?; }
            w.write_char('┘')?;
        }

        Ok(())
    }

    /// Sólo caracteres, sin colores ni borde.
    pub fn render_plain(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height + self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = self.idx(col, row);
                let ch = match self.text_layer[idx] {
                    Some(c) => c,
                    None => std::char::from_u32(0x2800 + self.buffer[idx] as u32).unwrap_or(' '),
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl Surface for BrailleCanvas {
    fn size(&self) -> (u32, u32) {
        (self.pixel_width() as u32, self.pixel_height() as u32)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (Some(px), Some(py)) = (Self::to_px(x), Self::to_px(y)) else { return };
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 { return; }
        self.rect_filled(px, py, w.min(PIXEL_LIMIT).round() as usize, h.min(PIXEL_LIMIT).round() as usize, self.fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (Some(px), Some(py)) = (Self::to_px(x), Self::to_px(y)) else { return };
        self.text(text, px, py, Some(self.fill));
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
        let stroke = Some(self.stroke);
        let segments = std::mem::take(&mut self.path);
        for &((x0, y0), (x1, y1)) in &segments {
            if let (Some(x0), Some(y0), Some(x1), Some(y1)) =
                (Self::to_px(x0), Self::to_px(y0), Self::to_px(x1), Self::to_px(y1))
            {
                self.line(x0, y0, x1, y1, stroke);
            }
        }
        self.path = segments;
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        let (Some(cx), Some(cy), Some(r)) = (Self::to_px(x), Self::to_px(y), Self::to_px(radius)) else {
            return;
        };
        self.circle_filled(cx, cy, r, Some(self.fill));
    }
}
