//! Anfitrión de terminal: lienzo Braille, pantalla alternativa y ritmo de cuadros.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};
use terminal_size::{terminal_size, Height, Width};

use crate::canvas::BrailleCanvas;
use crate::error::OrbitsResult;
use crate::scheduler::{CancelToken, FrameFn, FrameScheduler};

/// Filas reservadas bajo el lienzo para el monitor de FPS.
pub const READOUT_ROWS: usize = 5;

/// Título + dos bordes.
const CHROME_ROWS: usize = 3;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

pub struct TerminalScheduler {
    canvas: BrailleCanvas,
    readout: String,
    frame_budget: Duration,
    title: String,
    out: Stdout,
}

impl TerminalScheduler {
    /// El lienzo ocupa la terminal actual; su tamaño no cambia después.
    pub fn new(frame_budget: Duration, title: impl Into<String>) -> Self {
        let (cols, rows) = match terminal_size() {
            Some((Width(w), Height(h))) => (w, h),
            None => FALLBACK_SIZE,
        };
        let (width, height) = canvas_cells(cols, rows);
        log::info!("terminal {cols}x{rows}, canvas {width}x{height} cells");

        Self {
            canvas: BrailleCanvas::new(width, height),
            readout: String::new(),
            frame_budget,
            title: title.into(),
            out: io::stdout(),
        }
    }

    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, terminal::EnterAlternateScreen, cursor::Hide, terminal::Clear(ClearType::All))
    }

    fn leave(&mut self) -> io::Result<()> {
        let shown = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        terminal::disable_raw_mode()?;
        shown
    }

    fn present(&mut self) -> OrbitsResult<()> {
        write_frame(&mut self.out, &self.canvas, &self.title, &self.readout)?;
        self.out.flush()?;
        Ok(())
    }

    /// `q`, `Esc` o `Ctrl-C` cierran. En modo raw Ctrl-C no genera señal.
    fn quit_requested() -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? {
                if kind == KeyEventKind::Release {
                    continue;
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn drive(&mut self, token: &CancelToken, frame: &mut FrameFn<'_, BrailleCanvas>) -> OrbitsResult<()> {
        while !token.is_cancelled() {
            let tick = Instant::now();

            self.readout.clear();
            frame(&mut self.canvas, &mut self.readout)?;
            self.present()?;

            if Self::quit_requested()? {
                token.cancel();
                break;
            }

            // Un cuadro lento sólo retrasa el siguiente.
            if let Some(rest) = self.frame_budget.checked_sub(tick.elapsed()) {
                thread::sleep(rest);
            }
        }
        Ok(())
    }
}

/// Celdas del lienzo para una terminal de `cols` x `rows`.
fn canvas_cells(cols: u16, rows: u16) -> (usize, usize) {
    let width = (cols as usize).saturating_sub(2).max(1);
    let height = (rows as usize).saturating_sub(CHROME_ROWS + READOUT_ROWS).max(1);
    (width, height)
}

/// Título, lienzo con borde y monitor, desde la esquina superior izquierda.
fn write_frame<W: Write>(out: &mut W, canvas: &BrailleCanvas, title: &str, readout: &str) -> OrbitsResult<()> {
    let mut frame = String::with_capacity(canvas.width * canvas.height * 4);
    canvas.render_to(&mut frame, true, Some(title))?;

    queue!(out, cursor::MoveTo(0, 0), Print(frame.replace('\n', "\r\n")), Print("\r\n"))?;
    // sin salto tras la última fila: desplazaría la pantalla alternativa
    for (i, line) in readout.lines().take(READOUT_ROWS).enumerate() {
        if i > 0 {
            queue!(out, Print("\r\n"))?;
        }
        queue!(out, terminal::Clear(ClearType::CurrentLine), Print(line))?;
    }
    Ok(())
}

impl FrameScheduler for TerminalScheduler {
    type Surface = BrailleCanvas;

    fn surface_size(&self) -> (u32, u32) {
        (self.canvas.pixel_width() as u32, self.canvas.pixel_height() as u32)
    }

    fn run(&mut self, token: &CancelToken, frame: &mut FrameFn<'_, BrailleCanvas>) -> OrbitsResult<()> {
        self.enter()?;
        let result = self.drive(token, frame);
        // la terminal se restaura aunque el cuadro haya fallado
        let restored = self.leave();
        result?;
        restored?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fps::FrameRateMonitor;

    #[test]
    fn canvas_leaves_room_for_chrome_and_readout() {
        assert_eq!(canvas_cells(80, 24), (78, 24 - CHROME_ROWS - READOUT_ROWS));
        assert_eq!(canvas_cells(1, 2), (1, 1));
    }

    #[test]
    fn full_frame_fits_without_scrolling() {
        let (cols, rows) = (80u16, 24u16);
        let (w, h) = canvas_cells(cols, rows);
        let canvas = BrailleCanvas::new(w, h);

        let mut monitor = FrameRateMonitor::new();
        monitor.record_elapsed(Duration::from_millis(16));
        let mut readout = String::new();
        monitor.render(&mut readout).unwrap();
        assert_eq!(readout.lines().count(), READOUT_ROWS);

        let mut out = Vec::new();
        write_frame(&mut out, &canvas, "Sistema Solar", &readout).unwrap();
        let text = String::from_utf8(out).unwrap();

        // cada salto baja una fila; el último cuadro termina en la fila final
        let breaks = text.matches('\n').count();
        assert_eq!(breaks, rows as usize - 1);
        assert!(text.ends_with(readout.lines().last().unwrap()));
    }
}
