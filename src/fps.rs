//! Monitor de cuadros por segundo sobre una ventana deslizante.

use std::collections::VecDeque;
use std::fmt::{self, Write};
use std::time::{Duration, Instant};

/// Número de muestras que se conservan.
pub const FRAME_WINDOW: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub latest: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl FrameStats {
    /// Recalcula todo sobre la ventana completa.
    fn over<'a>(samples: impl IntoIterator<Item = &'a f64>, latest: f64) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &s in samples {
            count += 1;
            sum += s;
            min = min.min(s);
            max = max.max(s);
        }
        if count == 0 {
            return None;
        }
        Some(Self { latest, mean: sum / count as f64, min, max })
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames per Second:")?;
        writeln!(f, "         latest = {}", self.latest.round() as i64)?;
        writeln!(f, "avg of last {FRAME_WINDOW} = {}", self.mean.round() as i64)?;
        writeln!(f, "min of last {FRAME_WINDOW} = {}", self.min.round() as i64)?;
        write!(f, "max of last {FRAME_WINDOW} = {}", self.max.round() as i64)
    }
}

pub struct FrameRateMonitor {
    frames: VecDeque<f64>,
    capacity: usize,
    last_frame: Option<Instant>,
    last_stats: Option<FrameStats>,
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRateMonitor {
    pub fn new() -> Self {
        Self::with_capacity(FRAME_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
            last_frame: None,
            last_stats: None,
        }
    }

    /// Toma una muestra con el reloj monotónico. La primera llamada sólo fija
    /// la referencia y devuelve `None`.
    pub fn sample(&mut self) -> Option<FrameStats> {
        self.sample_at(Instant::now())
    }

    pub fn sample_at(&mut self, now: Instant) -> Option<FrameStats> {
        match self.last_frame.replace(now) {
            None => None,
            Some(prev) => self.record_elapsed(now.saturating_duration_since(prev)),
        }
    }

    /// Registra directamente el tiempo entre dos cuadros.
    pub fn record_elapsed(&mut self, elapsed: Duration) -> Option<FrameStats> {
        let millis = elapsed.as_nanos() as f64 / 1_000_000.0;
        if millis > 0.0 {
            let fps = 1000.0 / millis;
            self.frames.push_back(fps);
            while self.frames.len() > self.capacity {
                self.frames.pop_front();
            }
            self.last_stats = FrameStats::over(&self.frames, fps);
        }
        // intervalo nulo: no hay muestra, la ventana queda igual
        self.last_stats
    }

    pub fn stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Muestras retenidas, de la más antigua a la más reciente.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.frames.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Escribe el bloque de texto con las últimas estadísticas.
    pub fn render<W: Write>(&self, sink: &mut W) -> fmt::Result {
        match &self.last_stats {
            Some(stats) => write!(sink, "{stats}"),
            None => write!(sink, "Frames per Second:\n    warming up"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn first_sample_is_warm_up() {
        let mut monitor = FrameRateMonitor::new();
        let t0 = Instant::now();
        assert_eq!(monitor.sample_at(t0), None);
        assert!(monitor.is_empty());

        let stats = monitor.sample_at(t0 + Duration::from_millis(20)).unwrap();
        assert!((stats.latest - 50.0).abs() < 1e-9);
        assert_eq!(monitor.len(), 1);
    }

    #[test]
    fn window_keeps_last_hundred_in_order() {
        let mut rng = rand::thread_rng();
        let mut monitor = FrameRateMonitor::new();
        let mut fed = Vec::new();

        for _ in 0..150 {
            let micros = rng.gen_range(5_000..50_000u64);
            monitor.record_elapsed(Duration::from_micros(micros));
            fed.push(1000.0 / (micros as f64 / 1000.0));
        }

        let kept: Vec<f64> = monitor.samples().collect();
        assert_eq!(kept.len(), FRAME_WINDOW);
        assert_eq!(kept, fed[50..].to_vec());

        let stats = monitor.stats().unwrap();
        let expected_mean = fed[50..].iter().sum::<f64>() / 100.0;
        assert!((stats.mean - expected_mean).abs() < 1e-9);
        assert_eq!(stats.latest, fed[149]);
        assert_eq!(stats.min, fed[50..].iter().cloned().fold(f64::INFINITY, f64::min));
        assert_eq!(stats.max, fed[50..].iter().cloned().fold(f64::NEG_INFINITY, f64::max));
    }

    #[test]
    fn zero_interval_adds_nothing() {
        let mut monitor = FrameRateMonitor::new();
        monitor.record_elapsed(Duration::from_millis(10));
        let before = monitor.stats();
        let after = monitor.record_elapsed(Duration::ZERO);
        assert_eq!(before, after);
        assert_eq!(monitor.len(), 1);
    }

    #[test]
    fn render_formats_rounded_block() {
        let mut monitor = FrameRateMonitor::new();
        monitor.record_elapsed(Duration::from_millis(16));
        monitor.record_elapsed(Duration::from_millis(20));

        let mut out = String::new();
        monitor.render(&mut out).unwrap();
        assert_eq!(
            out,
            "Frames per Second:\n         latest = 50\navg of last 100 = 56\nmin of last 100 = 50\nmax of last 100 = 63"
        );
    }

    #[test]
    fn render_before_first_sample() {
        let monitor = FrameRateMonitor::new();
        let mut out = String::new();
        monitor.render(&mut out).unwrap();
        assert!(out.starts_with("Frames per Second:"));
        assert!(out.contains("warming up"));
    }
}
