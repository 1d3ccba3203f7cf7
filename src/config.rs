//! Configuración del bucle: paso de simulación, escala y ritmo de cuadros.

use std::time::Duration;

use crate::error::{OrbitsError, OrbitsResult};

pub const ENV_PRESET: &str = "ORBITS_PRESET";
pub const ENV_STEP_DAYS: &str = "ORBITS_STEP_DAYS";
pub const ENV_ZOOM: &str = "ORBITS_ZOOM";
pub const ENV_ENGINE_HINTS: &str = "ORBITS_ENGINE_HINTS";
pub const ENV_FRAME_MS: &str = "ORBITS_FRAME_MS";
/// Ruta del archivo de registro; sin ella no se registra nada.
pub const ENV_LOG: &str = "ORBITS_LOG";
/// `planets` (por defecto) o `mars`.
pub const ENV_SYSTEM: &str = "ORBITS_SYSTEM";

/// ~60 Hz
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopConfig {
    /// Días simulados por cuadro.
    pub step_days: f64,
    /// Píxeles por UA.
    pub zoom_factor: f64,
    /// Tomar ancho/alto del motor cuando los sugiera.
    pub use_engine_viewport_hints: bool,
    pub frame_budget: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::inner()
    }
}

impl LoopConfig {
    /// Planetas interiores: 10 días por cuadro, 30 px/UA.
    pub fn inner() -> Self {
        Self {
            step_days: 10.0,
            zoom_factor: 30.0,
            use_engine_viewport_hints: false,
            frame_budget: DEFAULT_FRAME_BUDGET,
        }
    }

    /// Sistema completo: 100 días por cuadro, 10 px/UA.
    pub fn outer() -> Self {
        Self {
            step_days: 100.0,
            zoom_factor: 10.0,
            use_engine_viewport_hints: true,
            frame_budget: DEFAULT_FRAME_BUDGET,
        }
    }

    pub fn preset(name: &str) -> OrbitsResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(Self::inner()),
            "outer" => Ok(Self::outer()),
            other => Err(OrbitsError::InvalidConfig(format!("unknown preset {other:?}"))),
        }
    }

    pub fn validate(&self) -> OrbitsResult<()> {
        if !(self.step_days.is_finite() && self.step_days > 0.0) {
            return Err(OrbitsError::InvalidConfig(format!(
                "step_days must be positive, got {}",
                self.step_days
            )));
        }
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 0.0) {
            return Err(OrbitsError::InvalidConfig(format!(
                "zoom_factor must be positive, got {}",
                self.zoom_factor
            )));
        }
        if self.frame_budget.is_zero() {
            return Err(OrbitsError::InvalidConfig("frame budget must be non-zero".into()));
        }
        Ok(())
    }

    pub fn from_env() -> OrbitsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lee la configuración con `lookup`; las claves ausentes dejan el valor
    /// del preset.
    pub fn from_lookup<F>(lookup: F) -> OrbitsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_PRESET) {
            Some(name) => Self::preset(&name)?,
            None => Self::default(),
        };

        if let Some(v) = lookup(ENV_STEP_DAYS) {
            config.step_days = parse_f64(ENV_STEP_DAYS, &v)?;
        }
        if let Some(v) = lookup(ENV_ZOOM) {
            config.zoom_factor = parse_f64(ENV_ZOOM, &v)?;
        }
        if let Some(v) = lookup(ENV_ENGINE_HINTS) {
            config.use_engine_viewport_hints = parse_bool(ENV_ENGINE_HINTS, &v)?;
        }
        if let Some(v) = lookup(ENV_FRAME_MS) {
            let ms = v
                .trim()
                .parse::<u64>()
                .map_err(|e| OrbitsError::InvalidConfig(format!("{ENV_FRAME_MS}={v:?}: {e}")))?;
            config.frame_budget = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_f64(key: &str, raw: &str) -> OrbitsResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| OrbitsError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}

fn parse_bool(key: &str, raw: &str) -> OrbitsResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OrbitsError::InvalidConfig(format!("{key}={raw:?}: expected a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn presets_match_observed_variants() {
        let inner = LoopConfig::inner();
        assert_eq!((inner.step_days, inner.zoom_factor, inner.use_engine_viewport_hints), (10.0, 30.0, false));
        let outer = LoopConfig::outer();
        assert_eq!((outer.step_days, outer.zoom_factor, outer.use_engine_viewport_hints), (100.0, 10.0, true));
        assert_eq!(LoopConfig::default(), inner);
    }

    #[test]
    fn empty_environment_gives_default() {
        assert_eq!(LoopConfig::from_lookup(lookup(&[])).unwrap(), LoopConfig::default());
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config = LoopConfig::from_lookup(lookup(&[
            (ENV_PRESET, "Outer"),
            (ENV_ZOOM, "12.5"),
            (ENV_ENGINE_HINTS, "off"),
            (ENV_FRAME_MS, "33"),
        ]))
        .unwrap();
        assert_eq!(config.step_days, 100.0);
        assert_eq!(config.zoom_factor, 12.5);
        assert!(!config.use_engine_viewport_hints);
        assert_eq!(config.frame_budget, Duration::from_millis(33));
    }

    #[test]
    fn bad_values_are_config_errors() {
        for pairs in [
            vec![(ENV_PRESET, "kuiper")],
            vec![(ENV_STEP_DAYS, "ten")],
            vec![(ENV_STEP_DAYS, "-5")],
            vec![(ENV_ZOOM, "0")],
            vec![(ENV_ENGINE_HINTS, "maybe")],
            vec![(ENV_FRAME_MS, "0")],
        ] {
            let result = LoopConfig::from_lookup(lookup(&pairs));
            assert!(matches!(result, Err(OrbitsError::InvalidConfig(_))), "{pairs:?}");
        }
    }
}
