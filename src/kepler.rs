//! Órbitas keplerianas de dos cuerpos, en UA y días.

use std::f64::consts::TAU;

use crate::time::JulianDate;

/// Constante gravitacional de Gauss (UA^(3/2) / día).
pub const GAUSS_K: f64 = 0.01720209895;

/// Parámetro gravitacional del Sol, k², en UA³/día².
pub const MU_SUN: f64 = GAUSS_K * GAUSS_K;

pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Proyección sobre el plano de la eclíptica.
    pub fn xy(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Elementos orbitales clásicos. Ángulos en radianes, semieje en UA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerElements {
    pub eccentricity: f64,
    pub semimajor_axis: f64,
    /// Argumento del perihelio.
    pub periapsis: f64,
    pub ascending_node: f64,
    pub inclination: f64,
    pub mean_anomaly: f64,
}

impl KeplerElements {
    /// Igual que los campos, pero con ángulos en grados.
    pub fn from_degrees(e: f64, a: f64, w: f64, node: f64, i: f64, m: f64) -> Self {
        Self {
            eccentricity: e,
            semimajor_axis: a,
            periapsis: w * DEG_TO_RAD,
            ascending_node: node * DEG_TO_RAD,
            inclination: i * DEG_TO_RAD,
            mean_anomaly: m * DEG_TO_RAD,
        }
    }

    /// Movimiento medio en rad/día.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semimajor_axis.powi(3)).sqrt()
    }

    /// Periodo en días.
    pub fn period(&self, mu: f64) -> f64 {
        TAU / self.mean_motion(mu)
    }
}

/// Resuelve E - e·sin(E) = M por Newton-Raphson.
pub fn eccentric_anomaly(e: f64, mean_anomaly: f64) -> f64 {
    let mut ea = if e < 0.8 { mean_anomaly } else { std::f64::consts::PI };
    for _ in 0..50 {
        let delta = (ea - e * ea.sin() - mean_anomaly) / (1.0 - e * ea.cos());
        ea -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Posición y velocidad heliocéntricas (UA, UA/día) para órbitas elípticas.
pub fn state_vectors(elements: &KeplerElements, mu: f64) -> (Vec3, Vec3) {
    let e = elements.eccentricity;
    let a = elements.semimajor_axis;
    let ea = eccentric_anomaly(e, elements.mean_anomaly);

    let nu = 2.0 * ((1.0 + e).sqrt() * (ea / 2.0).sin()).atan2((1.0 - e).sqrt() * (ea / 2.0).cos());
    let r = a * (1.0 - e * ea.cos());

    // plano orbital
    let (px, py) = (r * nu.cos(), r * nu.sin());
    let speed = (mu * a).sqrt() / r;
    let (vx, vy) = (-speed * ea.sin(), speed * (1.0 - e * e).sqrt() * ea.cos());

    let rotate = orbital_to_ecliptic(elements);
    (rotate(px, py), rotate(vx, vy))
}

/// Rotación Rz(Ω)·Rx(i)·Rz(ω) del plano orbital a la eclíptica.
fn orbital_to_ecliptic(elements: &KeplerElements) -> impl Fn(f64, f64) -> Vec3 {
    let (sw, cw) = elements.periapsis.sin_cos();
    let (so, co) = elements.ascending_node.sin_cos();
    let (si, ci) = elements.inclination.sin_cos();

    move |x, y| {
        Vec3::new(
            x * (cw * co - sw * ci * so) - y * (sw * co + cw * ci * so),
            x * (cw * so + sw * ci * co) + y * (cw * ci * co - sw * so),
            x * (sw * si) + y * (cw * si),
        )
    }
}

/// Cuerpo que sigue una órbita kepleriana fija alrededor de un cuerpo central.
#[derive(Clone, Debug)]
pub struct KeplerOrbit {
    elements: KeplerElements,
    mu: f64,
    epoch: JulianDate,
}

impl KeplerOrbit {
    /// `elements` son osculantes en `epoch`.
    pub fn new(elements: KeplerElements, mu: f64, epoch: JulianDate) -> Self {
        Self { elements, mu, epoch }
    }

    /// Elementos propagados: sólo cambia la anomalía media.
    pub fn elements_at(&self, at: JulianDate) -> KeplerElements {
        let dt = at.0 - self.epoch.0;
        let m = self.elements.mean_anomaly + self.elements.mean_motion(self.mu) * dt;
        KeplerElements { mean_anomaly: m.rem_euclid(TAU), ..self.elements }
    }

    pub fn position(&self, at: JulianDate) -> Vec3 {
        state_vectors(&self.elements_at(at), self.mu).0
    }
}
