//! Motor de referencia: el Sol y los planetas.
//!
//! Los planetas salen de VSOP87A (coordenadas rectangulares heliocéntricas en
//! UA, eclíptica J2000). Un cuerpo kepleriano opcional sirve para comparar la
//! propagación de dos cuerpos contra la teoría analítica.

use crate::engine::{PositionSnapshot, SimulationEngine, CENTRAL_BODY};
use crate::error::{OrbitsError, OrbitsResult};
use crate::kepler::{KeplerElements, KeplerOrbit, Vec3, MU_SUN};
use crate::time::JulianDate;

/// 2022-03-04T00:00Z.
pub const START_EPOCH: JulianDate = JulianDate(2459642.5);

const METERS_PER_AU: f64 = 1.495978707e11;

/// Cualquier objeto modelado: estrella, planeta, cuerpo de prueba.
pub trait SolarObject {
    fn name(&self) -> &str;

    /// Posición heliocéntrica en UA.
    fn position(&self, epoch: JulianDate) -> Vec3;

    /// Masa en kg.
    fn mass(&self) -> f64;
}

pub struct Sol;

impl SolarObject for Sol {
    fn name(&self) -> &str {
        CENTRAL_BODY
    }

    fn position(&self, _epoch: JulianDate) -> Vec3 {
        Vec3::ZERO
    }

    fn mass(&self) -> f64 {
        1.98847e30
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury, Planet::Venus, Planet::Earth, Planet::Mars,
        Planet::Jupiter, Planet::Saturn, Planet::Uranus, Planet::Neptune,
    ];
}

impl SolarObject for Planet {
    fn name(&self) -> &str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    fn position(&self, epoch: JulianDate) -> Vec3 {
        use vsop87::vsop87a;
        let c = match self {
            Planet::Mercury => vsop87a::mercury(epoch.0),
            Planet::Venus => vsop87a::venus(epoch.0),
            Planet::Earth => vsop87a::earth(epoch.0),
            Planet::Mars => vsop87a::mars(epoch.0),
            Planet::Jupiter => vsop87a::jupiter(epoch.0),
            Planet::Saturn => vsop87a::saturn(epoch.0),
            Planet::Uranus => vsop87a::uranus(epoch.0),
            Planet::Neptune => vsop87a::neptune(epoch.0),
        };
        Vec3::new(c.x, c.y, c.z)
    }

    fn mass(&self) -> f64 {
        match self {
            Planet::Mercury => 3.285e23,
            Planet::Venus => 4.867e24,
            Planet::Earth => 5.972e24,
            Planet::Mars => 6.39e23,
            Planet::Jupiter => 1.89813e27,
            Planet::Saturn => 5.683e26,
            Planet::Uranus => 8.681e25,
            Planet::Neptune => 1.024e26,
        }
    }
}

/// Cuerpo propagado con una órbita kepleriana alrededor del Sol.
pub struct KeplerBody {
    name: String,
    orbit: KeplerOrbit,
    mass: f64,
}

impl KeplerBody {
    pub fn new(name: impl Into<String>, elements: KeplerElements, mass: f64, epoch: JulianDate) -> Self {
        Self {
            name: name.into(),
            orbit: KeplerOrbit::new(elements, MU_SUN, epoch),
            mass,
        }
    }

    /// Elementos osculantes de Marte en `START_EPOCH`.
    pub fn mars() -> Self {
        let elements = KeplerElements::from_degrees(
            9.340419574613645E-02,
            2.279286491077153E+11 / METERS_PER_AU,
            2.867429735262922E+02,
            4.949033037641041E+01,
            1.847932354966402E+00,
            3.025677836626235E+02,
        );
        Self::new("Mars (Kepler)", elements, Planet::Mars.mass(), START_EPOCH)
    }
}

impl SolarObject for KeplerBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self, epoch: JulianDate) -> Vec3 {
        self.orbit.position(epoch)
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

pub struct SolarSystem {
    epoch: JulianDate,
    bodies: Vec<Box<dyn SolarObject>>,
}

impl SolarSystem {
    /// Sistema vacío salvo por el Sol.
    pub fn new(epoch: JulianDate) -> Self {
        Self { epoch, bodies: vec![Box::new(Sol)] }
    }

    pub fn with_body(mut self, body: impl SolarObject + 'static) -> Self {
        self.bodies.push(Box::new(body));
        self
    }

    /// El Sol y los ocho planetas.
    pub fn planets(epoch: JulianDate) -> Self {
        Planet::ALL.iter().fold(Self::new(epoch), |sys, &p| sys.with_body(p))
    }

    /// Sol, Marte según VSOP87 y Marte kepleriano, lado a lado.
    pub fn mars_comparison() -> Self {
        Self::new(START_EPOCH)
            .with_body(Planet::Mars)
            .with_body(KeplerBody::mars())
    }

    pub fn epoch(&self) -> JulianDate {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SimulationEngine for SolarSystem {
    fn create() -> OrbitsResult<Self> {
        let sys = Self::planets(START_EPOCH);
        log::info!("solar system created with {} bodies at JD {}", sys.len(), sys.epoch.0);
        Ok(sys)
    }

    fn advance(&mut self, step_days: f64) -> OrbitsResult<()> {
        if !(step_days.is_finite() && step_days > 0.0) {
            return Err(OrbitsError::InvalidStep(step_days));
        }
        self.epoch = self.epoch.plus_days(step_days);
        Ok(())
    }

    fn snapshot(&self) -> OrbitsResult<PositionSnapshot> {
        let (coords, names): (Vec<_>, Vec<_>) = self
            .bodies
            .iter()
            .map(|b| (b.position(self.epoch).xy(), b.name().to_string()))
            .unzip();
        Ok(PositionSnapshot::new(self.epoch, coords, names))
    }
}
