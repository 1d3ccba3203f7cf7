//! Errores del crate.

use thiserror::Error;

/// Resultado de cualquier operación del renderizador o del bucle.
pub type OrbitsResult<T> = Result<T, OrbitsError>;

#[derive(Error, Debug)]
pub enum OrbitsError {
    /// El motor entregó coordenadas y nombres de distinta longitud.
    #[error("malformed snapshot: {coords} coordinates for {names} names")]
    MalformedSnapshot { coords: usize, names: usize },

    #[error("simulation step must be a positive number of days, got {0}")]
    InvalidStep(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("simulation engine failure: {0}")]
    Engine(String),

    /// El bucle ya se detuvo por un fallo anterior.
    #[error("simulation loop halted after a previous failure")]
    Halted,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text formatting error")]
    Fmt(#[from] std::fmt::Error),
}
