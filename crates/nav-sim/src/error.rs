//! Simulation-subsystem error type.

use thiserror::Error;

use nav_route::RouteError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Route planning or validation failed before simulation state existed.
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("trip has no active leg")]
    NoActiveLeg,
}

pub type SimResult<T> = Result<T, SimError>;
