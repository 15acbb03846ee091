use thiserror::Error;

use fleet_registry::RegistryError;
use fleet_sched::SchedError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("scheduler error: {0}")]
    Sched(#[from] SchedError),

    #[error("trip roster parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
