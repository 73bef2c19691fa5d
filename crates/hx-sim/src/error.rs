use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("tunables: {0}")]
    Tunables(&'static str),
}

pub type SimResult<T> = Result<T, SimError>;
