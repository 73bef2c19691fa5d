//! Framework error type.
//!
//! Per the subsystem's error contract, nothing in the per-tick path returns
//! `Result` — failures there degrade behavior locally (a bot abandons its
//! target, a probe is skipped).  Errors exist only at construction and
//! validation seams.

use thiserror::Error;

use crate::BotId;

/// The top-level error type for `hx-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HxError {
    #[error("bot {0} not found")]
    BotNotFound(BotId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `hx-*` crates.
pub type HxResult<T> = Result<T, HxError>;
