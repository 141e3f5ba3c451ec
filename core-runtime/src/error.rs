//! Runtime infrastructure errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid runtime configuration, e.g. a malformed log filter.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure of the runtime layer.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
