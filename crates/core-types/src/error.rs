// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown interval '{0}', expected one of 1m, 5m, 15m, 1h, 1d")]
    UnknownInterval(String),
}

pub type Result<T> = std::result::Result<T, Error>;
