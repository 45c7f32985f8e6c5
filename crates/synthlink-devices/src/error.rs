//! Error types for profile registration and lookup.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] synthlink_core::Error),

    #[error("Profile '{0}' is already registered")]
    DuplicateProfile(String),

    #[error("No profile named '{0}'")]
    UnknownProfile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
