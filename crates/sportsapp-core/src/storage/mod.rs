//! Storage layer
//!
//! TOML configuration and the local favorites table.

use crate::error::StorageError;

pub mod config;
pub mod favorites;

type Result<T> = std::result::Result<T, StorageError>;
