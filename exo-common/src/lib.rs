//! # ExO Common Library
//!
//! Shared code for the ExO services:
//! - Bootstrap configuration loading (TOML + defaults)
//! - Common error type
//! - Timestamp helpers used by the selection log

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
