//! Foundation types for mbterm.
//!
//! Shared by every mbterm crate: the error enum and `Result` alias, the
//! session configuration, and the platform-agnostic input events a front end
//! feeds into a session.

pub mod config;
pub mod error;
pub mod input;
