//! Core traits for zonebridge
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Backend`]: List and mutate flat DNS entries
//! - [`BackendFactory`]: Build a backend from configuration

pub mod backend;

pub use backend::{Backend, BackendFactory};
