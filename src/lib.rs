//! PowerBox firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod pins;

pub mod adapters;
pub mod drivers;
