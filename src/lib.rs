//! Pagesmith Library
//!
//! Core of a no-code page builder backend: keyword search over the template
//! marketplace, per-user layout storage, and generation of React page source
//! from a layout's box/component tree.

// Module declarations
pub mod cli;
pub mod codegen;
pub mod config;
pub mod constants;
pub mod matcher;
pub mod models;
pub mod services;

#[cfg(feature = "web")]
pub mod web;
