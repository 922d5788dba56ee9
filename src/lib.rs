//! WiFi QR: a multi-tenant store for WiFi credentials with scannable QR codes.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod config;
pub mod database;
pub mod managers;
pub mod services;
pub mod rpc_handler;
pub mod types;
