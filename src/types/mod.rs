// WiFi QR shared type definitions
// Each submodule defines types used across services, stores and the RPC layer.

pub mod credential;
pub mod errors;
pub mod user;
