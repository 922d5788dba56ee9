// WiFi QR stores
// Stores handle persistence only: credentials and users, each over a borrowed SQLite connection.

pub mod credential_store;
pub mod user_store;
