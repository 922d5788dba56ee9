// WiFi QR services
// Services provide the core functionality: cipher, QR encoding, credential access, auth and admin views.

pub mod admin_service;
pub mod auth_service;
pub mod credential_service;
pub mod crypto_service;
pub mod qr_encoder;
