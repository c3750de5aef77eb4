//! Poseidon Gateway HTTP API Server
//!
//! Health, OCR and analysis routes over `axum`.

pub mod extract_api;
pub mod health_api;
pub mod server;

pub use server::{build_router, start_server, AppState};
