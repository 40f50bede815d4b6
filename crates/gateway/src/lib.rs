#![deny(unused)]
//! HTTP gateway for the dashboard backend.
//!
//! This crate provides the HTTP entry point: the command router, the
//! conversational engine, and the axum server that exposes chat, translation,
//! and the widget services.

pub mod chat;
pub mod router;
pub mod server;

pub use chat::{ChatEngine, BUILT_IN_MODEL};
pub use router::CommandRouter;
pub use server::{AppState, GatewayConfig, GatewayServer};
