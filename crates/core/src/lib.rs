#![deny(unused)]
//! Core types, traits, and error definitions for Omniboard.
//!
//! This crate provides the foundational building blocks shared across all layers
//! of the dashboard backend: configuration, the error taxonomy, the inference
//! backend seam, and the data types exchanged between the command router, the
//! model fallback chains, the widget services, and the HTTP gateway.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
