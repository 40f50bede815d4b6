//! Core type definitions for Omniboard.
//!
//! Data structures exchanged between the command router, the model fallback
//! chains, the widget services, and the HTTP gateway. Broken down into
//! submodules by concern.

pub mod context;
pub mod intent;
pub mod model;
pub mod translation;
pub mod widgets;

pub use context::*;
pub use intent::*;
pub use model::*;
pub use translation::*;
pub use widgets::*;
