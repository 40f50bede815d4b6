//! Core traits for Omniboard.
//!
//! There is one load-bearing seam in this backend: the hosted inference
//! provider. Everything that talks to a model goes through
//! [`InferenceBackend`] so the chains and widgets can be exercised against
//! scripted mocks.

pub mod inference;

pub use inference::*;
