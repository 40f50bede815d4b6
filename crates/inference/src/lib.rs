#![deny(unused)]
//! Model access layer for Omniboard.
//!
//! This crate provides:
//! - The HTTP client for the hosted inference API
//! - The generation fallback chain behind the chat assistant
//! - The translation fallback chain and its language tables
//!
//! Both chains are total: they walk an ordered list of model candidates and,
//! when every candidate fails, serve a static fallback instead of erroring.

pub mod client;
pub mod generation;
pub mod languages;
pub mod translation;

pub use client::HostedInferenceClient;
pub use generation::{GeneratedReply, GenerationChain, FALLBACK_MODEL};
pub use translation::TranslationChain;
