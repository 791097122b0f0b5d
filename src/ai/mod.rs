//! Text Generation Module
//!
//! The remote text-generation client and the cache-backed call wrapper every
//! feature goes through.

mod client;
mod wrapper;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{GeminiClient, GenerationParams, TextGenerator};
pub use wrapper::{CachedGenerator, CallOptions, Fallback};
