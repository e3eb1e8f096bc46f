//! xAI Imagine media generation.

mod client;
mod dto;

pub use client::ImagineClient;
