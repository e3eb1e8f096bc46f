//! Late publishing API.

mod client;
mod dto;

pub use client::LateClient;
