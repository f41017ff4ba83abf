// src/protocol/mod.rs
pub mod client;
pub mod models;
