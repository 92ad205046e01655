//! HTTP surface for the item catalog (library part; `main.rs` is the binary).

pub mod app;
pub mod config;
