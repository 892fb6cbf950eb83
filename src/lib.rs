//! Diabetes pharmacotherapy decision trainer: case bank, deterministic option shuffling,
//! keyword reasoning evaluation, and the Study/Versus score engines behind an Axum API.

pub mod breakdown;
pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod protocol;
pub mod reasoning;
pub mod repository;
pub mod routes;
pub mod scoring;
pub mod seeds;
pub mod session;
pub mod shuffle;
pub mod state;
pub mod store;
pub mod telemetry;
