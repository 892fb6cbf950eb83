//! Mode controllers. Each session owns its round state; persistence and timers live in
//! `state` / `logic`.

pub mod study;
pub mod versus;
