//! Simulation engine: discrete-event scheduler, virtual network topology,
//! scan orchestration and the [`Simulation`] context tying them together.
//!
//! The engine owns one logical clock and advances only when driven through
//! [`Simulation::advance`]; nothing here blocks, spawns or does I/O. Each
//! [`Simulation`] is fully isolated, so independent instances can run side
//! by side without shared state.

pub mod scanner;
pub mod scheduler;
pub mod simulation;
pub mod topology;

pub use simulation::{SimEvent, Simulation};
