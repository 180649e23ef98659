//! Shared data model for the scansim workspace.
//!
//! Everything in here is plain value types: endpoints, packets, hosts and
//! scan parameters. The simulation logic that manipulates them lives in
//! `scansim-core` and `scansim-protocols`.

pub mod config;
pub mod error;
pub mod network;
pub mod scan;
