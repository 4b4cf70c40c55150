//! Integration tests over real loopback sockets
//!
//! A small glove simulator dials the host listener exactly like the real
//! glove does and answers commands with well-formed (or deliberately broken)
//! replies.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration -- --nocapture
//! ```

mod connection;
mod glove_sim;
mod queries;
mod sampling;

pub use glove_sim::{GloveSim, SimBehavior};
