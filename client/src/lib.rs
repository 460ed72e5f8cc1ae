//! Streaming orchestrator for the Switchboard gateway
//!
//! [`Client`] is the caller-facing surface: it resolves the active adapter
//! through the registry, picks streaming or single-shot mode, and hands back
//! a [`Turn`] that accumulates chunks, tracks its phase, and survives
//! cancellation with partial content intact. [`compare`] fans one prompt out
//! to several backends at once and ranks the answers by measured latency.

mod client;
mod compare;
#[cfg(test)]
mod testing;
mod turn;

pub use client::Client;
pub use compare::{compare, CompareEntry};
pub use turn::{Turn, TurnOutcome, TurnPhase};
