//! Cross-crate integration tests for Courier
//!
//! This test suite validates:
//! - The envelope protocol across the crypto and identity crates
//! - Certificate lifecycle and serialization through envelope transport
//! - Adversarial envelopes (interception, substitution, replay to a stranger)
//! - The node HTTP API over a real TCP listener

pub mod test_utils;

#[cfg(test)]
mod envelope_scenarios;

#[cfg(test)]
mod adversary_tests;

#[cfg(test)]
mod node_http_tests;
