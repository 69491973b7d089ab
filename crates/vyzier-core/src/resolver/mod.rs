//! Response resolver abstractions for Vyzier.
//!
//! - `ResponseResolver`: RPITIT trait implemented by every reply strategy
//! - `BoxResolver`: object-safe wrapper for runtime strategy selection
//! - `LocalRuleResolver`: keyword rules with simulated latency
//! - `LatencyModel`: injectable delay source for the local resolver

pub mod box_resolver;
pub mod latency;
pub mod local;
pub mod provider;
