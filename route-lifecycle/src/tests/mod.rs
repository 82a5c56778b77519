//! Test module for route-lifecycle
//!
//! Behavioural tests for the gate, the module lifecycle, the fetch pipeline
//! and both integrations, with property-based tests (proptest) where a rule
//! has to hold over arbitrary transitions.

#[cfg(test)]
pub mod support;



#[cfg(test)]
pub mod fetch_tests;
