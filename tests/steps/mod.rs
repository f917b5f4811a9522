//! Step definitions for the storefront features

mod resilience;
pub mod world;
