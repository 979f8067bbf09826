//! Value objects representing immutable domain concepts.

pub mod origin_drift;

// Re-export commonly used types
pub use origin_drift::OriginDrift;
