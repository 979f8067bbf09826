//! Rotation coordinator module
//!
//! Issues token pairs and redeems refresh secrets exactly once, raising an
//! origin-change notice when a secret is redeemed from a new origin.

mod service;

#[cfg(test)]
mod tests;

pub use service::RotationCoordinator;
