//! Token authority module
//!
//! This module handles all stateless token operations:
//! - Signed access token minting and verification
//! - Random refresh secret generation
//! - One-way hashing and verification of refresh secrets

mod authority;
mod config;
mod key_manager;
mod service;


pub use authority::TokenAuthority;
pub use config::TokenServiceConfig;
pub use key_manager::HmacKeyManager;
pub use service::JwtTokenAuthority;
