//! Business services containing domain logic and use cases.

pub mod notification;
pub mod rotation;
pub mod token;

// Re-export commonly used types
pub use notification::Notifier;
pub use rotation::RotationCoordinator;
pub use token::{HmacKeyManager, JwtTokenAuthority, TokenAuthority, TokenServiceConfig};
