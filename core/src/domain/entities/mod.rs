//! Domain entities representing core business objects.

pub mod token;


// Re-export commonly used types
pub use token::{Claims, SessionTokenRecord, TokenPair, JWT_ISSUER, REFRESH_SECRET_BYTES};
