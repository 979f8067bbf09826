pub mod token;

pub use token::{InMemoryTokenRepository, TokenRepository, TokenTransaction};
