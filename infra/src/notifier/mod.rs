//! Notifier module - Origin-change notice delivery
//!
//! Provides implementations of the `Notifier` contract from `sa_core`:
//! - **Log Notifier**: Writes the notice to the structured log

mod log_notifier;

#[cfg(test)]
mod tests;

pub use log_notifier::LogNotifier;
