//! Participant accounts: credentials and score changes

pub mod credentials;
mod service;

pub use service::{AccountService, LoginOutcome};
